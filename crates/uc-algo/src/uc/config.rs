//! Run configuration for the commitment solve.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uc_core::{UcError, UcResult};

use super::backend::BackendRegistry;

/// Settings for one build/solve run.
///
/// ```toml
/// segments = 8
/// candidates = ["microlp", "clarabel"]
/// time_limit_seconds = 60.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UcConfig {
    /// Piecewise-linear segments per generator cost curve
    pub segments: usize,
    /// Backend ids in priority order
    pub candidates: Vec<String>,
    /// Wall-clock limit passed to each backend call
    pub time_limit_seconds: Option<f64>,
    /// Largest tolerated distance of a solved binary from 0 or 1
    pub integrality_tolerance: f64,
}

impl Default for UcConfig {
    fn default() -> Self {
        Self {
            segments: 6,
            candidates: BackendRegistry::default_candidates(),
            time_limit_seconds: None,
            integrality_tolerance: 1e-6,
        }
    }
}

impl UcConfig {
    pub fn from_toml_str(contents: &str) -> UcResult<Self> {
        let config: UcConfig =
            toml::from_str(contents).map_err(|e| UcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> UcResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_seconds.map(Duration::from_secs_f64)
    }

    /// Reject settings the orchestrator cannot honor.
    pub fn validate(&self) -> UcResult<()> {
        if self.segments == 0 {
            return Err(UcError::Config("segments must be at least 1".into()));
        }
        if self.candidates.is_empty() {
            return Err(UcError::Config("candidate backend list is empty".into()));
        }
        if let Some(limit) = self.time_limit_seconds {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(UcError::Config(format!(
                    "time limit must be a positive number of seconds, got {limit}"
                )));
            }
        }
        if !(0.0..0.5).contains(&self.integrality_tolerance) {
            return Err(UcError::Config(format!(
                "integrality tolerance must lie in [0, 0.5), got {}",
                self.integrality_tolerance
            )));
        }
        Ok(())
    }
}
