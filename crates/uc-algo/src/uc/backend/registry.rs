//! Registry of solver backends.
//!
//! The orchestrator never constructs backends itself; it resolves candidate
//! ids against a registry, so tests can register mocks under any id.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{BackendError, ClarabelBackend, MicroLpBackend, UcBackend};

/// Holds all registered backends, keyed by id.
///
/// Create with `BackendRegistry::new()` for empty or
/// `BackendRegistry::with_defaults()` for the compiled-in solvers.
#[derive(Default, Clone)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn UcBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with every backend compiled into this build.
    ///
    /// Registers microlp and clarabel, plus highs with feature `solver-highs`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        #[cfg(feature = "solver-highs")]
        registry.register_backend(Arc::new(super::HighsBackend));
        registry.register_backend(Arc::new(MicroLpBackend));
        registry.register_backend(Arc::new(ClarabelBackend));
        registry
    }

    /// Default candidate order: MILP-capable native solver first, then the
    /// pure-Rust MILP solver, then the LP-only solver.
    pub fn default_candidates() -> Vec<String> {
        let mut ids = Vec::new();
        if cfg!(feature = "solver-highs") {
            ids.push("highs".to_string());
        }
        ids.push("microlp".to_string());
        ids.push("clarabel".to_string());
        ids
    }

    /// Register a backend, replacing any previous one with the same id.
    pub fn register_backend(&mut self, backend: Arc<dyn UcBackend>) {
        self.backends.insert(backend.id().to_string(), backend);
    }

    /// Get a backend by ID.
    pub fn get_backend(&self, id: &str) -> Option<Arc<dyn UcBackend>> {
        self.backends.get(id).cloned()
    }

    /// Look up a backend that can run right now.
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn UcBackend>, BackendError> {
        let backend = self
            .get_backend(id)
            .ok_or_else(|| BackendError::Unavailable(format!("'{id}' is not registered")))?;
        if !backend.is_available() {
            return Err(BackendError::Unavailable(format!(
                "'{id}' is not available on this system"
            )));
        }
        Ok(backend)
    }

    /// List all backend IDs, sorted.
    pub fn list_backends(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.backends.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// IDs of available backends that report duals, sorted.
    pub fn dual_capable(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .backends
            .iter()
            .filter(|(_, b)| b.capabilities().duals && b.is_available())
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.list_backends())
            .finish()
    }
}
