pub mod backends;
pub mod demo;
pub mod solve;
