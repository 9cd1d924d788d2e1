//! Vigil Common Utilities
//!
//! Shared infrastructure for all Vigil crates:
//! - Error types and result aliases
//! - Injectable time source for violation timestamps and dedup windows
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
