//! Mosaic Common Utilities
//!
//! Shared infrastructure for all Mosaic crates:
//! - Error types and result aliases
//! - Configuration loading (pixel ceilings, scale ladder, estimator timing)
//! - Tracing/logging initialization
//! - Export artifact naming

pub mod config;
pub mod error;
pub mod logging;
pub mod naming;

pub use config::*;
pub use error::*;
pub use naming::*;
