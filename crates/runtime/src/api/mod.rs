//! Public runtime API surface.
//!
//! Error taxonomy and the status-reporting service façade exposed to front
//! ends. Orchestration lives in `distribution`, storage in `repository`.

pub mod errors;
pub mod service;

pub use errors::{DistributionError, Result};
pub use service::{DistributionService, HealthReport};
