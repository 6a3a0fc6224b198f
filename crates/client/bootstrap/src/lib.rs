//! Shared bootstrap utilities for roster front-ends.
//!
//! Provides configuration loading and service assembly that can be reused by
//! the CLI or any other front-end crate.
pub mod builder;
pub mod config;

pub use builder::ServiceBuilder;
pub use config::{BootstrapConfig, StorageMode};
