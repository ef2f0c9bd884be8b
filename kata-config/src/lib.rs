//! Runtime configuration for VM-based container sandboxes
//!
//! Resolves compiled-in defaults and an optional on-disk TOML file into the
//! immutable [`RuntimeConfig`] used to create sandbox VMs.

pub mod config;
pub mod error;

pub use config::{ConfigLoader, HypervisorConfig, RuntimeConfig};
pub use error::{ConfigError, Result};
