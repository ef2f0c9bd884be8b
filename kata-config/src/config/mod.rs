//! Runtime configuration resolution
//!
//! This module turns the built-in defaults and an optional TOML file into a
//! single [`RuntimeConfig`]:
//! - builtin: compiled-in defaults and config file locations
//! - resolver: path canonicalization and config file discovery
//! - schema: raw decoded file contents
//! - hypervisor: effective hypervisor values derived from the raw table
//! - loader: discovery, decoding and overlay

pub mod builtin;
pub mod hypervisor;
pub mod loader;
pub mod resolver;
pub mod runtime;
pub mod schema;

// Re-export commonly used types
pub use builtin::{default_runtime_config, max_qemu_vcpus};
pub use hypervisor::derive_hypervisor_config;
pub use loader::ConfigLoader;
pub use resolver::{find_config_file, resolve_path};
pub use runtime::{
    AgentConfig, AgentType, FactoryConfig, HypervisorConfig, HypervisorType, KernelParam,
    NetInterworkingModel, ProxyType, RuntimeConfig, ShimType, VmConfig, VIRTIO_BLOCK,
    VIRTIO_SCSI,
};
pub use schema::{Config, HypervisorSection};
