//! Resolved runtime configuration handed to sandbox creation

use crate::error::{ConfigError, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Block device driver names accepted by the hypervisor
pub const VIRTIO_SCSI: &str = "virtio-scsi";
pub const VIRTIO_BLOCK: &str = "virtio-blk";

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeConfig {
    pub hypervisor_type: HypervisorType,
    pub hypervisor_config: HypervisorConfig,

    pub agent_type: AgentType,
    pub agent_config: AgentConfig,

    pub proxy_type: ProxyType,
    pub shim_type: ShimType,

    /// How the VM network is connected to the container network namespace
    pub internetworking_model: NetInterworkingModel,

    pub vm_config: VmConfig,
    pub factory_config: FactoryConfig,
}

/// Hypervisor configuration with every path resolved and every count bounded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypervisorConfig {
    pub hypervisor_path: PathBuf,
    pub kernel_path: PathBuf,

    /// Empty when an image is used instead
    pub initrd_path: PathBuf,

    /// Empty when an initrd is used instead
    pub image_path: PathBuf,

    /// Empty when no firmware is configured
    pub firmware_path: PathBuf,

    /// Comma separated, trimmed, no empty entries
    pub machine_accelerators: String,
    pub kernel_params: Vec<KernelParam>,
    pub machine_type: String,

    pub default_vcpus: u32,
    pub default_max_vcpus: u32,

    /// MiB
    pub default_mem_sz: u32,
    pub default_bridges: u32,
    pub msize_9p: u32,

    pub block_device_driver: String,
    pub disable_block_device_use: bool,

    pub mem_prealloc: bool,
    pub huge_pages: bool,

    /// Guest memory is locked, the inverse of `enable_swap`
    pub mlock: bool,
    pub debug: bool,
    pub disable_nesting_checks: bool,
    pub enable_io_threads: bool,
}

/// A single kernel command line parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KernelParam {
    pub key: String,
    pub value: String,
}

impl KernelParam {
    /// Split whitespace separated `key=value` tokens into parameters
    ///
    /// A token without `=` yields an empty value; only the first `=` splits.
    pub fn parse_all(params: &str) -> Vec<KernelParam> {
        params
            .split_whitespace()
            .map(|token| match token.split_once('=') {
                Some((key, value)) => KernelParam {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                None => KernelParam {
                    key: token.to_string(),
                    value: String::new(),
                },
            })
            .collect()
    }
}

impl fmt::Display for KernelParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}={}", self.key, self.value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentConfig {
    /// Keep a single long-lived connection to the agent
    pub long_live_conn: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactoryConfig {
    /// Reuse a template VM to speed up sandbox creation
    pub template: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmConfig {
    /// MiB, kept in step with `HypervisorConfig::default_mem_sz`
    pub memory: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HypervisorType {
    Qemu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Kata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProxyType {
    #[serde(rename = "kataBuiltInProxy")]
    KataBuiltIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShimType {
    #[serde(rename = "kataBuiltInShim")]
    KataBuiltIn,
}

impl fmt::Display for HypervisorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HypervisorType::Qemu => write!(f, "qemu"),
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentType::Kata => write!(f, "kata"),
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyType::KataBuiltIn => write!(f, "kataBuiltInProxy"),
        }
    }
}

impl fmt::Display for ShimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShimType::KataBuiltIn => write!(f, "kataBuiltInShim"),
        }
    }
}

/// Network interconnect between the VM and the container network namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetInterworkingModel {
    Bridged,
    #[default]
    MacVtap,
    Enlightened,
}

impl NetInterworkingModel {
    /// Model names accepted by [`NetInterworkingModel::set_model`]
    pub const NAMES: &'static [&'static str] = &["default", "bridged", "macvtap", "enlightened"];

    /// Replace the model with the one named by `model`
    ///
    /// `default` selects macvtap. Any other unknown name is rejected and
    /// leaves the current value untouched.
    pub fn set_model(&mut self, model: &str) -> Result<()> {
        *self = match model {
            "default" => NetInterworkingModel::default(),
            "bridged" => NetInterworkingModel::Bridged,
            "macvtap" => NetInterworkingModel::MacVtap,
            "enlightened" => NetInterworkingModel::Enlightened,
            _ => {
                return Err(ConfigError::UnknownNetworkModel {
                    model: model.to_string(),
                })
            }
        };
        Ok(())
    }
}

impl fmt::Display for NetInterworkingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetInterworkingModel::Bridged => write!(f, "bridged"),
            NetInterworkingModel::MacVtap => write!(f, "macvtap"),
            NetInterworkingModel::Enlightened => write!(f, "enlightened"),
        }
    }
}
