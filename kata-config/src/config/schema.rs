//! Configuration file schema types
//!
//! Component tables are written in dotted form, `[<component>.<type>]`, for
//! example `[hypervisor.qemu]` or `[proxy.kata]`. Each component is decoded as
//! a map from type key to section so that new type keys can appear in a file
//! before this crate knows how to apply them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Type key of the only hypervisor table that is applied
pub const QEMU_HYPERVISOR_TABLE_TYPE: &str = "qemu";

/// Complete decoded configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub hypervisor: IndexMap<String, HypervisorSection>,
    #[serde(default)]
    pub proxy: IndexMap<String, ProxySection>,
    #[serde(default)]
    pub shim: IndexMap<String, ShimSection>,
    #[serde(default)]
    pub agent: IndexMap<String, AgentSection>,
    #[serde(default)]
    pub runtime: RuntimeSection,
    #[serde(default)]
    pub factory: FactorySection,
}

/// `[hypervisor.<type>]` table, raw values as written in the file
///
/// Missing fields decode to their zero value; the accessors in
/// [`crate::config::hypervisor`] turn those into effective values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HypervisorSection {
    pub path: String,
    pub kernel: String,
    pub initrd: String,
    pub image: String,
    pub firmware: String,
    pub machine_accelerators: String,
    pub kernel_params: String,
    pub machine_type: String,
    pub default_vcpus: i32,
    #[serde(rename = "default_maxvcpus")]
    pub default_max_vcpus: u32,
    #[serde(rename = "default_memory")]
    pub default_mem_sz: u32,
    pub default_bridges: u32,
    pub msize_9p: u32,
    pub block_device_driver: String,
    pub disable_block_device_use: bool,
    #[serde(rename = "enable_mem_prealloc")]
    pub mem_prealloc: bool,
    #[serde(rename = "enable_hugepages")]
    pub huge_pages: bool,
    #[serde(rename = "enable_swap")]
    pub swap: bool,
    #[serde(rename = "enable_debug")]
    pub debug: bool,
    pub disable_nesting_checks: bool,
    #[serde(rename = "enable_iothreads")]
    pub enable_io_threads: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySection {
    pub path: String,
    #[serde(rename = "enable_debug")]
    pub debug: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ShimSection {
    pub path: String,
    #[serde(rename = "enable_debug")]
    pub debug: bool,
}

/// `[agent.<type>]` table
///
/// Accepted so that existing files decode, but carries no settings: the agent
/// configuration is not file-configurable.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AgentSection {}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeSection {
    #[serde(rename = "enable_debug")]
    pub debug: bool,
    #[serde(rename = "internetworking_model")]
    pub inter_network_model: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FactorySection {
    #[serde(rename = "enable_template")]
    pub template: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[hypervisor.qemu]
path = "/usr/bin/qemu-system-x86_64"
kernel_params = "quiet"
default_vcpus = -1
default_memory = 4096
enable_swap = true

[proxy.kata]
path = "/usr/libexec/kata-proxy"
enable_debug = true

[shim.kata]
path = "/usr/libexec/kata-shim"

[agent.kata]

[runtime]
enable_debug = true
internetworking_model = "bridged"

[factory]
enable_template = true
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        let qemu = &config.hypervisor[QEMU_HYPERVISOR_TABLE_TYPE];
        assert_eq!(qemu.path, "/usr/bin/qemu-system-x86_64");
        assert_eq!(qemu.default_vcpus, -1);
        assert_eq!(qemu.default_mem_sz, 4096);
        assert_eq!(qemu.default_bridges, 0);
        assert!(qemu.swap);
        assert!(!qemu.debug);
        assert!(config.proxy["kata"].debug);
        assert_eq!(config.shim["kata"].path, "/usr/libexec/kata-shim");
        assert!(config.agent.contains_key("kata"));
        assert_eq!(config.runtime.inter_network_model, "bridged");
        assert!(config.factory.template);
    }

    #[test]
    fn test_empty_document() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.hypervisor.is_empty());
        assert!(config.runtime.inter_network_model.is_empty());
        assert!(!config.factory.template);
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
[hypervisor.qemu]
default_memory = "lots"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_unsigned_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
[hypervisor.qemu]
default_bridges = -2
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_hypervisor_keys_keep_file_order() {
        let config: Config = toml::from_str(
            r#"
[hypervisor.firecracker]
[hypervisor.qemu]
[hypervisor.acrn]
"#,
        )
        .unwrap();
        let keys: Vec<&str> = config.hypervisor.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["firecracker", "qemu", "acrn"]);
    }
}
