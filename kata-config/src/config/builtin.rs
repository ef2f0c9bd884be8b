//! Built-in default configuration compiled into the binary
//!
//! The defaults are the lowest-priority layer. They are built fresh by
//! [`default_runtime_config`] on every load; nothing here is mutable.

use super::runtime::{
    AgentConfig, AgentType, FactoryConfig, HypervisorConfig, HypervisorType,
    NetInterworkingModel, ProxyType, RuntimeConfig, ShimType, VmConfig, VIRTIO_SCSI,
};
use std::path::PathBuf;

pub const DEFAULT_HYPERVISOR_PATH: &str = "/usr/bin/qemu-lite-system-x86_64";
pub const DEFAULT_IMAGE_PATH: &str = "/usr/share/kata-containers/kata-containers.img";
pub const DEFAULT_KERNEL_PATH: &str = "/usr/share/kata-containers/vmlinuz.container";
pub const DEFAULT_INITRD_PATH: &str = "/usr/share/kata-containers/kata-containers-initrd.img";

/// Empty means no firmware unless the file names one
pub const DEFAULT_FIRMWARE_PATH: &str = "";
pub const DEFAULT_MACHINE_ACCELERATORS: &str = "";
pub const DEFAULT_KERNEL_PARAMS: &str = "";
pub const DEFAULT_MACHINE_TYPE: &str = "pc";

pub const DEFAULT_VCPU_COUNT: u32 = 1;
pub const DEFAULT_MAX_VCPU_COUNT: u32 = 0;
pub const DEFAULT_MEM_SIZE: u32 = 2048; // MiB
/// Requests below this are treated as unset
pub const MIN_MEM_SIZE: u32 = 8; // MiB
pub const DEFAULT_BRIDGES_COUNT: u32 = 1;
/// PCI bridges that can be cold plugged into a VM
pub const MAX_PCI_BRIDGES: u32 = 5;
pub const DEFAULT_MSIZE_9P: u32 = 8192;

pub const DEFAULT_INTER_NETWORKING_MODEL: &str = "macvtap";
pub const DEFAULT_BLOCK_DEVICE_DRIVER: &str = VIRTIO_SCSI;
pub const DEFAULT_DISABLE_BLOCK_DEVICE_USE: bool = false;
pub const DEFAULT_ENABLE_IO_THREADS: bool = false;
pub const DEFAULT_ENABLE_MEM_PREALLOC: bool = false;
pub const DEFAULT_ENABLE_HUGE_PAGES: bool = false;
pub const DEFAULT_ENABLE_SWAP: bool = false;
pub const DEFAULT_ENABLE_DEBUG: bool = false;
pub const DEFAULT_DISABLE_NESTING_CHECKS: bool = false;

/// Config file installed by the package, used by stateless systems
pub const DEFAULT_RUNTIME_CONFIGURATION: &str =
    "/usr/share/defaults/kata-containers/configuration.toml";

/// Admin override, takes precedence over [`DEFAULT_RUNTIME_CONFIGURATION`]
pub const DEFAULT_SYSCONF_RUNTIME_CONFIGURATION: &str = "/etc/kata-containers/configuration.toml";

/// Config file candidates in priority order
pub fn default_config_file_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(DEFAULT_SYSCONF_RUNTIME_CONFIGURATION),
        PathBuf::from(DEFAULT_RUNTIME_CONFIGURATION),
    ]
}

/// Most vCPUs a single qemu guest supports on this architecture
pub fn max_qemu_vcpus() -> u32 {
    if cfg!(target_arch = "aarch64") {
        123
    } else if cfg!(target_arch = "powerpc64") {
        128
    } else {
        240
    }
}

/// Hypervisor defaults, used as-is when the file has no `[hypervisor.qemu]`
///
/// The initrd is preferred over the image by default; a config file can
/// switch to an image.
pub fn default_hypervisor_config() -> HypervisorConfig {
    HypervisorConfig {
        hypervisor_path: PathBuf::from(DEFAULT_HYPERVISOR_PATH),
        kernel_path: PathBuf::from(DEFAULT_KERNEL_PATH),
        initrd_path: PathBuf::from(DEFAULT_INITRD_PATH),
        image_path: PathBuf::new(),
        firmware_path: PathBuf::from(DEFAULT_FIRMWARE_PATH),
        machine_accelerators: DEFAULT_MACHINE_ACCELERATORS.to_string(),
        kernel_params: Vec::new(),
        machine_type: DEFAULT_MACHINE_TYPE.to_string(),
        default_vcpus: DEFAULT_VCPU_COUNT,
        default_max_vcpus: DEFAULT_MAX_VCPU_COUNT,
        default_mem_sz: DEFAULT_MEM_SIZE,
        default_bridges: DEFAULT_BRIDGES_COUNT,
        msize_9p: DEFAULT_MSIZE_9P,
        block_device_driver: DEFAULT_BLOCK_DEVICE_DRIVER.to_string(),
        disable_block_device_use: DEFAULT_DISABLE_BLOCK_DEVICE_USE,
        mem_prealloc: DEFAULT_ENABLE_MEM_PREALLOC,
        huge_pages: DEFAULT_ENABLE_HUGE_PAGES,
        mlock: !DEFAULT_ENABLE_SWAP,
        debug: DEFAULT_ENABLE_DEBUG,
        disable_nesting_checks: DEFAULT_DISABLE_NESTING_CHECKS,
        enable_io_threads: DEFAULT_ENABLE_IO_THREADS,
    }
}

/// The complete built-in runtime configuration
///
/// The network model is left at its type default here; the loader applies
/// [`DEFAULT_INTER_NETWORKING_MODEL`] through the validating setter.
pub fn default_runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        hypervisor_type: HypervisorType::Qemu,
        hypervisor_config: default_hypervisor_config(),
        agent_type: AgentType::Kata,
        agent_config: AgentConfig { long_live_conn: true },
        proxy_type: ProxyType::KataBuiltIn,
        shim_type: ShimType::KataBuiltIn,
        internetworking_model: NetInterworkingModel::default(),
        vm_config: VmConfig {
            memory: DEFAULT_MEM_SIZE,
        },
        factory_config: FactoryConfig { template: false },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_prefers_initrd() {
        let config = default_hypervisor_config();
        assert_eq!(config.initrd_path, PathBuf::from(DEFAULT_INITRD_PATH));
        assert!(config.image_path.as_os_str().is_empty());
        assert!(config.firmware_path.as_os_str().is_empty());
    }

    #[test]
    fn test_builtin_values() {
        let config = default_runtime_config();
        assert_eq!(config.hypervisor_type, HypervisorType::Qemu);
        assert_eq!(config.agent_type, AgentType::Kata);
        assert!(config.agent_config.long_live_conn);
        assert!(!config.factory_config.template);
        assert_eq!(config.vm_config.memory, 2048);

        let hv = &config.hypervisor_config;
        assert_eq!(hv.machine_type, "pc");
        assert_eq!(hv.default_vcpus, 1);
        assert_eq!(hv.default_max_vcpus, 0);
        assert_eq!(hv.default_mem_sz, 2048);
        assert_eq!(hv.default_bridges, 1);
        assert_eq!(hv.msize_9p, 8192);
        assert_eq!(hv.block_device_driver, "virtio-scsi");
        assert!(hv.mlock);
        assert!(hv.kernel_params.is_empty());
    }

    #[test]
    fn test_builtin_is_fresh_each_call() {
        let mut first = default_runtime_config();
        first.hypervisor_config.default_vcpus = 8;
        assert_eq!(default_runtime_config().hypervisor_config.default_vcpus, 1);
    }

    #[test]
    fn test_candidate_order() {
        let paths = default_config_file_paths();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/etc/kata-containers/configuration.toml"),
                PathBuf::from("/usr/share/defaults/kata-containers/configuration.toml"),
            ]
        );
    }
}
