//! Effective hypervisor settings derived from a `[hypervisor.qemu]` table
//!
//! Each accessor applies the same precedence: an explicit valid value wins,
//! then a computed default, then the built-in constant. Nothing here reads the
//! host; CPU limits are passed in by the caller.

use super::builtin::{
    DEFAULT_BLOCK_DEVICE_DRIVER, DEFAULT_BRIDGES_COUNT, DEFAULT_FIRMWARE_PATH,
    DEFAULT_HYPERVISOR_PATH, DEFAULT_KERNEL_PARAMS, DEFAULT_KERNEL_PATH, DEFAULT_MACHINE_TYPE,
    DEFAULT_MEM_SIZE, DEFAULT_MSIZE_9P, DEFAULT_VCPU_COUNT, MAX_PCI_BRIDGES, MIN_MEM_SIZE,
};
use super::resolver::resolve_path;
use super::runtime::{HypervisorConfig, KernelParam, VIRTIO_BLOCK, VIRTIO_SCSI};
use super::schema::HypervisorSection;
use crate::error::{ConfigError, Result};
use std::path::PathBuf;

/// Resolve `path` unless it is empty, in which case leave it unset
fn resolve_optional(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        return Ok(PathBuf::new());
    }
    resolve_path(path)
}

impl HypervisorSection {
    pub fn path(&self) -> Result<PathBuf> {
        if self.path.is_empty() {
            return resolve_path(DEFAULT_HYPERVISOR_PATH);
        }
        resolve_path(&self.path)
    }

    pub fn kernel(&self) -> Result<PathBuf> {
        if self.kernel.is_empty() {
            return resolve_path(DEFAULT_KERNEL_PATH);
        }
        resolve_path(&self.kernel)
    }

    pub fn initrd(&self) -> Result<PathBuf> {
        resolve_optional(&self.initrd)
    }

    pub fn image(&self) -> Result<PathBuf> {
        resolve_optional(&self.image)
    }

    pub fn firmware(&self) -> Result<PathBuf> {
        if self.firmware.is_empty() {
            return resolve_optional(DEFAULT_FIRMWARE_PATH);
        }
        resolve_path(&self.firmware)
    }

    /// Comma separated accelerators with blanks trimmed and empty entries dropped
    pub fn machine_accelerators(&self) -> String {
        self.machine_accelerators
            .split(',')
            .map(|accel| accel.trim_matches(|c: char| c.is_whitespace() || c.is_control()))
            .filter(|accel| !accel.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn kernel_params(&self) -> Vec<KernelParam> {
        if self.kernel_params.is_empty() {
            return KernelParam::parse_all(DEFAULT_KERNEL_PARAMS);
        }
        KernelParam::parse_all(&self.kernel_params)
    }

    pub fn machine_type(&self) -> String {
        if self.machine_type.is_empty() {
            return DEFAULT_MACHINE_TYPE.to_string();
        }
        self.machine_type.clone()
    }

    /// vCPUs a guest boots with
    ///
    /// Negative or more than the host has means "all host CPUs"; zero means
    /// unset.
    pub fn default_vcpus(&self, host_cpus: u32) -> u32 {
        let requested = self.default_vcpus;
        if requested < 0 || i64::from(requested) > i64::from(host_cpus) {
            return host_cpus;
        }
        if requested == 0 {
            return DEFAULT_VCPU_COUNT;
        }
        requested as u32
    }

    /// vCPUs a guest may hotplug up to, never above the host or hypervisor limit
    pub fn default_max_vcpus(&self, host_cpus: u32, max_vcpus: u32) -> u32 {
        let mut requested = self.default_max_vcpus;
        if requested == 0 || requested >= host_cpus {
            requested = host_cpus;
        }
        requested.min(max_vcpus)
    }

    /// Guest memory in MiB
    pub fn default_mem_sz(&self) -> u32 {
        if self.default_mem_sz < MIN_MEM_SIZE {
            return DEFAULT_MEM_SIZE;
        }
        self.default_mem_sz
    }

    pub fn default_bridges(&self) -> u32 {
        match self.default_bridges {
            0 => DEFAULT_BRIDGES_COUNT,
            n if n > MAX_PCI_BRIDGES => MAX_PCI_BRIDGES,
            n => n,
        }
    }

    pub fn msize_9p(&self) -> u32 {
        if self.msize_9p == 0 {
            return DEFAULT_MSIZE_9P;
        }
        self.msize_9p
    }

    pub fn block_device_driver(&self) -> Result<String> {
        match self.block_device_driver.as_str() {
            "" => Ok(DEFAULT_BLOCK_DEVICE_DRIVER.to_string()),
            VIRTIO_SCSI | VIRTIO_BLOCK => Ok(self.block_device_driver.clone()),
            other => Err(ConfigError::InvalidBlockDeviceDriver {
                driver: other.to_string(),
            }),
        }
    }
}

/// Build the effective qemu configuration from a raw table
///
/// Every path is resolved, so on success all of them existed at the time of
/// the call. Fails on the first unresolvable path or invalid value.
pub fn derive_hypervisor_config(
    raw: &HypervisorSection,
    host_cpus: u32,
    max_vcpus: u32,
) -> Result<HypervisorConfig> {
    let hypervisor_path = raw.path()?;
    let kernel_path = raw.kernel()?;
    let initrd_path = raw.initrd()?;
    let image_path = raw.image()?;

    if !image_path.as_os_str().is_empty() && !initrd_path.as_os_str().is_empty() {
        return Err(ConfigError::ImageAndInitrd);
    }

    let firmware_path = raw.firmware()?;
    let block_device_driver = raw.block_device_driver()?;

    Ok(HypervisorConfig {
        hypervisor_path,
        kernel_path,
        initrd_path,
        image_path,
        firmware_path,
        machine_accelerators: raw.machine_accelerators(),
        kernel_params: raw.kernel_params(),
        machine_type: raw.machine_type(),
        default_vcpus: raw.default_vcpus(host_cpus),
        default_max_vcpus: raw.default_max_vcpus(host_cpus, max_vcpus),
        default_mem_sz: raw.default_mem_sz(),
        default_bridges: raw.default_bridges(),
        msize_9p: raw.msize_9p(),
        block_device_driver,
        disable_block_device_use: raw.disable_block_device_use,
        mem_prealloc: raw.mem_prealloc,
        huge_pages: raw.huge_pages,
        mlock: !raw.swap,
        debug: raw.debug,
        disable_nesting_checks: raw.disable_nesting_checks,
        enable_io_threads: raw.enable_io_threads,
    })
}
