//! Configuration file discovery, decoding and overlay onto the built-in defaults

use super::builtin::{
    default_config_file_paths, default_runtime_config, max_qemu_vcpus,
    DEFAULT_INTER_NETWORKING_MODEL,
};
use super::hypervisor::derive_hypervisor_config;
use super::resolver::find_config_file;
use super::runtime::{FactoryConfig, RuntimeConfig};
use super::schema::{Config, FactorySection, QEMU_HYPERVISOR_TABLE_TYPE};
use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves the runtime configuration
///
/// A missing config file is normal and yields the built-in defaults. A file
/// that exists but is malformed, or names paths that do not exist, fails the
/// whole load.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    candidates: Vec<PathBuf>,
    host_cpus: u32,
    max_vcpus: u32,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader for the standard config locations and the current host
    pub fn new() -> Self {
        Self {
            candidates: default_config_file_paths(),
            host_cpus: u32::try_from(num_cpus::get()).unwrap_or(u32::MAX),
            max_vcpus: max_qemu_vcpus(),
        }
    }

    /// Replace the config file candidates, highest priority first
    pub fn with_candidates<I, P>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_host_cpus(mut self, host_cpus: u32) -> Self {
        self.host_cpus = host_cpus;
        self
    }

    pub fn with_max_vcpus(mut self, max_vcpus: u32) -> Self {
        self.max_vcpus = max_vcpus;
        self
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Find the highest-priority config file that exists
    pub fn find_config_file(&self) -> Result<PathBuf> {
        find_config_file(&self.candidates)
    }

    /// Decode a config file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the runtime configuration
    ///
    /// All paths are resolved, so on success every configured path existed at
    /// the time of the call.
    pub fn load(&self) -> Result<RuntimeConfig> {
        self.load_with_source().map(|(config, _)| config)
    }

    /// Like [`ConfigLoader::load`], also returning the file that was applied
    pub fn load_with_source(&self) -> Result<(RuntimeConfig, Option<PathBuf>)> {
        let mut config = default_runtime_config();
        config
            .internetworking_model
            .set_model(DEFAULT_INTER_NETWORKING_MODEL)?;

        let resolved = match self.find_config_file() {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::info!("Using built-in defaults: {}", err);
                return Ok((config, None));
            }
        };

        let file = Self::load_from_file(&resolved)?;

        if !file.runtime.inter_network_model.is_empty() {
            config
                .internetworking_model
                .set_model(&file.runtime.inter_network_model)?;
        }

        self.apply(&resolved, &file, &mut config)?;

        Ok((config, Some(resolved)))
    }

    /// Overlay the recognized sections of `file` onto `config`
    ///
    /// Only the `qemu` hypervisor table is applied. Other type keys are
    /// skipped so that files written for newer hypervisors still load.
    pub fn apply(&self, path: &Path, file: &Config, config: &mut RuntimeConfig) -> Result<()> {
        for (key, section) in &file.hypervisor {
            match key.as_str() {
                QEMU_HYPERVISOR_TABLE_TYPE => {
                    let hypervisor =
                        derive_hypervisor_config(section, self.host_cpus, self.max_vcpus)
                            .map_err(|e| e.in_file(path))?;

                    config.vm_config.memory = hypervisor.default_mem_sz;
                    config.hypervisor_config = hypervisor;
                }
                other => {
                    tracing::warn!("{:?}: ignoring unsupported hypervisor type {:?}", path, other);
                }
            }
        }

        config.factory_config = factory_config(&file.factory);

        Ok(())
    }
}

fn factory_config(factory: &FactorySection) -> FactoryConfig {
    FactoryConfig {
        template: factory.template,
    }
}
