//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to resolve path {path}: {source}")]
    PathUnresolvable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No candidate file resolved. Holds the reason for every candidate.
    #[error("No configuration file found: {0}")]
    NoConfigFile(String),

    #[error("Failed to load config from {path}: {source}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{path}: {source}")]
    InConfigFile {
        path: PathBuf,
        source: Box<ConfigError>,
    },

    #[error("cannot specify an image and an initrd in configuration file")]
    ImageAndInitrd,

    #[error(
        "Invalid value {driver} provided for hypervisor block storage driver, can be either {} or {}",
        crate::config::VIRTIO_SCSI,
        crate::config::VIRTIO_BLOCK
    )]
    InvalidBlockDeviceDriver { driver: String },

    #[error(
        "Unknown internetworking model {model}, expected one of: {}",
        crate::config::NetInterworkingModel::NAMES.join(", ")
    )]
    UnknownNetworkModel { model: String },
}

impl ConfigError {
    /// Attach the config file path to an error raised while applying its sections
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ConfigError::InConfigFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
