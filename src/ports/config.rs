use std::path::PathBuf;

use crate::domain::{AppConfig, DomainError};

/// Where resolver settings (probe timeout, logging) are persisted.
pub trait ConfigStore: Send + Sync {
    /// Load the configuration, writing defaults first if nothing is stored yet.
    fn load(&self) -> Result<AppConfig, DomainError>;

    fn save(&self, config: &AppConfig) -> Result<(), DomainError>;

    fn config_path(&self) -> PathBuf;

    /// Directory for rotated log files.
    fn logs_dir(&self) -> PathBuf;
}
