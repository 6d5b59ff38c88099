use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{AppConfig, DomainError};
use crate::ports::ConfigStore;

const APP_DIR_NAME: &str = "MacModel";

/// TOML-based configuration store with OS-specific paths.
pub struct TomlConfigStore {
    data_dir: PathBuf,
}

impl TomlConfigStore {
    /// Create a new TomlConfigStore.
    /// Uses OS-specific application data directories.
    pub fn new() -> Result<Self, DomainError> {
        Self::with_data_dir(Self::get_data_dir()?)
    }

    /// Create a store rooted at an explicit directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Result<Self, DomainError> {
        fs::create_dir_all(&data_dir)?;

        info!(data_dir = ?data_dir, "ConfigStore initialized");

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the OS-specific application data directory.
    /// - macOS: ~/Library/Application Support/MacModel/
    /// - elsewhere: the platform config dir (e.g. ~/.config/MacModel/)
    fn get_data_dir() -> Result<PathBuf, DomainError> {
        #[cfg(target_os = "macos")]
        let base = dirs::data_dir();

        #[cfg(not(target_os = "macos"))]
        let base = dirs::config_dir();

        base.map(|p| p.join(APP_DIR_NAME)).ok_or_else(|| {
            DomainError::Config("Could not find application data directory".to_string())
        })
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig, DomainError> {
        let config_path = self.config_path();

        if config_path.exists() {
            debug!(path = ?config_path, "Loading configuration");
            let content = fs::read_to_string(&config_path)?;
            let config: AppConfig = toml::from_str(&content)?;
            info!(path = ?config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!(path = ?config_path, "Configuration file not found, creating default");
            let config = AppConfig::new();
            self.save(&config)?;
            Ok(config)
        }
    }

    fn save(&self, config: &AppConfig) -> Result<(), DomainError> {
        let config_path = self.config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&config_path, content)?;

        info!(path = ?config_path, "Configuration saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::DEFAULT_COMMAND_TIMEOUT_MS;

    #[test]
    fn test_config_store_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::with_data_dir(dir.path().to_path_buf()).unwrap();

        assert!(store.config_path().ends_with("config.toml"));
        assert!(store.logs_dir().to_string_lossy().contains("logs"));
        assert_eq!(store.data_dir(), dir.path());
    }

    #[test]
    fn test_load_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::with_data_dir(dir.path().to_path_buf()).unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.probes.command_timeout_ms, DEFAULT_COMMAND_TIMEOUT_MS);
        assert!(store.config_path().exists());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::with_data_dir(dir.path().to_path_buf()).unwrap();

        let mut config = AppConfig::new();
        config.probes.command_timeout_ms = 250;
        config.logging.level = "debug".to_string();
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.probes.command_timeout_ms, 250);
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::with_data_dir(dir.path().to_path_buf()).unwrap();
        fs::write(store.config_path(), "probes = [not valid").unwrap();

        assert!(matches!(store.load(), Err(DomainError::Config(_))));
    }
}
