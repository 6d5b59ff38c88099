use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::TomlConfigStore;
use crate::app::ModelResolver;
use crate::domain::{AppConfig, DomainError, ResolvedModel};
use crate::infrastructure::init_logging;
use crate::ports::ConfigStore;

/// Application controller: loads configuration, sets up logging and owns
/// the handle to the process-wide resolver.
pub struct AppController {
    config: AppConfig,
    config_path: PathBuf,
    resolver: &'static ModelResolver,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize from the default OS-specific config location.
    pub fn new() -> Result<Self, DomainError> {
        let store = TomlConfigStore::new()?;
        Self::with_store(&store)
    }

    /// Initialize from an explicit config store.
    pub fn with_store(store: &dyn ConfigStore) -> Result<Self, DomainError> {
        let config = store.load()?;
        let log_guard = init_logging(&store.logs_dir(), &config.logging)?;

        let resolver = ModelResolver::init_global(config.probes.command_timeout());

        info!(
            command_timeout_ms = config.probes.command_timeout_ms,
            "AppController initialized"
        );

        Ok(Self {
            config,
            config_path: store.config_path(),
            resolver,
            _log_guard: log_guard,
        })
    }

    /// Build a controller around an already constructed resolver.
    pub fn from_parts(config: AppConfig, resolver: &'static ModelResolver) -> Self {
        Self {
            config,
            config_path: PathBuf::new(),
            resolver,
            _log_guard: None,
        }
    }

    /// Start resolution on a background thread so the first accessor call is cheap.
    pub fn spawn_resolution(&self) -> JoinHandle<ResolvedModel> {
        let resolver = self.resolver;
        thread::spawn(move || resolver.resolve())
    }

    pub fn resolve(&self) -> ResolvedModel {
        self.resolver.resolve()
    }

    pub fn resolved_product_name(&self) -> String {
        self.resolver.product_name()
    }

    pub fn display_size_inches(&self) -> f32 {
        self.resolver.display_size_inches()
    }

    pub fn model_identifier(&self) -> String {
        self.resolver.model_identifier()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolver.is_resolved()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> String {
        self.config_path.to_string_lossy().to_string()
    }
}
