use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::adapters::SystemProcessRunner;
use crate::domain::identifier::{extract_cpu_name, extract_hardware_model};
use crate::domain::DomainError;
use crate::ports::{ProcessRunner, SystemIdentifierSource};

// All probe inputs are fixed at compile time. Nothing caller-supplied
// ever reaches a command line.
const SYSCTL_PROGRAM: &str = "sysctl";
const MODEL_PROPERTY_KEY: &str = "hw.model";
const DEFAULTS_PROGRAM: &str = "defaults";
const CPU_NAMES_KEY: &str = "CPU Names";
const PREFERENCES_RELATIVE_PATH: &str = "Library/Preferences/com.apple.SystemProfiler.plist";
const HARDWARE_FILE_RELATIVE_PATH: &str = ".ath/hw.txt";

/// macOS implementation of [`SystemIdentifierSource`].
///
/// - `hw.model` via `sysctl -n`
/// - System Profiler's cached "CPU Names" via `defaults read`
/// - the hardware-description file, read directly
pub struct MacSystemSource {
    runner: Arc<dyn ProcessRunner>,
    preferences_path: Option<PathBuf>,
    hardware_file_path: Option<PathBuf>,
}

impl MacSystemSource {
    /// Create a source with paths under the current user's home directory.
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        let home = dirs::home_dir();
        if home.is_none() {
            warn!("Home directory not found, file-based probes disabled");
        }

        Self {
            runner,
            preferences_path: home.as_ref().map(|h| h.join(PREFERENCES_RELATIVE_PATH)),
            hardware_file_path: home.as_ref().map(|h| h.join(HARDWARE_FILE_RELATIVE_PATH)),
        }
    }

    /// Create a source backed by a [`SystemProcessRunner`] with the given timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Arc::new(SystemProcessRunner::new(timeout)))
    }

    /// Create a source with explicit probe paths.
    pub fn with_paths(
        runner: Arc<dyn ProcessRunner>,
        preferences_path: impl Into<PathBuf>,
        hardware_file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            preferences_path: Some(preferences_path.into()),
            hardware_file_path: Some(hardware_file_path.into()),
        }
    }

    fn read_property(&self, key: &str) -> Result<String, DomainError> {
        let value = self
            .runner
            .try_run(SYSCTL_PROGRAM, &["-n", key])
            .map_err(|e| DomainError::PropertyRead {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if value.trim().is_empty() {
            return Err(DomainError::PropertyRead {
                key: key.to_string(),
                reason: "empty value".to_string(),
            });
        }
        Ok(value)
    }

    fn read_cpu_name(&self) -> Result<Option<String>, DomainError> {
        let path = self
            .preferences_path
            .as_deref()
            .ok_or_else(|| DomainError::Config("no preferences path".to_string()))?;
        let path = path_arg(path)?;

        // A missing plist or key is routine here, so the runner's empty-on-failure
        // form is enough.
        let output = self.runner.run(DEFAULTS_PROGRAM, &["read", path, CPU_NAMES_KEY]);
        Ok(extract_cpu_name(&output))
    }

    fn read_hardware_file(&self) -> Result<Option<String>, DomainError> {
        let path = self
            .hardware_file_path
            .as_deref()
            .ok_or_else(|| DomainError::Config("no hardware file path".to_string()))?;

        let contents = fs::read_to_string(path).map_err(|e| DomainError::CommandExecution {
            program: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(extract_hardware_model(&contents))
    }
}

fn path_arg(path: &Path) -> Result<&str, DomainError> {
    path.to_str()
        .ok_or_else(|| DomainError::Config(format!("non UTF-8 path: {}", path.display())))
}

impl SystemIdentifierSource for MacSystemSource {
    fn raw_model_identifier(&self) -> Option<String> {
        match self.read_property(MODEL_PROPERTY_KEY) {
            Ok(value) => {
                debug!(value = value.trim(), "Read hw.model");
                Some(value)
            }
            Err(e) => {
                warn!(error = %e, "Failed to get model identifier");
                None
            }
        }
    }

    fn cpu_name_fallback(&self) -> Option<String> {
        match self.read_cpu_name() {
            Ok(name) => {
                debug!(name = ?name, "System Profiler CPU name");
                name
            }
            Err(e) => {
                debug!(error = %e, "System Profiler preferences unavailable");
                None
            }
        }
    }

    fn hardware_file_model_line(&self) -> Option<String> {
        match self.read_hardware_file() {
            Ok(line) => {
                debug!(line = ?line, "Hardware file model line");
                line
            }
            Err(e) => {
                debug!(error = %e, "Hardware file unavailable");
                None
            }
        }
    }
}
