use crate::dispatch::{DEFAULT_BATCH_NAME, DispatchOptions};
use crate::error::{ApportionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".apportion.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApportionConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub dispatch: DispatchSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSettings {
    #[serde(default = "default_batch_name")]
    pub batch_name: String,

    #[serde(default = "default_create_workflow")]
    pub create_default_workflow: bool,

    /// Items used when a send supplies no tasks of its own.
    #[serde(default = "default_sample_tasks")]
    pub sample_tasks: Vec<String>,
}

fn default_batch_name() -> String {
    DEFAULT_BATCH_NAME.to_string()
}

fn default_create_workflow() -> bool {
    true
}

fn default_sample_tasks() -> Vec<String> {
    vec!["Sample task 1".to_string(), "Sample task 2".to_string()]
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            batch_name: default_batch_name(),
            create_default_workflow: default_create_workflow(),
            sample_tasks: default_sample_tasks(),
        }
    }
}

impl DispatchSettings {
    pub fn options(&self) -> DispatchOptions {
        DispatchOptions {
            batch_name: self.batch_name.clone(),
            create_default_workflow: self.create_default_workflow,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Daily-rotated JSON log file, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ApportionConfig {
    /// Finds the nearest config file at or above `start_path` and loads it.
    pub fn load(start_path: &Path) -> Result<(Self, PathBuf)> {
        let config_path = Self::find_config_file(start_path)?;
        let content = std::fs::read_to_string(&config_path)?;
        let config: ApportionConfig = toml::from_str(&content)?;
        let project_root = config_path
            .parent()
            .ok_or_else(|| {
                ApportionError::Config("Config file has no parent directory".to_string())
            })?
            .to_path_buf();
        Ok((config, project_root))
    }

    /// Like [`load`](Self::load), but falls back to defaults rooted at
    /// `start_path` when no config file exists.
    pub fn load_or_default(start_path: &Path) -> Result<(Self, PathBuf)> {
        match Self::load(start_path) {
            Err(ApportionError::NotInitialized) => Ok((Self::default(), start_path.to_path_buf())),
            other => other,
        }
    }

    pub fn find_config_file(start_path: &Path) -> Result<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }
            if !current.pop() {
                return Err(ApportionError::NotInitialized);
            }
        }
    }

    pub fn log_path(&self, project_root: &Path) -> Option<PathBuf> {
        self.logging.file.as_ref().map(|f| project_root.join(f))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
