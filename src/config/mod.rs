// ABOUTME: Configuration types and parsing for dockclean.yml.
// ABOUTME: Handles YAML parsing, file discovery, and command-line overrides.

use crate::cleanup::{DEFAULT_MAX_WORKERS, ExecuteOptions};
use crate::error::{Error, Result};
use crate::runtime::{RuntimeConfig, RuntimeType};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "dockclean.yml";
pub const CONFIG_FILENAME_ALT: &str = "dockclean.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".dockclean/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Runtime to use instead of auto-detection.
    #[serde(default)]
    pub runtime: Option<RuntimeType>,

    /// Socket path to use instead of the runtime default.
    #[serde(default)]
    pub socket: Option<String>,

    #[serde(default = "default_force")]
    pub force: bool,

    #[serde(default = "default_max_workers")]
    pub max_workers: NonZeroUsize,

    /// Client timeout for runtime API calls.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_force() -> bool {
    true
}

fn default_max_workers() -> NonZeroUsize {
    DEFAULT_MAX_WORKERS
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: None,
            socket: None,
            force: default_force(),
            max_workers: default_max_workers(),
            timeout: default_timeout(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub runtime: Option<RuntimeType>,
    pub socket: Option<String>,
    pub max_workers: Option<NonZeroUsize>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid config with every default.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        if config.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load an explicitly named file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults when there is none.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(runtime) = overrides.runtime {
            self.runtime = Some(runtime);
        }
        if let Some(socket) = overrides.socket {
            self.socket = Some(socket);
        }
        if let Some(max_workers) = overrides.max_workers {
            self.max_workers = max_workers;
        }
        self
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            runtime: self.runtime,
            socket: self.socket.clone(),
        }
    }

    pub fn execute_options(&self) -> ExecuteOptions {
        ExecuteOptions {
            force: self.force,
            max_workers: self.max_workers,
        }
    }
}
