//! Configuration System
//!
//! Layered shell configuration: built-in defaults, then the global config file,
//! then an explicitly named file, then `NESTCLI_*` environment variables.
//! Nested keys use `__` in environment names, e.g. `NESTCLI_HISTORY__SIZE=500`.

use crate::error::DispatchError;
use crate::logging::LoggingConfig;
use crate::shell::DEFAULT_PROMPT;
use config::{Config, ConfigBuilder, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const APP_NAME: &str = "nestcli";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Prompt shown before each line
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Printed once when the prompt loop starts
    #[serde(default)]
    pub banner: String,

    /// Whether Ctrl-C at the prompt ends the loop with an error
    #[serde(default)]
    pub ctrl_c_aborts: bool,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// History persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// History file; defaults to the platform data directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Maximum number of remembered lines
    #[serde(default = "default_history_size")]
    pub size: usize,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_history_size() -> usize {
    1000
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            banner: String::new(),
            ctrl_c_aborts: false,
            history: HistoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            file: None,
            size: default_history_size(),
        }
    }
}

impl HistoryConfig {
    /// Where history is read from and written to, if anywhere.
    pub fn resolve_path(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        self.file.clone().or_else(default_history_path)
    }
}

impl ShellConfig {
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.prompt.is_empty() {
            return Err(DispatchError::Config("prompt cannot be empty".to_string()));
        }
        if self.history.enabled && self.history.size == 0 {
            return Err(DispatchError::Config(
                "history.size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

pub fn default_history_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("history"))
}

/// Path to the global config file, e.g. `~/.config/nestcli/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from every source, `explicit` taking precedence over
    /// the global file.
    pub fn load(explicit: Option<&Path>) -> Result<ShellConfig, DispatchError> {
        let mut builder = Self::builder_with_defaults()?;

        if let Some(global) = global_config_path() {
            if global.exists() {
                debug!(config_path = %global.display(), "loading global config");
                builder = builder.add_source(File::from(global).required(false));
            }
        }

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("NESTCLI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Load defaults plus a single file, ignoring global and environment sources.
    pub fn load_from_file(path: &Path) -> Result<ShellConfig, DispatchError> {
        let builder = Self::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        Self::finish(builder)
    }

    fn builder_with_defaults(
    ) -> Result<ConfigBuilder<config::builder::DefaultState>, DispatchError> {
        Ok(Config::builder()
            .set_default("prompt", DEFAULT_PROMPT)?
            .set_default("history.size", default_history_size() as i64)?)
    }

    fn finish(
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ShellConfig, DispatchError> {
        let config: ShellConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
