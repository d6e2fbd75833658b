use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, TaggitError};

/// Represents the complete configuration for taggit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Remote that receives published tags.
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub git: GitConfig,
}

/// How taggit talks to the repository.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process via libgit2
    #[default]
    Libgit2,
    /// By spawning the git executable
    Command,
}

impl std::str::FromStr for Backend {
    type Err = TaggitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "libgit2" | "git2" => Ok(Backend::Libgit2),
            "command" | "cmd" => Ok(Backend::Command),
            other => Err(TaggitError::config(format!(
                "unknown backend '{}' (expected 'libgit2' or 'command')",
                other
            ))),
        }
    }
}

/// Settings for the git executable used by the command backend.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Upper bound for each external git invocation, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_executable() -> String {
    "git".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            executable: default_executable(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: default_remote(),
            backend: Backend::default(),
            git: GitConfig::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document and validate it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| TaggitError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot work at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.remote.trim().is_empty() {
            return Err(TaggitError::config("remote must not be empty"));
        }
        if self.git.executable.trim().is_empty() {
            return Err(TaggitError::config("git.executable must not be empty"));
        }
        if self.git.timeout_secs == 0 {
            return Err(TaggitError::config("git.timeout_secs must be greater than zero"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `taggit.toml` in current directory
/// 3. `.taggit.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Path::new(path).to_path_buf()
    } else if Path::new("./taggit.toml").exists() {
        Path::new("./taggit.toml").to_path_buf()
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(".taggit.toml");
        if !path.exists() {
            return Ok(Config::default());
        }
        path
    } else {
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(&path)
        .map_err(|e| TaggitError::config(format!("cannot read {}: {}", path.display(), e)))?;
    Config::from_toml(&content)
}
