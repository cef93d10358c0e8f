//! Configuration management
//!
//! Settings live in `config.toml` under the platform config directory
//! (`~/.config/polar/config.toml` on Linux), or under `--config-dir` when given.

use super::Result;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "polar";
const CONFIG_FILE: &str = "config.toml";

/// Polar deployment a command talks to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Sandbox => "sandbox",
        }
    }

    pub fn server_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.polar.sh",
            Environment::Sandbox => "https://sandbox-api.polar.sh",
        }
    }

    /// Dashboard page where access tokens are created.
    pub fn settings_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://polar.sh/settings",
            Environment::Sandbox => "https://sandbox.polar.sh/settings",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-environment settings
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_org_id: Option<String>,
}

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub default_environment: Environment,
    #[serde(default)]
    pub production: EnvironmentConfig,
    #[serde(default)]
    pub sandbox: EnvironmentConfig,
}

impl Config {
    /// Load configuration from file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, toml_content).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    /// Location of `config.toml`: directly inside `config_dir` when overridden,
    /// otherwise inside the `polar` folder of the platform config directory.
    pub fn config_file_path(config_dir: Option<&Path>) -> Result<PathBuf> {
        match config_dir {
            Some(dir) => Ok(dir.join(CONFIG_FILE)),
            None => {
                let base = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;
                Ok(base.join(APP_DIR).join(CONFIG_FILE))
            }
        }
    }

    pub fn environment(&self, env: Environment) -> &EnvironmentConfig {
        match env {
            Environment::Production => &self.production,
            Environment::Sandbox => &self.sandbox,
        }
    }

    fn environment_mut(&mut self, env: Environment) -> &mut EnvironmentConfig {
        match env {
            Environment::Production => &mut self.production,
            Environment::Sandbox => &mut self.sandbox,
        }
    }

    pub fn default_org_id(&self, env: Environment) -> Option<&str> {
        self.environment(env).default_org_id.as_deref()
    }

    pub fn set_default_org_id(&mut self, env: Environment, org_id: String) {
        self.environment_mut(env).default_org_id = Some(org_id);
    }
}
