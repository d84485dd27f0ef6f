use crate::error::{PatchOpsError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "PATCHOPS_CONFIG";

/// File name searched for in the current and user configuration directories
pub const CONFIG_FILE: &str = "patchops.toml";

/// Represents the complete configuration for patchops.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Repository used when a command is given no `--repo`
    #[serde(default = "default_repo")]
    pub repo: PathBuf,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

fn default_repo() -> PathBuf {
    PathBuf::from(".")
}

fn default_git() -> String {
    "git".to_string()
}

fn default_diffstat() -> String {
    "diffstat".to_string()
}

fn default_extension() -> String {
    "patch".to_string()
}

/// External programs invoked by the system runner.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolsConfig {
    #[serde(default = "default_git")]
    pub git: String,

    #[serde(default = "default_diffstat")]
    pub diffstat: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            git: default_git(),
            diffstat: default_diffstat(),
        }
    }
}

/// Where exported patches are written.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_repo")]
    pub output_dir: PathBuf,

    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            output_dir: default_repo(),
            extension: default_extension(),
        }
    }
}

impl ExportConfig {
    /// Path of the exported patch for a sanitized subject
    pub fn patch_path(&self, slug: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", slug, self.extension))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repo: default_repo(),
            tools: ToolsConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. Path in the `PATCHOPS_CONFIG` environment variable
/// 3. `patchops.toml` in current directory
/// 4. `patchops.toml` in the user config directory
/// 5. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if let Ok(path) = std::env::var(CONFIG_ENV) {
        PathBuf::from(path)
    } else if Path::new(CONFIG_FILE).exists() {
        PathBuf::from(CONFIG_FILE)
    } else if let Some(path) = dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .filter(|path| path.exists())
    {
        path
    } else {
        debug!("No configuration file found, using defaults");
        return Ok(Config::default());
    };

    debug!("Loading configuration from {}", path.display());
    let config_str = fs::read_to_string(&path).map_err(|e| {
        PatchOpsError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&config_str)
        .map_err(|e| PatchOpsError::config(format!("cannot parse {}: {}", path.display(), e)))
}
