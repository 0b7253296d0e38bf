//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents (`~/.config/paperqc/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data folder override
    pub root_folder: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Remote AI reviewer configuration (absent = AI review disabled)
    pub ai: Option<AiConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Remote AI reviewer endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Chat-completion endpoint URL
    pub api_url: Option<String>,

    /// API key (bearer token)
    pub api_key: String,

    /// Model name (defaults to the service's compiled default)
    pub model: Option<String>,
}

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(root_folder) = config.root_folder {
            return PathBuf::from(root_folder);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Load the TOML configuration file, if present
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Locate the configuration file for the platform
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir()
        .map(|d| d.join("paperqc").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if user_config.exists() {
        return Ok(user_config);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/paperqc/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config(format!(
        "Config file not found: {}",
        user_config.display()
    )))
}

/// OS-dependent default data folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("paperqc"))
        .unwrap_or_else(|| PathBuf::from("./paperqc_data"))
}

/// Create the data folder if it does not exist yet
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        tracing::info!(root_folder = %root.display(), "Created data folder");
    }
    Ok(())
}

/// Database file location inside the data folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join("paperqc.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_arg_wins_over_everything() {
        let resolved = resolve_root_folder(Some("/tmp/paperqc-cli"), "PAPERQC_TEST_UNSET_VAR");
        assert_eq!(resolved, PathBuf::from("/tmp/paperqc-cli"));
    }

    #[test]
    fn env_var_used_when_no_cli_arg() {
        std::env::set_var("PAPERQC_TEST_ROOT_VAR", "/tmp/paperqc-env");
        let resolved = resolve_root_folder(None, "PAPERQC_TEST_ROOT_VAR");
        std::env::remove_var("PAPERQC_TEST_ROOT_VAR");
        assert_eq!(resolved, PathBuf::from("/tmp/paperqc-env"));
    }

    #[test]
    fn ensure_root_folder_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("data");
        ensure_root_folder(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn toml_config_parses_ai_section() {
        let config: TomlConfig = toml::from_str(
            r#"
            root_folder = "/srv/paperqc"

            [logging]
            level = "debug"

            [ai]
            api_key = "sk-test"
            model = "qwen-max"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder.as_deref(), Some("/srv/paperqc"));
        assert_eq!(config.logging.level, "debug");
        let ai = config.ai.unwrap();
        assert_eq!(ai.api_key, "sk-test");
        assert_eq!(ai.model.as_deref(), Some("qwen-max"));
        assert!(ai.api_url.is_none());
    }
}
