/// Configuration management for wordsub
///
/// Wordsub stores configuration in ~/.wordsub/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::tokenizer::DEFAULT_TOKEN_LIMIT;

/// Wordsub configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Processing settings
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable debug logging to file
    #[serde(default = "default_debug")]
    pub debug: Option<bool>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { debug: Some(false) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Token buffer capacity in bytes
    #[serde(default = "default_token_buffer_len")]
    pub token_buffer_len: Option<usize>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            token_buffer_len: Some(DEFAULT_TOKEN_LIMIT),
        }
    }
}

// Default functions for serde
fn default_debug() -> Option<bool> {
    Some(false)
}
fn default_token_buffer_len() -> Option<usize> {
    Some(DEFAULT_TOKEN_LIMIT)
}

/// Get the configuration file path
pub fn config_file_path() -> Result<PathBuf> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;

    let config_dir = home_dir.join(".wordsub");
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;

    Ok(config_dir.join("config.toml"))
}

/// Get the default configuration file content with comments
fn get_default_config_content() -> &'static str {
    r#"# Wordsub Configuration File
#
# This file controls default behavior for wordsub. Values set here apply to
# every invocation.

[logging]
# Enable debug logging to file (default: false)
# Logs go to /var/log/wordsub.log if writable, otherwise ~/.wordsub/wordsub.log
debug = false

[processing]
# Token buffer capacity in bytes (default: 1000)
# Words longer than this are processed in fragments; a search word longer
# than the buffer can never match.
token_buffer_len = 1000
"#
}

/// Save the default commented configuration file
pub fn save_default_config() -> Result<()> {
    let config_path = config_file_path()?;

    fs::write(&config_path, get_default_config_content()).with_context(|| {
        format!("Failed to write default config file: {}", config_path.display())
    })?;

    Ok(())
}

/// Load configuration from file, creating default if needed
///
/// If the config file doesn't exist, creates it with defaults and returns them.
/// If the config file is malformed, recreates it with defaults.
pub fn load_config() -> Result<Config> {
    let config_path = config_file_path()?;

    // Create default config file if it doesn't exist
    if !config_path.exists() {
        save_default_config()?;
    }

    let config_str = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    // Try to parse the config
    let config: Config = match toml::from_str(&config_str) {
        Ok(config) => config,
        Err(_) => {
            // Config is malformed, recreate with defaults
            save_default_config()?;
            return Ok(Config::default());
        }
    };

    Ok(config)
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(len) = config.processing.token_buffer_len {
        if len < 1 {
            anyhow::bail!("Invalid token_buffer_len: {} (must be at least 1)", len);
        }
    }

    Ok(())
}

impl Config {
    /// Effective token buffer limit.
    pub fn token_limit(&self) -> usize {
        self.processing.token_buffer_len.unwrap_or(DEFAULT_TOKEN_LIMIT)
    }

    /// Whether debug logging is enabled.
    pub fn debug_logging(&self) -> bool {
        self.logging.debug.unwrap_or(false)
    }
}
