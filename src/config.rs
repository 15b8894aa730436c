use crate::error::{DigestError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Text,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default = "default_keyword_count")]
    pub keyword_count: usize,
    #[serde(default = "default_true")]
    pub include_quality: bool,
    #[serde(default = "default_true")]
    pub include_keywords: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_keyword_count() -> usize {
    crate::processing::DEFAULT_KEYWORD_COUNT
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_format: OutputFormat::default(),
            keyword_count: default_keyword_count(),
            include_quality: default_true(),
            include_keywords: default_true(),
            log_level: default_log_level(),
        }
    }
}

const CONFIG_KEYS: &[&str] = &[
    "output_format",
    "keyword_count",
    "include_quality",
    "include_keywords",
    "log_level",
];

pub fn get_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir()
        .ok_or_else(|| DigestError::Internal("Failed to get config directory".to_string()))?;

    path.push("paper-digest");
    fs::create_dir_all(&path)?;

    path.push("config.json");
    Ok(path)
}

/// What loading did to the config file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Existing,
    /// The file was missing and the defaults were written
    Created,
    /// Keys missing from an older file were written back
    Backfilled,
}

/// Loads the user config, writing the defaults on first use.
pub fn load_config() -> Result<Config> {
    load_or_create(&get_config_path()?).map(|(config, _)| config)
}

/// Loads `path`, creating it with the defaults when absent.
pub fn load_or_create(path: &Path) -> Result<(Config, ConfigOrigin)> {
    if !path.exists() {
        let default_config = Config::default();
        write_config(path, &default_config)?;
        return Ok((default_config, ConfigOrigin::Created));
    }

    let (config, needs_backfill) = read_config(path)?;

    // Older files miss newer keys; persist them so the file documents itself.
    if needs_backfill {
        write_config(path, &config)?;
        return Ok((config, ConfigOrigin::Backfilled));
    }

    Ok((config, ConfigOrigin::Existing))
}

/// Loads a config from an explicit path. Missing keys take their defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(DigestError::NotFound(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    read_config(path).map(|(config, _)| config)
}

pub fn save_config(config: &Config) -> Result<()> {
    let config_path = get_config_path()?;
    write_config(&config_path, config)
}

fn read_config(path: &Path) -> Result<(Config, bool)> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| DigestError::Config(format!("Failed to parse config: {}", e)))?;
    let config: Config = serde_json::from_value(value.clone())
        .map_err(|e| DigestError::Config(format!("Failed to parse config: {}", e)))?;

    if config.keyword_count == 0 {
        return Err(DigestError::Config(
            "keyword_count must be at least 1".to_string(),
        ));
    }

    let needs_backfill = value
        .as_object()
        .map(|obj| CONFIG_KEYS.iter().any(|key| !obj.contains_key(*key)))
        .unwrap_or(false);

    Ok((config, needs_backfill))
}

fn write_config(path: &Path, config: &Config) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| DigestError::Internal(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, content)?;

    Ok(())
}
