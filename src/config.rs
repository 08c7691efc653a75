use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use crate::models::{Area, View};

#[derive(Deserialize)]
pub struct ApiParameters {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

#[derive(Deserialize)]
pub struct DashboardParameters {
    pub area: Area,
    pub view: View,
}

#[derive(Deserialize)]
pub struct MailParameters {
    pub smtp_user: String,
    pub smtp_password: String,
    pub smtp_endpoint: String,
    pub from: String,
    pub to: String,
}

#[derive(Deserialize)]
pub struct Files {
    pub report_dir: String,
    #[serde(default = "default_retention_hours")]
    pub retention_hours: i64,
}

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
pub struct Config {
    pub api: ApiParameters,
    pub dashboard: DashboardParameters,
    pub mail: Option<MailParameters>,
    pub files: Files,
    pub general: General,
}

fn default_timeout_secs() -> u64 { 30 }
fn default_history_days() -> u32 { 30 }
fn default_history_limit() -> u32 { 5000 }
fn default_retention_hours() -> i64 { 48 }

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, LoadConfigurationError> {
    let toml = fs::read_to_string(config_path)
        .map_err(|e| LoadConfigurationError::Read(format!("{}: {}", config_path, e)))?;

    parse_config(&toml)
}

/// Parses and validates configuration
///
/// # Arguments
///
/// * 'toml' - configuration in toml format
fn parse_config(toml: &str) -> Result<Config, LoadConfigurationError> {
    let mut config: Config = toml::from_str(toml)?;

    config.api.base_url = config.api.base_url.trim().trim_end_matches('/').to_string();
    if config.api.base_url.is_empty() {
        return Err(LoadConfigurationError::Invalid("api.base_url is missing".into()));
    }
    if config.api.history_days == 0 {
        return Err(LoadConfigurationError::Invalid("api.history_days must be at least 1".into()));
    }
    if !config.files.report_dir.is_empty() && !config.files.report_dir.ends_with('/') {
        config.files.report_dir.push('/');
    }

    Ok(config)
}

/// Error depicting errors that occur while loading the configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("ReadError: {0}")]
    Read(String),
    #[error("ParseError: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("InvalidError: {0}")]
    Invalid(String),
}
