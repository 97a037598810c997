//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::ValidationErrors;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Load a service configuration from a TOML or JSON file.
///
/// The format is chosen by extension: `.toml` is TOML, anything else is
/// read as JSON.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => parse_toml(&content)?,
        _ => parse_json(&content)?,
    };

    tracing::info!(path = %path.display(), services = config.len(), "Service configuration loaded");
    Ok(config)
}

/// Parse a TOML document; each top-level table is one service.
pub fn parse_toml(content: &str) -> Result<ServiceConfig, ConfigError> {
    let value: Value = toml::from_str(content)?;
    Ok(ServiceConfig::from_value(value)?)
}

/// Parse a JSON document; each top-level key is one service.
pub fn parse_json(content: &str) -> Result<ServiceConfig, ConfigError> {
    let value: Value = serde_json::from_str(content)?;
    Ok(ServiceConfig::from_value(value)?)
}
