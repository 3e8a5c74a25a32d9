//! vs-config: generator configuration file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_config};

use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported config file extension: {extension}")]
    UnknownFormat { extension: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ConfigResult<GeneratorConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: GeneratorConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &GeneratorConfig) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ConfigResult<GeneratorConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: GeneratorConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_json(path: &Path, config: &GeneratorConfig) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a config file, picking the format from the extension.
///
/// `.json` is parsed as JSON; `.yaml`, `.yml` and extensionless files as YAML.
pub fn load_path(path: &Path) -> ConfigResult<GeneratorConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        Some("yaml") | Some("yml") | None => load_yaml(path),
        Some(other) => Err(ConfigError::UnknownFormat {
            extension: other.to_string(),
        }),
    }
}
