//! Loading engine configuration from YAML files

use super::schema::EngineConfig;
use super::validate::validate_config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load and validate an engine configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<EngineConfig> {
    let path = config_path.as_ref();
    if !path.exists() {
        return Err(Error::ConfigNotFound { path: path.to_path_buf() });
    }

    let yaml_content = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read config file {}", path.display()), e))?;

    let config = parse_config(&yaml_content)
        .map_err(|message| Error::ConfigParsing { path: path.to_path_buf(), message })?;

    validate_config(&config)?;

    Ok(config)
}

/// Parse a YAML document into an engine configuration without validating it
pub fn parse_config(yaml: &str) -> std::result::Result<EngineConfig, String> {
    // serde_yaml rejects an empty document; treat it as "all defaults"
    if yaml.trim().is_empty() {
        return Ok(EngineConfig::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| e.to_string())
}
