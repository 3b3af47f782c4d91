use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_yaml::{Mapping, Value};

use crate::config::types::Config;
use crate::config::validation;
use crate::utils::error::{PreviewError, Result};

/// Configuration file names to look for
const CONFIG_FILES: [&str; 3] = ["_preview.yml", "_preview.yaml", "_preview.toml"];

/// Load preview configuration.
///
/// Sources, lowest precedence first: built-in defaults, the config files
/// (explicit ones, or the first default name found in `source_dir`), then
/// `overrides` (typically command line flags). The result is validated.
pub fn load_config<P: AsRef<Path>>(
    source_dir: P,
    config_files: Option<Vec<PathBuf>>,
    overrides: Option<Mapping>,
) -> Result<Config> {
    let source_dir = source_dir.as_ref();

    let config_paths = match config_files {
        Some(paths) => paths,
        None => find_default_config_files(source_dir),
    };

    let mut merged = Mapping::new();
    if config_paths.is_empty() {
        debug!("No configuration files found, using defaults");
    }
    for path in &config_paths {
        debug!("Loading configuration from {}", path.display());
        let file_values = read_config_file(path)?;
        merge_mappings(&mut merged, file_values);
    }
    if let Some(overrides) = overrides {
        merge_mappings(&mut merged, overrides);
    }

    let mut config: Config = serde_yaml::from_value(Value::Mapping(merged))
        .map_err(|e| PreviewError::Config(format!("Invalid configuration: {}", e)))?;

    // A relative source is relative to the directory we were pointed at
    if config.source.is_relative() {
        config.source = if config.source == Path::new(".") {
            source_dir.to_path_buf()
        } else {
            source_dir.join(&config.source)
        };
    }

    validation::validate_config(&config)?;

    debug!("Configuration loaded: {:?}", config);
    Ok(config)
}

/// Find default configuration files; only the first match is used
fn find_default_config_files(source_dir: &Path) -> Vec<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| source_dir.join(name))
        .find(|path| path.exists())
        .into_iter()
        .collect()
}

/// Read one configuration file into a YAML mapping
fn read_config_file(config_path: &Path) -> Result<Mapping> {
    if !config_path.exists() {
        return Err(PreviewError::Config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let content = fs::read_to_string(config_path).map_err(|e| {
        PreviewError::Config(format!(
            "Failed to read configuration file {}: {}",
            config_path.display(),
            e
        ))
    })?;

    let ext = config_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let value = match ext.as_str() {
        "toml" => parse_toml_config(&content, config_path)?,
        "json" => serde_json::from_str::<Value>(&content).map_err(|e| {
            PreviewError::Config(format!(
                "Failed to parse JSON configuration ({}): {}",
                config_path.display(),
                e
            ))
        })?,
        // YAML is assumed for .yml, .yaml and anything else
        _ => serde_yaml::from_str::<Value>(&content).map_err(|e| {
            PreviewError::Config(format!(
                "Failed to parse YAML configuration ({}): {}",
                config_path.display(),
                e
            ))
        })?,
    };

    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(PreviewError::Config(format!(
            "Configuration file {} must contain key/value pairs",
            config_path.display()
        ))),
    }
}

/// Parse a TOML configuration file
fn parse_toml_config(content: &str, path: &Path) -> Result<Value> {
    let toml_value: toml::Value = toml::from_str(content).map_err(|e| {
        PreviewError::Config(format!(
            "Failed to parse TOML configuration ({}): {}",
            path.display(),
            e
        ))
    })?;
    serde_yaml::to_value(toml_value).map_err(|e| PreviewError::Config(e.to_string()))
}

/// Deep merge: nested mappings merge key by key, everything else is replaced
fn merge_mappings(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        if let Value::Mapping(incoming) = value {
            if let Some(Value::Mapping(existing)) = base.get_mut(&key) {
                merge_mappings(existing, incoming);
                continue;
            }
            base.insert(key, Value::Mapping(incoming));
        } else {
            base.insert(key, value);
        }
    }
}
