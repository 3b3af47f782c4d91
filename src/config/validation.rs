use log::{info, warn};

use crate::config::Config;
use crate::utils::error::{PreviewError, Result};

/// Validate the configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_source(config)?;
    validate_directories(config)?;
    validate_extensions(config);
    Ok(())
}

/// Either a reachable base URL or an existing source directory
fn validate_source(config: &Config) -> Result<()> {
    if let Some(base_url) = &config.base_url {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(PreviewError::Config(format!(
                "base_url must be an http(s) URL: {}",
                base_url
            )));
        }
        info!("Fetching resources from {}", base_url);
        return Ok(());
    }

    let source = &config.source;
    if !source.exists() {
        return Err(PreviewError::Config(format!(
            "Source directory does not exist: {}",
            source.display()
        )));
    }
    if !source.is_dir() {
        return Err(PreviewError::Config(format!(
            "Source path is not a directory: {}",
            source.display()
        )));
    }

    info!("Source directory: {}", source.display());
    Ok(())
}

/// Site directories are addresses inside the source and may not escape it
fn validate_directories(config: &Config) -> Result<()> {
    let dirs = [
        ("layouts_dir", &config.layouts_dir),
        ("includes_dir", &config.includes_dir),
        ("posts_dir", &config.posts_dir),
    ];

    for (name, dir) in dirs {
        if dir.split(['/', '\\']).any(|segment| segment == "..") {
            return Err(PreviewError::Config(format!(
                "{} must stay inside the site: {}",
                name, dir
            )));
        }
    }

    if config.asset_path.trim().is_empty() {
        return Err(PreviewError::Config("asset_path must not be empty".to_string()));
    }

    Ok(())
}

fn validate_extensions(config: &Config) {
    if config.layout_extensions.is_empty() {
        warn!("No layout_extensions configured; layouts must be named with their extension");
    }
    if config.markdown && config.markdown_ext.is_empty() {
        warn!("Markdown conversion is on but markdown_ext is empty");
    }
}
