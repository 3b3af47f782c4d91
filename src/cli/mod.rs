pub mod commands;
pub mod logging;
pub mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_yaml::{Mapping, Value};

use crate::config::{self, Config};
use crate::utils::error::Result;

/// Run the command-line interface
pub async fn run() -> ExitCode {
    let cli = types::Cli::parse();

    logging::init_logging(cli.debug);
    logging::configure_backtrace(cli.trace);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        types::Commands::Render { page, output } => {
            commands::handle_render_command(config, &page, output).await
        }
        types::Commands::Serve {
            host,
            port,
            page,
            watch,
            timeout,
        } => commands::handle_serve_command(config, host, port, page, watch, timeout).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Configuration files, then command line overrides
fn load_config(cli: &types::Cli) -> Result<Config> {
    let source = cli.source.clone().unwrap_or_else(|| PathBuf::from("."));
    config::load_config(&source, cli.config.clone(), Some(overrides(cli)))
}

fn overrides(cli: &types::Cli) -> Mapping {
    let mut overrides = Mapping::new();
    if let Some(base_url) = &cli.base_url {
        overrides.insert("base_url".into(), Value::String(base_url.clone()));
    }
    if let Some(engine) = cli.engine {
        overrides.insert("template_engine".into(), Value::String(engine.to_string()));
    }
    if let Some(theme) = &cli.theme {
        overrides.insert("theme".into(), Value::String(theme.clone()));
    }
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineKind;

    #[test]
    fn test_cli_flags_override_config() {
        let cli = types::Cli::parse_from([
            "rustyll-preview",
            "render",
            "index.html",
            "--engine",
            "tera",
            "--theme",
            "hooligan",
        ]);

        let overrides = overrides(&cli);
        let config: Config = serde_yaml::from_value(Value::Mapping(overrides)).unwrap();
        assert_eq!(config.template_engine, EngineKind::Tera);
        assert_eq!(config.theme, "hooligan");
        assert!(config.base_url.is_none());
    }
}
