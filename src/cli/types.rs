use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::EngineKind;

/// Main CLI parser structure
#[derive(Parser)]
#[command(name = "rustyll-preview")]
#[command(about = "Live preview for Jekyll-style sites", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Site source directory (defaults to ./)
    #[arg(short, long, value_name = "DIR", global = true)]
    pub source: Option<PathBuf>,

    /// Custom configuration file, may be repeated
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<Vec<PathBuf>>,

    /// Fetch resources from this URL instead of the source directory
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Template engine
    #[arg(short, long, value_enum, global = true)]
    pub engine: Option<EngineKind>,

    /// Theme name used for ASSET_PATH
    #[arg(long, value_name = "NAME", global = true)]
    pub theme: Option<String>,

    /// Show the full backtrace when an error occurs
    #[arg(short, long, default_value_t = false, global = true)]
    pub trace: bool,

    /// Enable verbose debugging
    #[arg(short = 'g', long, default_value_t = false, global = true)]
    pub debug: bool,
}

/// Subcommands for the CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Render one page and print it or write it to a file
    #[command(alias = "r")]
    Render {
        /// Page to render, relative to the site root (e.g. about.html)
        page: String,

        /// Write the document here instead of standard output
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Serve live previews over HTTP
    #[command(alias = "s")]
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short = 'P', long, default_value_t = 4000)]
        port: u16,

        /// Page to render on startup
        #[arg(long, value_name = "PAGE")]
        page: Option<String>,

        /// Regenerate the current page when source files change
        #[arg(short = 'w', long, default_value_t = false)]
        watch: bool,

        /// Seconds a preview request waits for its page
        #[arg(long, value_name = "SECONDS", default_value_t = 30)]
        timeout: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from([
            "rustyll-preview",
            "render",
            "about.html",
            "--engine",
            "tera",
            "-o",
            "out.html",
        ]);

        assert_eq!(cli.engine, Some(EngineKind::Tera));
        match cli.command {
            Commands::Render { page, output } => {
                assert_eq!(page, "about.html");
                assert_eq!(output, Some(PathBuf::from("out.html")));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["rustyll-preview", "serve", "-w"]);
        match cli.command {
            Commands::Serve { host, port, watch, page, timeout } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 4000);
                assert!(watch);
                assert!(page.is_none());
                assert_eq!(timeout, 30);
            }
            _ => panic!("expected serve"),
        }
    }
}
