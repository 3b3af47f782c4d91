//! Live preview engine for Jekyll-style sites.
//!
//! A preview generation fetches a page, its layouts, the site data, the
//! partials and every page and post, then renders the page content through
//! up to two layouts with Liquid or Tera. [`preview::PreviewController`] runs
//! one generation; [`preview::PreviewService`] drives it from page change
//! events on its own task.

pub mod builder;
pub mod cli;
pub mod collections;
pub mod config;
pub mod document;
pub mod front_matter;
pub mod markdown;
pub mod preview;
pub mod server;
pub mod site;
pub mod source;
pub mod template;
pub mod utils;

pub use config::{Config, EngineKind};
pub use preview::{PreviewController, PreviewService, PreviewState, Snapshot};
pub use utils::error::{PreviewError, Result};
