//! Where preview resources come from.
//!
//! A [`ResourceSource`] turns an address such as `_layouts/post.html` into
//! text. Addresses are always relative to the site root and use forward
//! slashes; each implementation maps them onto its own storage.

mod fs;
mod http;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::utils::error::Result;

pub use fs::FsSource;
pub use http::HttpSource;
pub use memory::MemorySource;

/// Async text fetch by address
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Retrieve the full text of one resource
    async fn fetch(&self, address: &str) -> Result<String>;

    /// Every file address below `dir`, sorted. `None` when the source cannot
    /// enumerate (HTTP); callers then need an explicit manifest.
    async fn list(&self, dir: &str) -> Result<Option<Vec<String>>> {
        let _ = dir;
        Ok(None)
    }

    /// Human readable origin, for logs
    fn describe(&self) -> String;
}

/// Build the source the configuration asks for
pub fn from_config(config: &Config) -> Result<Arc<dyn ResourceSource>> {
    match &config.base_url {
        Some(base_url) => Ok(Arc::new(HttpSource::new(base_url)?)),
        None => Ok(Arc::new(FsSource::new(&config.source))),
    }
}
