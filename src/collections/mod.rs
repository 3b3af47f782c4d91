//! Slug indexed dictionaries of every page and post on the site.

mod date;
mod pages;
mod posts;

use futures::future::join_all;
use log::{debug, warn};

use crate::config::Config;
use crate::document::Resource;
use crate::source::ResourceSource;
use crate::utils::error::{PreviewError, Result};
use crate::utils::path::{is_reserved, normalize_address};

pub use date::{format_date, parse_date, parse_date_str};
pub(crate) use pages::page_slug;
pub use pages::PagesDictionary;
pub use posts::{Post, PostsDictionary};

/// Fetch and parse every address concurrently. Resolves only once all of
/// them have; any failure fails the whole collection.
pub async fn load_all(
    source: &dyn ResourceSource,
    collection: &str,
    addresses: &[String],
) -> Result<Vec<Resource>> {
    let results = join_all(
        addresses
            .iter()
            .map(|address| Resource::load(source, address)),
    )
    .await;

    let mut resources = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(resource) => resources.push(resource),
            Err(e) => failures.push(e),
        }
    }

    if !failures.is_empty() {
        return Err(PreviewError::AggregateFailure {
            collection: collection.to_string(),
            failures,
        });
    }

    debug!("Loaded {} {}", resources.len(), collection);
    Ok(resources)
}

/// Page addresses: the configured list, otherwise every content file outside
/// `_` and `.` directories
pub async fn page_addresses(source: &dyn ResourceSource, config: &Config) -> Result<Vec<String>> {
    if !config.pages.is_empty() {
        return Ok(config.pages.iter().map(|p| normalize_address(p)).collect());
    }

    match source.list("").await? {
        Some(all) => Ok(all
            .into_iter()
            .filter(|address| config.is_content(address) && !is_reserved(address))
            .collect()),
        None => {
            warn!(
                "{} cannot be listed and no pages are configured; the pages index is empty",
                source.describe()
            );
            Ok(Vec::new())
        }
    }
}

/// Post addresses: the configured list, otherwise every content file in the
/// posts directory
pub async fn post_addresses(source: &dyn ResourceSource, config: &Config) -> Result<Vec<String>> {
    if !config.posts.is_empty() {
        return Ok(config.posts.iter().map(|p| normalize_address(p)).collect());
    }

    match source.list(&config.posts_dir).await? {
        Some(all) => Ok(all
            .into_iter()
            .filter(|address| config.is_content(address))
            .collect()),
        None => {
            warn!(
                "{} cannot be listed and no posts are configured; the posts index is empty",
                source.describe()
            );
            Ok(Vec::new())
        }
    }
}
