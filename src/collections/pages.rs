use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

use super::{load_all, page_addresses};
use crate::config::Config;
use crate::document::{Record, Resource};
use crate::source::ResourceSource;
use crate::utils::error::Result;
use crate::utils::path::strip_extension;

/// Every page on the site keyed by slug
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PagesDictionary {
    pub pages: BTreeMap<String, Record>,
}

impl PagesDictionary {
    /// Enumerate, fetch and index every page
    pub async fn load(source: &dyn ResourceSource, config: &Config) -> Result<Self> {
        let addresses = page_addresses(source, config).await?;
        let resources = load_all(source, "pages", &addresses).await?;
        Ok(Self::from_resources(resources))
    }

    /// Index resources by slug; on a duplicate slug the later resource wins
    pub fn from_resources(resources: Vec<Resource>) -> Self {
        let mut pages = BTreeMap::new();
        for resource in resources {
            let slug = page_slug(&resource);
            if let Some(previous) = pages.insert(slug.clone(), resource.to_record(&slug)) {
                warn!(
                    "Page slug '{}' is used by {} and {}; keeping the latter",
                    slug,
                    previous.get("url").and_then(|u| u.as_str()).unwrap_or("?"),
                    resource.url
                );
            }
        }
        PagesDictionary { pages }
    }

    pub fn get(&self, slug: &str) -> Option<&Record> {
        self.pages.get(slug)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Explicit `slug`, otherwise the address without its extension
pub(crate) fn page_slug(resource: &Resource) -> String {
    match resource.front_matter.slug() {
        Some(slug) => slug.to_string(),
        None => strip_extension(&resource.url).to_string(),
    }
}
