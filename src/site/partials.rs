use std::collections::BTreeMap;

use futures::future::join_all;
use log::{debug, warn};

use crate::config::Config;
use crate::source::ResourceSource;
use crate::utils::error::{PreviewError, Result};

/// Include fragments keyed by their name relative to the includes directory
/// (`nav.html`). Partials are plain template text with no front matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partials {
    pub templates: BTreeMap<String, String>,
}

impl Partials {
    /// Fetch every configured (or listed) partial concurrently
    pub async fn load(source: &dyn ResourceSource, config: &Config) -> Result<Self> {
        let names = partial_names(source, config).await?;

        let results = join_all(names.iter().map(|name| async move {
            let text = source.fetch(&config.partial_path(name)).await?;
            Ok::<_, PreviewError>((name.clone(), text))
        }))
        .await;

        let mut templates = BTreeMap::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok((name, text)) => {
                    templates.insert(name, text);
                }
                Err(e) => failures.push(e),
            }
        }

        if !failures.is_empty() {
            return Err(PreviewError::AggregateFailure {
                collection: "partials".to_string(),
                failures,
            });
        }

        debug!("Loaded {} partial(s)", templates.len());
        Ok(Partials { templates })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

async fn partial_names(source: &dyn ResourceSource, config: &Config) -> Result<Vec<String>> {
    if !config.partials.is_empty() {
        return Ok(config.partials.clone());
    }

    let prefix = format!("{}/", config.includes_dir.trim_end_matches('/'));
    match source.list(&config.includes_dir).await? {
        Some(addresses) => Ok(addresses
            .into_iter()
            .filter_map(|address| address.strip_prefix(&prefix).map(str::to_string))
            .collect()),
        None => {
            warn!(
                "{} cannot be listed and no partials are configured",
                source.describe()
            );
            Ok(Vec::new())
        }
    }
}
