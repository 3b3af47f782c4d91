use log::debug;

use super::resource::{Record, Resource};
use crate::collections::{page_slug, Post};
use crate::config::Config;
use crate::source::ResourceSource;
use crate::utils::error::{PreviewError, Result};

/// The page being previewed and the layouts that wrap it
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Identifier the page was requested by
    pub id: String,
    pub resource: Resource,
    /// Layout named by the page
    pub sub: Option<Resource>,
    /// Layout named by the sub layout
    pub master: Option<Resource>,
    /// Whether the page is a post, which gives it the post slug and date
    pub is_post: bool,
}

impl Page {
    /// Load the page, then its sub layout, then the master layout the sub
    /// layout names. Layouts nest no deeper than two.
    pub async fn load(source: &dyn ResourceSource, config: &Config, id: &str) -> Result<Self> {
        let address = config.page_path(id);
        let resource = Resource::load(source, &address).await?;

        let sub = match resource.layout() {
            Some(name) => Some(load_layout(source, config, name).await?),
            None => None,
        };

        let master = match sub.as_ref().and_then(Resource::layout) {
            Some(name) => Some(load_layout(source, config, name).await?),
            None => None,
        };

        debug!(
            "Page {} uses {} layout(s)",
            id,
            sub.iter().chain(master.iter()).count()
        );

        Ok(Page {
            id: id.to_string(),
            resource,
            sub,
            master,
            is_post: config.is_post(&address),
        })
    }

    /// Same slug the page has in the pages or posts index
    pub fn slug(&self) -> String {
        if self.is_post {
            Post::new(self.resource.clone()).slug
        } else {
            page_slug(&self.resource)
        }
    }

    /// Same record the page has in the pages or posts index
    pub fn to_record(&self) -> Record {
        if self.is_post {
            Post::new(self.resource.clone()).to_record()
        } else {
            self.resource.to_record(&self.slug())
        }
    }

    /// Layouts innermost first
    pub fn layouts(&self) -> impl Iterator<Item = &Resource> {
        self.sub.iter().chain(self.master.iter())
    }
}

/// Try each candidate address for a layout name. Only a failed fetch moves on
/// to the next candidate; a layout that exists but cannot be parsed is an
/// error straight away.
async fn load_layout(source: &dyn ResourceSource, config: &Config, name: &str) -> Result<Resource> {
    let mut last_error = None;
    for candidate in config.layout_candidates(name) {
        match Resource::load(source, &candidate).await {
            Ok(layout) => return Ok(layout),
            Err(e) if e.is_fetch() => last_error = Some(e),
            Err(e) => return Err(e),
        }
    }
    Err(last_error.unwrap_or_else(|| PreviewError::fetch(name, "no layout candidates")))
}
