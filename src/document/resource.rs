use log::debug;
use serde_json::Value;

use crate::front_matter::{self, FrontMatter};
use crate::source::ResourceSource;
use crate::utils::error::Result;

/// Template-facing view of a resource: every front matter field plus
/// `slug`, `url` and `content`
pub type Record = serde_json::Map<String, Value>;

/// One text resource with its front matter split off
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Address the text was fetched from
    pub url: String,
    /// Full text as fetched
    pub raw: String,
    pub front_matter: FrontMatter,
    /// Text after the closing delimiter
    pub body: String,
}

impl Resource {
    /// Parse already fetched text
    pub fn parse(url: &str, raw: String) -> Result<Self> {
        let (front_matter, body) = front_matter::parse(&raw).map_err(|e| e.at(url))?;
        let body = body.to_string();
        Ok(Resource {
            url: url.to_string(),
            raw,
            front_matter,
            body,
        })
    }

    /// Fetch and parse. Every call yields a new value, so a slow response can
    /// never overwrite a newer one.
    pub async fn load(source: &dyn ResourceSource, url: &str) -> Result<Self> {
        let raw = source.fetch(url).await?;
        let resource = Self::parse(url, raw)?;
        debug!(
            "Loaded {} ({} front matter field(s))",
            url,
            resource.front_matter.len()
        );
        Ok(resource)
    }

    /// Layout this resource asks to be wrapped in
    pub fn layout(&self) -> Option<&str> {
        self.front_matter.layout()
    }

    /// Build the record exposed to templates
    pub fn to_record(&self, slug: &str) -> Record {
        let mut record = self.front_matter.to_json();
        record.insert("slug".to_string(), Value::String(slug.to_string()));
        record.insert("url".to_string(), Value::String(self.url.clone()));
        record.insert("content".to_string(), Value::String(self.body.clone()));
        record
    }
}
