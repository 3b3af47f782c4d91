use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::collections::{PagesDictionary, PostsDictionary};
use crate::config::Config;
use crate::document::{Page, Record};
use crate::site::Site;
use crate::utils::error::Result;

/// The flat render context for one generation. Rebuilt from scratch every
/// time; never updated in place. `content` is added to the JSON form while
/// layouts are rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub pages: BTreeMap<String, Record>,
    #[serde(rename = "_posts")]
    pub posts: BTreeMap<String, Record>,
    #[serde(rename = "_posts_chronological")]
    pub posts_chronological: Vec<Record>,
    #[serde(rename = "_tags")]
    pub tags: BTreeMap<String, BTreeSet<String>>,
    pub site: Map<String, Value>,
    #[serde(rename = "ASSET_PATH")]
    pub asset_path: String,
    #[serde(rename = "HOME_PATH")]
    pub home_path: String,
    #[serde(rename = "BASE_PATH")]
    pub base_path: String,
    pub page: Record,
}

impl Payload {
    /// Render context as JSON, the form every engine accepts
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Merges site, page, dictionaries and configuration into a [`Payload`]
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    config: Arc<Config>,
}

impl PayloadBuilder {
    pub fn new(config: Arc<Config>) -> Self {
        PayloadBuilder { config }
    }

    /// Pure: reads its inputs and fetches nothing
    pub fn build(
        &self,
        site: &Site,
        page: &Page,
        pages: &PagesDictionary,
        posts: &PostsDictionary,
    ) -> Payload {
        let tags = posts.tags.clone();

        // Jekyll templates reach posts and tags through `site`
        let mut site_data = site.data.clone();
        site_data.insert(
            "tags".to_string(),
            serde_json::to_value(&tags).unwrap_or(Value::Null),
        );
        site_data.insert(
            "posts".to_string(),
            Value::Array(
                posts
                    .chronological
                    .iter()
                    .cloned()
                    .map(Value::Object)
                    .collect(),
            ),
        );

        Payload {
            pages: pages.pages.clone(),
            posts: posts.posts.clone(),
            posts_chronological: posts.chronological.clone(),
            tags,
            site: site_data,
            asset_path: self.config.theme_path(),
            home_path: self.config.home_path.clone(),
            base_path: self.config.base_path.clone(),
            page: page.to_record(),
        }
    }
}
