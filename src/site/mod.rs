//! Global site variables and the partials templates may include.

mod partials;

use log::debug;
use serde_json::{Map, Value};

use crate::builder::yaml::yaml_to_json;
use crate::config::Config;
use crate::front_matter::parse_data;
use crate::source::ResourceSource;
use crate::utils::error::Result;

pub use partials::Partials;

/// Site wide variables read from the configured data file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Site {
    pub data: Map<String, Value>,
}

impl Site {
    /// Fetch and parse the data file. With no data file configured the site
    /// is empty.
    pub async fn load(source: &dyn ResourceSource, config: &Config) -> Result<Self> {
        let address = match &config.data_file {
            Some(address) => address,
            None => return Ok(Site::default()),
        };

        let raw = source.fetch(address).await?;
        let mapping = parse_data(&raw).map_err(|e| e.at(address))?;
        let data = match yaml_to_json(serde_yaml::Value::Mapping(mapping)) {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        debug!("Loaded {} site variable(s) from {}", data.len(), address);
        Ok(Site { data })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crate::utils::error::PreviewError;

    #[tokio::test]
    async fn test_load_data_file() {
        let source = MemorySource::with_files([(
            "_config.yml",
            "title: My Blog\nauthor:\n  name: Sam\n",
        )]);
        let site = Site::load(&source, &Config::default()).await.unwrap();

        assert_eq!(site.get("title").unwrap(), "My Blog");
        assert_eq!(site.data["author"]["name"], "Sam");
    }

    #[tokio::test]
    async fn test_no_data_file_is_empty() {
        let config = Config {
            data_file: None,
            ..Config::default()
        };
        let site = Site::load(&MemorySource::new(), &config).await.unwrap();
        assert!(site.data.is_empty());
    }

    #[tokio::test]
    async fn test_non_mapping_data_is_malformed() {
        let source = MemorySource::with_files([("_config.yml", "- a\n- b\n")]);
        let err = Site::load(&source, &Config::default()).await.unwrap_err();
        assert!(matches!(err, PreviewError::MalformedFrontMatter { .. }));
    }
}
