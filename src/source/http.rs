use async_trait::async_trait;
use log::debug;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;

use super::ResourceSource;
use crate::utils::error::{PreviewError, Result};
use crate::utils::path::normalize_address;

/// Fetches resources from a running web server, bypassing caches so every
/// preview sees the file as it is now
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| PreviewError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpSource {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, address: &str) -> String {
        format!("{}/{}", self.base_url, normalize_address(address))
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    async fn fetch(&self, address: &str) -> Result<String> {
        let url = self.url_for(address);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| PreviewError::fetch(address, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| PreviewError::fetch(address, e))?;

        response
            .text()
            .await
            .map_err(|e| PreviewError::fetch(address, e))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let source = HttpSource::new("http://localhost:4000/").unwrap();
        assert_eq!(source.url_for("/_layouts/post.html"), "http://localhost:4000/_layouts/post.html");
        assert_eq!(source.url_for("index.html"), "http://localhost:4000/index.html");
    }

    #[tokio::test]
    async fn test_cannot_enumerate() {
        let source = HttpSource::new("http://localhost:4000").unwrap();
        assert!(source.list("_posts").await.unwrap().is_none());
    }
}
