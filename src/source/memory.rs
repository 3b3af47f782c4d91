use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ResourceSource;
use crate::utils::error::{PreviewError, Result};
use crate::utils::path::normalize_address;

/// Resources held in memory, for embedding and tests
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<BTreeMap<String, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(address, text)` pairs
    pub fn with_files<I, A, T>(files: I) -> Self
    where
        I: IntoIterator<Item = (A, T)>,
        A: AsRef<str>,
        T: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(address, text)| (normalize_address(address.as_ref()), text.into()))
            .collect();
        MemorySource {
            files: RwLock::new(files),
        }
    }

    pub async fn insert(&self, address: &str, text: impl Into<String>) {
        self.files
            .write()
            .await
            .insert(normalize_address(address), text.into());
    }

    pub async fn remove(&self, address: &str) -> Option<String> {
        self.files.write().await.remove(&normalize_address(address))
    }
}

#[async_trait]
impl ResourceSource for MemorySource {
    async fn fetch(&self, address: &str) -> Result<String> {
        self.files
            .read()
            .await
            .get(&normalize_address(address))
            .cloned()
            .ok_or_else(|| PreviewError::fetch(address, "not found"))
    }

    async fn list(&self, dir: &str) -> Result<Option<Vec<String>>> {
        let dir = normalize_address(dir);
        let prefix = if dir.is_empty() { dir } else { format!("{}/", dir) };
        let files = self.files.read().await;
        // BTreeMap keys are already sorted
        Ok(Some(
            files
                .keys()
                .filter(|address| address.starts_with(&prefix))
                .cloned()
                .collect(),
        ))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
