use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use walkdir::WalkDir;

use super::ResourceSource;
use crate::utils::error::{PreviewError, Result};
use crate::utils::path::normalize_address;

/// Reads resources from a site directory on disk
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FsSource {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an address onto the root; `..` never climbs above it
    fn resolve(&self, address: &str) -> PathBuf {
        let relative = normalize_address(address);
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

#[async_trait]
impl ResourceSource for FsSource {
    async fn fetch(&self, address: &str) -> Result<String> {
        let path = self.resolve(address);
        debug!("Reading {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| PreviewError::fetch(address, e))
    }

    async fn list(&self, dir: &str) -> Result<Option<Vec<String>>> {
        let root = self.root.clone();
        let start = self.resolve(dir);
        if !start.is_dir() {
            return Ok(Some(Vec::new()));
        }

        let addresses = tokio::task::spawn_blocking(move || walk(&root, &start))
            .await
            .map_err(|e| PreviewError::fetch(dir, e))?;
        Ok(Some(addresses))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Relative, slash separated addresses of every file below `start`.
/// Hidden directories (`.git`) are not descended into.
fn walk(root: &Path, start: &Path) -> Vec<String> {
    let mut addresses: Vec<String> = WalkDir::new(start)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path().strip_prefix(root).ok().map(|relative| {
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect();
    addresses.sort();
    addresses
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("_posts")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("index.html"), "---\n---\nhome").unwrap();
        fs::write(dir.path().join("_posts/2024-01-01-a.md"), "---\n---\na").unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_fetch_relative_to_root() {
        let dir = site();
        let source = FsSource::new(dir.path());

        assert_eq!(source.fetch("/index.html").await.unwrap(), "---\n---\nhome");
        assert_eq!(source.fetch("../index.html").await.unwrap(), "---\n---\nhome");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_fetch_error() {
        let dir = site();
        let source = FsSource::new(dir.path());

        let err = source.fetch("missing.html").await.unwrap_err();
        assert!(matches!(err, PreviewError::Fetch { ref url, .. } if url == "missing.html"));
    }

    #[tokio::test]
    async fn test_list_skips_hidden_directories() {
        let dir = site();
        let source = FsSource::new(dir.path());

        let all = source.list("").await.unwrap().unwrap();
        assert_eq!(all, vec!["_posts/2024-01-01-a.md", "index.html"]);

        let posts = source.list("_posts").await.unwrap().unwrap();
        assert_eq!(posts, vec!["_posts/2024-01-01-a.md"]);

        assert!(source.list("_drafts").await.unwrap().unwrap().is_empty());
    }
}
