use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::utils::error::{PreviewError, Result};

/// Something that shows a rendered document. Each call replaces whatever was
/// shown before in full.
pub trait DisplaySurface: Send + Sync {
    fn show(&mut self, document: &str) -> Result<()>;
}

/// Writes the document to a file
#[derive(Debug, Clone)]
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSurface { path: path.into() }
    }
}

impl DisplaySurface for FileSurface {
    fn show(&mut self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, document)?;
        debug!("Wrote preview to {}", self.path.display());
        Ok(())
    }
}

/// Prints the document to standard output
#[derive(Debug, Clone, Default)]
pub struct StdoutSurface;

impl DisplaySurface for StdoutSurface {
    fn show(&mut self, document: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(document.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Keeps the last document in memory; clones share it
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    document: Arc<Mutex<Option<String>>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<String> {
        self.document.lock().ok().and_then(|doc| doc.clone())
    }
}

impl DisplaySurface for MemorySurface {
    fn show(&mut self, document: &str) -> Result<()> {
        let mut shown = self
            .document
            .lock()
            .map_err(|_| PreviewError::Surface("memory surface lock poisoned".to_string()))?;
        *shown = Some(document.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_surface_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/preview.html");
        let mut surface = FileSurface::new(&path);

        surface.show("<p>first</p>").unwrap();
        surface.show("<p>second</p>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>second</p>");
    }

    #[test]
    fn test_memory_surface_is_shared() {
        let surface = MemorySurface::new();
        let mut writer = surface.clone();

        assert_eq!(surface.document(), None);
        writer.show("<p>hi</p>").unwrap();
        assert_eq!(surface.document().as_deref(), Some("<p>hi</p>"));
    }
}
