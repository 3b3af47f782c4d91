use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Result as NotifyResult, Watcher};
use tokio::sync::mpsc;

use crate::preview::PreviewService;
use crate::utils::error::{PreviewError, Result};

/// Watch the site directory and refresh the preview after each burst of
/// changes. Events inside hidden directories (`.git`) are ignored. The
/// watcher stops when the returned value is dropped.
pub fn watch_source<P: AsRef<Path>>(
    directory: P,
    service: Arc<PreviewService>,
    debounce: Duration,
) -> Result<RecommendedWatcher> {
    let directory = directory.as_ref().to_path_buf();
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();

    let root = directory.clone();
    let mut watcher = notify::recommended_watcher(move |res: NotifyResult<Event>| match res {
        Ok(event) => {
            if is_relevant(&event) && !event.paths.iter().all(|p| is_hidden(&root, p)) {
                // The receiver only goes away when the server shuts down
                let _ = tx.send(event);
            }
        }
        Err(e) => error!("Watch error: {}", e),
    })
    .map_err(|e| PreviewError::Config(format!("Failed to create file watcher: {}", e)))?;

    watcher
        .watch(&directory, RecursiveMode::Recursive)
        .map_err(|e| PreviewError::Config(format!("Failed to watch {}: {}", directory.display(), e)))?;
    info!("Watching for changes in {}", directory.display());

    tokio::spawn(async move {
        while let Some(first) = rx.recv().await {
            debug!("Change detected: {:?}", first.paths);

            // Swallow the rest of the burst
            loop {
                match tokio::time::timeout(debounce, rx.recv()).await {
                    Ok(Some(_)) => continue,
                    Ok(None) => return,
                    Err(_) => break,
                }
            }

            if let Some(generation) = service.refresh() {
                info!("Source changed, regenerating preview (generation {})", generation);
            }
        }
    });

    Ok(watcher)
}

fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Modify(ModifyKind::Any)
            | EventKind::Remove(_)
    )
}

/// True when any component below `root` starts with a dot
fn is_hidden(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}
