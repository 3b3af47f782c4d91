use std::time::Duration;

use log::{debug, info};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::controller::{PreviewController, PreviewInputs};
use super::state::PreviewState;
use crate::utils::error::{PreviewError, Result};

/// Latest page request. Only the newest one is ever acted on.
#[derive(Debug, Clone, Default)]
struct Request {
    page_id: Option<String>,
    generation: u64,
}

/// What the controller last published
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// Request this snapshot answers; bumps on every navigate or refresh
    pub generation: u64,
    pub page_id: Option<String>,
    pub state: PreviewState,
    /// Last document shown, which may belong to an earlier generation when
    /// the current one failed
    pub output: Option<String>,
    pub error: Option<String>,
}

enum Step {
    Fetched(Result<PreviewInputs>),
    Superseded,
    Closed,
}

/// Owns a [`PreviewController`] on its own task and feeds it page change
/// events.
///
/// Generations are single flight: a navigation that arrives while the
/// previous one is still fetching drops that fetch and starts over, so a
/// slow, stale generation can never overwrite a newer one.
pub struct PreviewService {
    requests: watch::Sender<Request>,
    snapshots: watch::Receiver<Snapshot>,
    worker: JoinHandle<()>,
}

impl PreviewService {
    /// Start the worker task. Must be called inside a Tokio runtime.
    pub fn spawn(controller: PreviewController) -> Self {
        let (requests, request_rx) = watch::channel(Request::default());
        let (snapshot_tx, snapshots) = watch::channel(Snapshot::default());
        let worker = tokio::spawn(run(controller, request_rx, snapshot_tx));

        PreviewService {
            requests,
            snapshots,
            worker,
        }
    }

    /// Show `page_id`, superseding anything in flight. Returns the
    /// generation that will answer this request.
    pub fn navigate(&self, page_id: &str) -> u64 {
        let mut generation = 0;
        self.requests.send_modify(|request| {
            request.page_id = Some(page_id.to_string());
            request.generation += 1;
            generation = request.generation;
        });
        generation
    }

    /// Regenerate the current page, if there is one
    pub fn refresh(&self) -> Option<u64> {
        let mut generation = None;
        self.requests.send_if_modified(|request| {
            if request.page_id.is_none() {
                return false;
            }
            request.generation += 1;
            generation = Some(request.generation);
            true
        });
        generation
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Navigate and wait until a generation at least as new as this request
    /// has finished
    pub async fn navigate_and_wait(&self, page_id: &str, timeout: Duration) -> Result<Snapshot> {
        let mut snapshots = self.subscribe();
        let generation = self.navigate(page_id);

        let wait = async {
            loop {
                {
                    let snapshot = snapshots.borrow_and_update();
                    if snapshot.generation >= generation && snapshot.state.is_terminal() {
                        return Ok(snapshot.clone());
                    }
                }
                snapshots
                    .changed()
                    .await
                    .map_err(|_| PreviewError::ServiceStopped)?;
            }
        };

        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| PreviewError::Timeout {
                page: page_id.to_string(),
            })?
    }

    /// Stop the worker
    pub async fn shutdown(self) {
        let PreviewService {
            requests, worker, ..
        } = self;
        drop(requests);
        let _ = worker.await;
    }
}

async fn run(
    mut controller: PreviewController,
    mut requests: watch::Receiver<Request>,
    snapshots: watch::Sender<Snapshot>,
) {
    while requests.changed().await.is_ok() {
        let mut request = requests.borrow_and_update().clone();

        loop {
            let page_id = match request.page_id.clone() {
                Some(page_id) => page_id,
                None => break,
            };

            controller.begin(&page_id);
            publish(&snapshots, &controller, request.generation);

            let step = tokio::select! {
                inputs = controller.fetch_inputs(&page_id) => Step::Fetched(inputs),
                changed = requests.changed() => match changed {
                    Ok(()) => Step::Superseded,
                    Err(_) => Step::Closed,
                },
            };

            match step {
                Step::Fetched(inputs) => {
                    controller.apply(&page_id, inputs);
                    publish(&snapshots, &controller, request.generation);
                    break;
                }
                Step::Superseded => {
                    request = requests.borrow_and_update().clone();
                    debug!(
                        "Generation for {} superseded by generation {}",
                        page_id, request.generation
                    );
                }
                Step::Closed => return,
            }
        }
    }
    info!("Preview service stopped");
}

fn publish(snapshots: &watch::Sender<Snapshot>, controller: &PreviewController, generation: u64) {
    snapshots.send_replace(Snapshot {
        generation,
        page_id: controller.page_id().map(str::to_string),
        state: controller.state(),
        output: controller.output().map(str::to_string),
        error: controller.last_error().map(|e| e.to_string()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::source::{MemorySource, ResourceSource};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Delays one address so a generation for it stays in flight
    struct SlowSource {
        inner: MemorySource,
        slow: &'static str,
        delay: Duration,
    }

    #[async_trait]
    impl ResourceSource for SlowSource {
        async fn fetch(&self, address: &str) -> Result<String> {
            if address == self.slow {
                tokio::time::sleep(self.delay).await;
            }
            self.inner.fetch(address).await
        }

        async fn list(&self, dir: &str) -> Result<Option<Vec<String>>> {
            self.inner.list(dir).await
        }

        fn describe(&self) -> String {
            "slow".to_string()
        }
    }

    fn service(delay: Duration) -> PreviewService {
        let source = SlowSource {
            inner: MemorySource::with_files([
                ("slow.html", "---\n---\nslow page"),
                ("fast.html", "---\n---\nfast page"),
                ("broken.html", "no front matter"),
            ]),
            slow: "slow.html",
            delay,
        };
        let config = Config {
            data_file: None,
            pages: vec!["fast.html".to_string()],
            ..Config::default()
        };
        let controller = PreviewController::new(Arc::new(config), Arc::new(source)).unwrap();
        PreviewService::spawn(controller)
    }

    #[tokio::test]
    async fn test_navigate_and_wait() {
        let service = service(Duration::from_millis(0));

        let snapshot = service
            .navigate_and_wait("fast.html", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(snapshot.state, PreviewState::Rendered);
        assert_eq!(snapshot.output.as_deref(), Some("fast page"));
        assert_eq!(snapshot.generation, 1);
        assert_eq!(service.snapshot(), snapshot);
    }

    #[tokio::test]
    async fn test_newer_page_supersedes_slow_one() {
        let service = service(Duration::from_secs(30));
        let mut snapshots = service.subscribe();

        service.navigate("slow.html");
        let snapshot = service
            .navigate_and_wait("fast.html", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(snapshot.page_id.as_deref(), Some("fast.html"));
        assert_eq!(snapshot.output.as_deref(), Some("fast page"));

        // The slow generation never reached the display
        let latest = snapshots.borrow_and_update().clone();
        assert_eq!(latest.output.as_deref(), Some("fast page"));
    }

    #[tokio::test]
    async fn test_failure_is_published() {
        let service = service(Duration::from_millis(0));

        service
            .navigate_and_wait("fast.html", Duration::from_secs(5))
            .await
            .unwrap();
        let snapshot = service
            .navigate_and_wait("broken.html", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(snapshot.state, PreviewState::Error);
        assert!(snapshot.error.unwrap().contains("broken.html"));
        assert_eq!(snapshot.output.as_deref(), Some("fast page"));
    }

    #[tokio::test]
    async fn test_refresh_needs_a_page() {
        let service = service(Duration::from_millis(0));
        assert_eq!(service.refresh(), None);

        service.navigate("fast.html");
        assert_eq!(service.refresh(), Some(2));
    }

    #[tokio::test]
    async fn test_timeout() {
        let service = service(Duration::from_secs(30));

        let err = service
            .navigate_and_wait("slow.html", Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, PreviewError::Timeout { ref page } if page == "slow.html"));
    }
}
