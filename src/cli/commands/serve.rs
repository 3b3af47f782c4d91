use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::config::Config;
use crate::preview::{PreviewController, PreviewService};
use crate::server::{self, ServerConfig};
use crate::source;
use crate::utils::error::Result;

/// Handle the serve command
pub async fn handle_serve_command(
    config: Config,
    host: String,
    port: u16,
    page: Option<String>,
    watch: bool,
    timeout: u64,
) -> Result<()> {
    let watch_dir = match (watch, &config.base_url) {
        (true, None) => Some(config.source.clone()),
        (true, Some(base_url)) => {
            warn!("--watch needs a local source; {} will not be watched", base_url);
            None
        }
        (false, _) => None,
    };

    let config = Arc::new(config);
    let source = source::from_config(&config)?;
    info!(
        "Previewing {} with {}",
        source.describe(),
        config.template_engine
    );

    let controller = PreviewController::new(config, source)?;
    let service = PreviewService::spawn(controller);

    let server_config = ServerConfig {
        page,
        watch_dir,
        render_timeout: Duration::from_secs(timeout),
        ..ServerConfig::new(&host, port)
    };

    server::serve(service, server_config).await
}
