use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::preview::{FileSurface, PreviewController, PreviewState, StdoutSurface};
use crate::source;
use crate::utils::error::{PreviewError, Result};

/// Render one page once
pub async fn handle_render_command(
    config: Config,
    page: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Arc::new(config);
    let source = source::from_config(&config)?;
    info!(
        "Rendering {} from {} with {}",
        page,
        source.describe(),
        config.template_engine
    );

    let mut controller = PreviewController::new(config, source)?;
    match &output {
        Some(path) => controller.add_surface(Box::new(FileSurface::new(path))),
        None => controller.add_surface(Box::new(StdoutSurface)),
    }

    match controller.generate(page).await {
        PreviewState::Rendered => {
            if let Some(path) = output {
                info!("Preview written to {}", path.display());
            }
            Ok(())
        }
        state => Err(controller.take_error().unwrap_or_else(|| {
            PreviewError::Config(format!("Preview of {} ended in state {}", page, state))
        })),
    }
}
