//! Development server that always shows the latest preview.

pub mod app;
pub mod config;
pub mod watcher;

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::net::TcpListener;
use tokio::signal;

use crate::preview::PreviewService;
use crate::utils::error::{PreviewError, Result};

pub use app::{create_app, AppState};
pub use config::ServerConfig;
pub use watcher::watch_source;

/// Serve previews until Ctrl+C
pub async fn serve(service: PreviewService, server_config: ServerConfig) -> Result<()> {
    let service = Arc::new(service);

    if let Some(page) = &server_config.page {
        service.navigate(page);
    }

    let _watcher = match &server_config.watch_dir {
        Some(dir) => match watch_source(dir, service.clone(), server_config.debounce) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("File watching disabled: {}", e);
                None
            }
        },
        None => None,
    };

    let state = AppState {
        service,
        render_timeout: server_config.render_timeout,
    };
    let app = create_app(state);

    let addr: SocketAddr = server_config
        .address_string()
        .parse()
        .map_err(|e| PreviewError::Config(format!("Invalid server address: {}", e)))?;
    let listener = TcpListener::bind(addr).await?;

    print_server_banner(&server_config);
    info!("Preview server listening on {}", server_config.url());

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    match result {
        Ok(()) => {
            info!("Server stopped");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(e.into())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    info!("Shutting down server (received Ctrl+C)...");
}

fn print_server_banner(server_config: &ServerConfig) {
    println!("\n{}", "-".repeat(60));
    println!(" Rustyll Preview");
    println!(" - URL: {}", server_config.url());
    println!(" - Preview a page: {}/_preview/<page>", server_config.url());
    println!(
        " - Watching: {}",
        match &server_config.watch_dir {
            Some(dir) => dir.display().to_string(),
            None => "off".to_string(),
        }
    );
    println!(" - Press Ctrl+C to stop");
    println!("{}\n", "-".repeat(60));
}
