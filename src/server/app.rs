use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::warn;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::preview::{PreviewService, PreviewState};
use crate::utils::error::PreviewError;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PreviewService>,
    pub render_timeout: Duration,
}

/// Routes:
/// - `GET /` the document currently shown
/// - `GET /_preview/status` the latest snapshot as JSON
/// - `GET /_preview/{*page}` navigate to a page and return it once rendered
pub fn create_app(state: AppState) -> Router {
    // Requests may outlive a slow generation by a little before giving up
    let request_timeout = state.render_timeout + Duration::from_secs(5);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(current))
        .route("/_preview/status", get(status))
        .route("/_preview/{*page}", get(preview))
        .with_state(state)
        .layer(cors)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CatchPanicLayer::new())
}

pub async fn current(State(state): State<AppState>) -> Response {
    match state.service.snapshot().output {
        Some(output) => Html(output).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "No preview yet. Open /_preview/<page> to render one.",
        )
            .into_response(),
    }
}

pub async fn status(State(state): State<AppState>) -> Response {
    Json(state.service.snapshot()).into_response()
}

pub async fn preview(State(state): State<AppState>, Path(page): Path<String>) -> Response {
    match state
        .service
        .navigate_and_wait(&page, state.render_timeout)
        .await
    {
        Ok(snapshot) if snapshot.state == PreviewState::Rendered => {
            Html(snapshot.output.unwrap_or_default()).into_response()
        }
        Ok(snapshot) => (
            StatusCode::BAD_GATEWAY,
            snapshot
                .error
                .unwrap_or_else(|| format!("Preview of {} failed", page)),
        )
            .into_response(),
        Err(e @ PreviewError::Timeout { .. }) => {
            warn!("{}", e);
            (StatusCode::GATEWAY_TIMEOUT, e.to_string()).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
