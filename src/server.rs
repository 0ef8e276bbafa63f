//! HTTP server for the built site and the contact endpoint.
//!
//! ```text
//! POST /api/contact.json   → contact relay (JSON in, JSON out)
//! *                        → static files from the output directory
//! ```

use crate::contact::{ContactRelay, ContactRequest, ContactResponse, MailError, RelayOutcome};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::path::Path;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const CONTACT_ROUTE: &str = "/api/contact.json";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "contact relay failed");
        let body = ContactResponse {
            message: "Your message could not be delivered. Please try again later.".to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub relay: ContactRelay,
}

/// Router serving `output_dir` with the contact endpoint mounted on top.
pub fn create_router(output_dir: &Path, state: AppState) -> Router {
    Router::new()
        .route(CONTACT_ROUTE, post(contact_handler))
        .fallback_service(ServeDir::new(output_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn contact_handler(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Response, ServerError> {
    let outcome = state.relay.relay(&request).await?;
    let status = match outcome {
        RelayOutcome::Delivered => StatusCode::OK,
        RelayOutcome::Rejected => StatusCode::BAD_REQUEST,
    };
    let body = ContactResponse {
        message: outcome.message().to_string(),
    };
    Ok((status, Json(body)).into_response())
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, output_dir: &Path, state: AppState) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, dir = %output_dir.display(), "serving site");
    axum::serve(listener, create_router(output_dir, state)).await?;
    Ok(())
}
