//! Request logging middleware

use super::state::ServerState;
use axum::extract::State;
use axum::{body::Body, http::Request, middleware::Next, response::IntoResponse};
use std::time::Instant;
use tracing::{debug, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    Path,
    Headers,
}

impl Default for RequestsLoggingLevel {
    fn default() -> Self {
        Self::Path
    }
}

pub async fn log_requests(
    State(state): State<ServerState>,
    request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let level = state.config.requests_logging_level.clone();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if level >= RequestsLoggingLevel::Headers {
        debug!("{} {} headers: {:?}", method, path, request.headers());
    }

    let started = Instant::now();
    let response = next.run(request).await;

    if level >= RequestsLoggingLevel::Path {
        info!(
            "{} {} -> {} ({:?})",
            method,
            path,
            response.status(),
            started.elapsed()
        );
    }

    response
}
