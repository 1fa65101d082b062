//! Shared helpers for driving the router in-process.

pub mod fixtures;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use influmatch_server::dataset::load_snapshot;
use influmatch_server::engine::{FeatureVectorizer, RecommendationService, SharedService};
use influmatch_server::server::{make_app, ServerConfig};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

/// Build the full app over the dataset file at `path`.
pub fn app_for_dataset(path: &Path) -> Router {
    let snapshot = Arc::new(load_snapshot(path, 1).unwrap());
    let vectorizer = Arc::new(FeatureVectorizer::default());
    let service = RecommendationService::build(snapshot, &vectorizer).unwrap();
    make_app(
        ServerConfig::default(),
        SharedService::new(service),
        vectorizer,
        path.to_path_buf(),
    )
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
