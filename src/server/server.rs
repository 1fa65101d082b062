use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::dataset::load_snapshot;
use crate::engine::{
    EngineError, ErrorResponse, FeatureVectorizer, RecommendationService, SearchParams,
    SharedService,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, state::ServerState, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub snapshot_version: u64,
    pub total_records: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct RecommendParams {
    pub category: Option<String>,
    pub country: Option<String>,
    pub n: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct SearchQueryParams {
    pub category: Option<String>,
    pub country: Option<String>,
    pub min_followers: Option<u64>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct RefreshResponse {
    pub success: bool,
    pub snapshot_version: u64,
    pub total_records: usize,
}

fn engine_error_response(err: EngineError) -> Response {
    let status = match &err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        // Configuration errors abort startup; seeing one here means a refresh
        // rebuild failed.
        EngineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(err.to_string()))).into_response()
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let service = state.recommender.current();
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: env!("GIT_HASH").to_string(),
        snapshot_version: service.snapshot().version(),
        total_records: service.snapshot().len(),
    };
    Json(stats)
}

async fn health() -> impl IntoResponse {
    "OK"
}

async fn recommend(
    State(recommender): State<SharedService>,
    Query(params): Query<RecommendParams>,
) -> Response {
    let category = params.category.unwrap_or_default();
    if category.trim().is_empty() {
        return engine_error_response(EngineError::Validation(
            "query parameter 'category' is required".to_string(),
        ));
    }
    let country = params.country.unwrap_or_default();
    let n = params.n.unwrap_or(10);

    match recommender.current().recommend(&category, &country, n) {
        Ok(response) => Json(response).into_response(),
        Err(err) => engine_error_response(err),
    }
}

async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchQueryParams>,
) -> Response {
    let limit = params
        .limit
        .unwrap_or(20)
        .clamp(1, state.config.max_search_results);
    let search_params = SearchParams {
        category: params.category,
        country: params.country,
        min_followers: params.min_followers.unwrap_or(0),
        limit,
    };
    Json(state.recommender.current().search(&search_params)).into_response()
}

async fn influencer_detail(
    State(recommender): State<SharedService>,
    Path(id): Path<usize>,
) -> Response {
    let service = recommender.current();
    match service.detail(id) {
        Ok(record) => Json(record).into_response(),
        Err(err) => engine_error_response(err),
    }
}

async fn stats(State(recommender): State<SharedService>) -> Response {
    Json(recommender.current().stats()).into_response()
}

/// Reload the dataset file and rebuild the feature and similarity matrices
/// in full, then swap the serving pointer. In-flight readers keep the
/// snapshot they started with; on failure the old snapshot keeps serving.
async fn refresh(State(state): State<ServerState>) -> Response {
    let next_version = state.recommender.current().snapshot().version() + 1;

    let rebuilt = load_snapshot(&state.dataset_path, next_version)
        .map_err(|err| EngineError::Configuration(err.to_string()))
        .and_then(|snapshot| {
            RecommendationService::build(Arc::new(snapshot), &state.vectorizer)
        });

    match rebuilt {
        Ok(service) => {
            let total_records = service.snapshot().len();
            state.recommender.replace(service);
            info!(
                "Refreshed dataset snapshot to v{} ({} records)",
                next_version, total_records
            );
            Json(RefreshResponse {
                success: true,
                snapshot_version: next_version,
                total_records,
            })
            .into_response()
        }
        Err(err) => {
            error!("Snapshot refresh failed, keeping previous snapshot: {}", err);
            engine_error_response(err)
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    recommender: SharedService,
    vectorizer: Arc<FeatureVectorizer>,
    dataset_path: PathBuf,
) -> Router {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        recommender,
        vectorizer,
        dataset_path,
    };

    let v1_routes: Router<ServerState> = Router::new()
        .route("/recommend", get(recommend))
        .route("/search", get(search))
        .route("/influencer/{id}", get(influencer_detail))
        .route("/stats", get(stats))
        .route("/refresh", post(refresh));

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .nest("/v1", v1_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    config: ServerConfig,
    recommender: SharedService,
    vectorizer: Arc<FeatureVectorizer>,
    dataset_path: PathBuf,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, recommender, vectorizer, dataset_path);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
