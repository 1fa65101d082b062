use axum::extract::FromRef;

use crate::engine::{FeatureVectorizer, SharedService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    /// Current recommendation service; swapped wholesale on refresh.
    pub recommender: SharedService,
    /// Feature configuration used for refresh rebuilds.
    pub vectorizer: Arc<FeatureVectorizer>,
    /// Dataset file to reload on refresh.
    pub dataset_path: PathBuf,
}

impl FromRef<ServerState> for SharedService {
    fn from_ref(input: &ServerState) -> Self {
        input.recommender.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
