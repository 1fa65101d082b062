//! Influmatch Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod evaluation;
pub mod server;

// Re-export commonly used types for convenience
pub use engine::{
    EngineError, FeatureVectorizer, RecommendationService, SearchParams, SharedService,
    SimilarityMatrix,
};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
