//! Typed error taxonomy for the recommendation engine.

use thiserror::Error;

/// Errors raised by the recommendation engine.
///
/// `Configuration` is fatal: it is raised while building the feature space
/// and must abort startup rather than let the service serve a meaningless
/// similarity index. `NotFound` and `Validation` are recoverable and are
/// converted to structured error payloads at the serving boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),
}
