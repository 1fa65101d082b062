mod error;
pub mod reference;
mod responses;
mod service;
mod similarity;
mod vectorizer;

pub use error::EngineError;
pub use responses::{
    DistributionBucket, ErrorResponse, RecommendResponse, RecommendedInfluencer, ReferenceSummary,
    SearchResponse, SearchResultEntry, StatsResponse, TierNote,
};
pub use service::{RecommendationService, SearchParams, SharedService};
pub use similarity::SimilarityMatrix;
pub use vectorizer::{CategoricalAttr, FeatureMatrix, FeatureVectorizer, NumericAttr};
