//! Boundary payload types for the recommendation operations.

use serde::Serialize;

/// Which relaxation tier produced the deepest-accepted entries of a
/// recommendation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TierNote {
    /// All entries match both category and country.
    Strict,
    /// Some entries match category only.
    Relaxed,
    /// Some entries were taken purely on similarity.
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceSummary {
    pub id: usize,
    pub name: String,
    pub category: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendedInfluencer {
    pub rank: usize,
    pub id: usize,
    pub name: String,
    pub category: String,
    pub country: String,
    pub followers: u64,
    pub followers_formatted: String,
    pub engagement_rate: f64,
    pub similarity_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub reference: ReferenceSummary,
    pub recommendations: Vec<RecommendedInfluencer>,
    pub tier_note: TierNote,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultEntry {
    pub id: usize,
    pub name: String,
    pub category: String,
    pub country: String,
    pub followers: u64,
    pub followers_formatted: String,
    pub engagement_rate: f64,
    pub global_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<SearchResultEntry>,
    pub count: usize,
}

/// One labeled bucket of a distribution, serialized in bucket order.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionBucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_records: usize,
    pub category_counts: std::collections::BTreeMap<String, usize>,
    pub country_counts: std::collections::BTreeMap<String, usize>,
    pub followers_distribution: Vec<DistributionBucket>,
    pub engagement_distribution: Vec<DistributionBucket>,
}

/// Structured error payload for recoverable failures.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
