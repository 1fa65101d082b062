//! Influencer profile record types.

use serde::{Deserialize, Serialize};

/// One influencer profile as loaded from the dataset file.
///
/// Records are immutable after load. The `id` is the ordinal position of the
/// record in its snapshot; every derived matrix (features, similarity) is
/// aligned to that same index space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluencerRecord {
    pub id: usize,
    pub name: String,
    pub category: String,
    pub country: String,
    pub followers: u64,
    pub engagement_rate: f64,
    pub global_score: f64,
    pub posts: Option<u64>,
    pub avg_likes: Option<f64>,
    pub avg_comments: Option<f64>,
}

/// Human-readable follower count, e.g. `1.5M`, `12.3K`.
pub fn format_followers(count: u64) -> String {
    if count >= 1_000_000_000 {
        format!("{:.1}B", count as f64 / 1e9)
    } else if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1e6)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1e3)
    } else {
        count.to_string()
    }
}
