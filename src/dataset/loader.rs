//! Dataset file loading.
//!
//! The dataset is a JSON array of influencer profiles, produced by the
//! upstream ingestion/cleaning pipeline. Loading happens once at warm-up (or
//! on an explicit refresh), never in the request-serving path.

use super::models::InfluencerRecord;
use super::snapshot::DatasetSnapshot;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Raw row shape as found in the dataset file. Every field other than `name`
/// may be absent; defaults are applied here so the rest of the system only
/// ever sees complete records.
#[derive(Debug, Deserialize)]
struct RawRecord {
    name: String,
    category: Option<String>,
    country: Option<String>,
    followers: Option<u64>,
    engagement_rate: Option<f64>,
    global_score: Option<f64>,
    posts: Option<u64>,
    avg_likes: Option<f64>,
    avg_comments: Option<f64>,
}

const UNKNOWN: &str = "Unknown";

fn non_empty_or_unknown(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN.to_string(),
    }
}

/// Load a dataset snapshot from a JSON file, assigning ordinal ids.
///
/// An empty dataset is refused: a service with nothing to recommend must not
/// enter a serving state.
pub fn load_snapshot(path: &Path, version: u64) -> Result<DatasetSnapshot> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Error reading dataset file: {:?}", path))?;
    let raw: Vec<RawRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Error parsing dataset file: {:?}", path))?;

    if raw.is_empty() {
        bail!("Dataset file {:?} contains no records", path);
    }

    let records: Vec<InfluencerRecord> = raw
        .into_iter()
        .enumerate()
        .map(|(id, r)| InfluencerRecord {
            id,
            name: r.name,
            category: non_empty_or_unknown(r.category),
            country: non_empty_or_unknown(r.country),
            followers: r.followers.unwrap_or(0),
            engagement_rate: r.engagement_rate.unwrap_or(0.0),
            global_score: r.global_score.unwrap_or(0.0),
            posts: r.posts,
            avg_likes: r.avg_likes,
            avg_comments: r.avg_comments,
        })
        .collect();

    info!(
        "Loaded {} influencer records from {:?} (snapshot v{})",
        records.len(),
        path,
        version
    );

    Ok(DatasetSnapshot::new(records, version))
}
