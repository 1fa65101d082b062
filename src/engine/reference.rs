//! Reference record selection for (category, country) requests.

use crate::dataset::{canonical_key, DatasetSnapshot, InfluencerRecord};
use crate::engine::EngineError;

/// Pick the representative record for a request.
///
/// Policy, first non-empty tier wins:
/// 1. both category and country match: highest `global_score`;
/// 2. category matches: highest `global_score`;
/// 3. no category match anywhere: `EngineError::NotFound`.
///
/// Ties on score go to the lowest index, so selection is deterministic for a
/// fixed snapshot. Matching uses trimmed, case-folded keys.
pub fn select<'a>(
    category: &str,
    country: &str,
    snapshot: &'a DatasetSnapshot,
) -> Result<(usize, &'a InfluencerRecord), EngineError> {
    let category_key = canonical_key(category);
    let country_key = canonical_key(country);

    let mut best_both: Option<(usize, &InfluencerRecord)> = None;
    let mut best_category: Option<(usize, &InfluencerRecord)> = None;

    for (idx, record) in snapshot.records().iter().enumerate() {
        if canonical_key(&record.category) != category_key {
            continue;
        }
        keep_if_better(&mut best_category, idx, record);
        if canonical_key(&record.country) == country_key {
            keep_if_better(&mut best_both, idx, record);
        }
    }

    best_both
        .or(best_category)
        .ok_or_else(|| EngineError::NotFound(format!("no influencer in category '{}'", category)))
}

fn keep_if_better<'a>(
    best: &mut Option<(usize, &'a InfluencerRecord)>,
    idx: usize,
    record: &'a InfluencerRecord,
) {
    // Strict greater-than keeps the earliest record on score ties.
    match best {
        Some((_, current)) if record.global_score <= current.global_score => {}
        _ => *best = Some((idx, record)),
    }
}
