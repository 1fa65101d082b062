//! The recommendation service: tiered recommend, search, detail and stats
//! over one immutable snapshot plus its derived matrices.

use crate::dataset::{canonical_key, format_followers, DatasetSnapshot, InfluencerRecord};
use crate::engine::reference;
use crate::engine::responses::{
    DistributionBucket, RecommendResponse, RecommendedInfluencer, ReferenceSummary, SearchResponse,
    SearchResultEntry, StatsResponse, TierNote,
};
use crate::engine::similarity::SimilarityMatrix;
use crate::engine::vectorizer::{FeatureMatrix, FeatureVectorizer};
use crate::engine::EngineError;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::info;

/// Filter parameters for the search operation.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub category: Option<String>,
    pub country: Option<String>,
    pub min_followers: u64,
    pub limit: usize,
}

/// Read-only recommendation service over one snapshot version.
///
/// Built once (startup or refresh); all operations are pure reads, so a
/// built service is safe for unlimited concurrent readers with no locking.
pub struct RecommendationService {
    snapshot: Arc<DatasetSnapshot>,
    features: FeatureMatrix,
    similarity: SimilarityMatrix,
}

impl RecommendationService {
    /// Build the feature matrix and similarity matrix for `snapshot`.
    ///
    /// Configuration errors propagate: a service that cannot build its
    /// feature space must not come up.
    pub fn build(
        snapshot: Arc<DatasetSnapshot>,
        vectorizer: &FeatureVectorizer,
    ) -> Result<Self, EngineError> {
        let started = Instant::now();
        let features = vectorizer.build(snapshot.records())?;
        let similarity = SimilarityMatrix::build(&features);

        debug_assert_eq!(snapshot.len(), features.rows());
        debug_assert_eq!(snapshot.len(), similarity.len());

        info!(
            "Built recommendation service: {} records, {} feature columns, snapshot v{}, took {:?}",
            snapshot.len(),
            features.cols(),
            snapshot.version(),
            started.elapsed()
        );

        Ok(Self {
            snapshot,
            features,
            similarity,
        })
    }

    pub fn snapshot(&self) -> &DatasetSnapshot {
        &self.snapshot
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Tiered recommendation for a (category, country) request.
    ///
    /// One ranked candidate list is walked up to three times with
    /// successively relaxed predicates: exact category+country, category
    /// only, then anything. As long as the dataset has `n+1` records the
    /// result is guaranteed to hold exactly `min(n, N-1)` entries, and
    /// `tier_note` tells the caller how degraded the match is.
    pub fn recommend(
        &self,
        category: &str,
        country: &str,
        n: i64,
    ) -> Result<RecommendResponse, EngineError> {
        if category.trim().is_empty() {
            return Err(EngineError::Validation(
                "category must not be empty".to_string(),
            ));
        }

        let (reference_idx, reference) = reference::select(category, country, &self.snapshot)?;

        let total = self.snapshot.len();
        let max_results = total.saturating_sub(1);
        let n = (n.max(1) as usize).min(max_results.max(1));

        let category_key = canonical_key(category);
        let country_key = canonical_key(country);
        let ranked = self.similarity.ranked(reference_idx);

        let mut accepted: Vec<(usize, f64)> = Vec::with_capacity(n);
        let mut taken = vec![false; total];
        let mut deepest_tier = TierNote::Strict;

        // Tier A: strict category+country match.
        for &(idx, score) in &ranked {
            if accepted.len() >= n {
                break;
            }
            let record = &self.snapshot.records()[idx];
            if canonical_key(&record.category) == category_key
                && canonical_key(&record.country) == country_key
            {
                taken[idx] = true;
                accepted.push((idx, score));
            }
        }

        // Tier B: relax country, keep category.
        if accepted.len() < n {
            for &(idx, score) in &ranked {
                if accepted.len() >= n {
                    break;
                }
                let record = &self.snapshot.records()[idx];
                if !taken[idx] && canonical_key(&record.category) == category_key {
                    taken[idx] = true;
                    accepted.push((idx, score));
                    deepest_tier = deepest_tier.max(TierNote::Relaxed);
                }
            }
        }

        // Tier C: top similarity regardless of category/country.
        if accepted.len() < n {
            for &(idx, score) in &ranked {
                if accepted.len() >= n {
                    break;
                }
                if !taken[idx] {
                    taken[idx] = true;
                    accepted.push((idx, score));
                    deepest_tier = deepest_tier.max(TierNote::Fallback);
                }
            }
        }

        let recommendations = accepted
            .into_iter()
            .enumerate()
            .map(|(rank, (idx, score))| {
                let record = &self.snapshot.records()[idx];
                RecommendedInfluencer {
                    rank: rank + 1,
                    id: record.id,
                    name: record.name.clone(),
                    category: record.category.clone(),
                    country: record.country.clone(),
                    followers: record.followers,
                    followers_formatted: format_followers(record.followers),
                    engagement_rate: record.engagement_rate,
                    similarity_score: score,
                }
            })
            .collect();

        Ok(RecommendResponse {
            success: true,
            reference: ReferenceSummary {
                id: reference.id,
                name: reference.name.clone(),
                category: reference.category.clone(),
                country: reference.country.clone(),
            },
            recommendations,
            tier_note: deepest_tier,
        })
    }

    /// Predicate search over the snapshot, ranked by `global_score`. No
    /// similarity index involved.
    pub fn search(&self, params: &SearchParams) -> SearchResponse {
        let category_key = params.category.as_deref().map(canonical_key);
        let country_key = params.country.as_deref().map(canonical_key);

        let mut matches: Vec<&InfluencerRecord> = self
            .snapshot
            .records()
            .iter()
            .filter(|r| {
                category_key
                    .as_ref()
                    .map_or(true, |key| canonical_key(&r.category) == *key)
                    && country_key
                        .as_ref()
                        .map_or(true, |key| canonical_key(&r.country) == *key)
                    && r.followers >= params.min_followers
            })
            .collect();

        matches.sort_by(|a, b| {
            b.global_score
                .partial_cmp(&a.global_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(params.limit.max(1));

        let results: Vec<SearchResultEntry> = matches
            .into_iter()
            .map(|r| SearchResultEntry {
                id: r.id,
                name: r.name.clone(),
                category: r.category.clone(),
                country: r.country.clone(),
                followers: r.followers,
                followers_formatted: format_followers(r.followers),
                engagement_rate: r.engagement_rate,
                global_score: r.global_score,
            })
            .collect();

        SearchResponse {
            success: true,
            count: results.len(),
            results,
        }
    }

    /// Full record lookup by ordinal id.
    pub fn detail(&self, id: usize) -> Result<&InfluencerRecord, EngineError> {
        self.snapshot
            .get(id)
            .ok_or_else(|| EngineError::NotFound(format!("no influencer with id {}", id)))
    }

    /// Aggregate statistics over the active snapshot.
    pub fn stats(&self) -> StatsResponse {
        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut country_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut followers_buckets = [0usize; 5];
        let mut engagement_buckets = [0usize; 5];

        for record in self.snapshot.records() {
            *category_counts.entry(record.category.clone()).or_default() += 1;
            *country_counts.entry(record.country.clone()).or_default() += 1;

            let f = record.followers;
            let fb = if f < 10_000 {
                0
            } else if f < 100_000 {
                1
            } else if f < 1_000_000 {
                2
            } else if f < 10_000_000 {
                3
            } else {
                4
            };
            followers_buckets[fb] += 1;

            let e = record.engagement_rate;
            let eb = if e < 1.0 {
                0
            } else if e < 3.0 {
                1
            } else if e < 6.0 {
                2
            } else if e < 10.0 {
                3
            } else {
                4
            };
            engagement_buckets[eb] += 1;
        }

        let followers_labels = ["0-10K", "10K-100K", "100K-1M", "1M-10M", "10M+"];
        let engagement_labels = ["0-1%", "1-3%", "3-6%", "6-10%", "10%+"];

        StatsResponse {
            total_records: self.snapshot.len(),
            category_counts,
            country_counts,
            followers_distribution: followers_labels
                .iter()
                .zip(followers_buckets)
                .map(|(label, count)| DistributionBucket {
                    label: label.to_string(),
                    count,
                })
                .collect(),
            engagement_distribution: engagement_labels
                .iter()
                .zip(engagement_buckets)
                .map(|(label, count)| DistributionBucket {
                    label: label.to_string(),
                    count,
                })
                .collect(),
        }
    }
}

/// Shared handle to the current service, with atomic whole-service swap on
/// refresh.
///
/// Readers clone the inner `Arc` and keep using their snapshot for the
/// duration of a request even while a refresh replaces the current one; no
/// partially rebuilt state is ever observable.
#[derive(Clone)]
pub struct SharedService {
    inner: Arc<RwLock<Arc<RecommendationService>>>,
}

impl SharedService {
    pub fn new(service: RecommendationService) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(service))),
        }
    }

    pub fn current(&self) -> Arc<RecommendationService> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn replace(&self, service: RecommendationService) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(service);
    }
}
