//! Candidate recommender strategies for offline comparison.

use crate::dataset::DatasetSnapshot;
use crate::engine::SimilarityMatrix;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use std::sync::Arc;

/// A recommender strategy under evaluation: given a query index, produce up
/// to `n` (candidate index, score) pairs, never including the query itself.
pub trait CandidateRecommender: Send + Sync {
    fn name(&self) -> &str;

    fn recommend(&self, query_idx: usize, n: usize) -> Vec<(usize, f64)>;
}

/// The production strategy: nearest neighbors in the cosine similarity index.
pub struct CosineRecommender {
    similarity: Arc<SimilarityMatrix>,
}

impl CosineRecommender {
    pub fn new(similarity: Arc<SimilarityMatrix>) -> Self {
        Self { similarity }
    }
}

impl CandidateRecommender for CosineRecommender {
    fn name(&self) -> &str {
        "cosine-similarity"
    }

    fn recommend(&self, query_idx: usize, n: usize) -> Vec<(usize, f64)> {
        self.similarity.query(query_idx, n)
    }
}

/// Query-independent baseline: always the globally top-scored records.
pub struct PopularityRecommender {
    // Indices ordered by global_score descending, tie by lower index.
    order: Vec<(usize, f64)>,
}

impl PopularityRecommender {
    pub fn new(snapshot: &DatasetSnapshot) -> Self {
        let mut order: Vec<(usize, f64)> = snapshot
            .records()
            .iter()
            .enumerate()
            .map(|(idx, r)| (idx, r.global_score))
            .collect();
        order.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        Self { order }
    }
}

impl CandidateRecommender for PopularityRecommender {
    fn name(&self) -> &str {
        "popularity"
    }

    fn recommend(&self, query_idx: usize, n: usize) -> Vec<(usize, f64)> {
        self.order
            .iter()
            .filter(|&&(idx, _)| idx != query_idx)
            .take(n)
            .copied()
            .collect()
    }
}

/// Seeded random baseline. The per-query seed mixes the configured seed with
/// the query index so runs are reproducible but queries are independent.
pub struct RandomRecommender {
    total: usize,
    seed: u64,
}

impl RandomRecommender {
    pub fn new(total: usize, seed: u64) -> Self {
        Self { total, seed }
    }
}

impl CandidateRecommender for RandomRecommender {
    fn name(&self) -> &str {
        "random"
    }

    fn recommend(&self, query_idx: usize, n: usize) -> Vec<(usize, f64)> {
        if self.total <= 1 {
            return Vec::new();
        }
        let mut rng = StdRng::seed_from_u64(self.seed ^ (query_idx as u64).wrapping_mul(0x9e37));
        let amount = n.min(self.total - 1);
        // Sample from [0, total-1) and shift past the query index so the
        // query itself can never be drawn.
        index::sample(&mut rng, self.total - 1, amount)
            .into_iter()
            .map(|raw| {
                let idx = if raw >= query_idx { raw + 1 } else { raw };
                (idx, 0.0)
            })
            .collect()
    }
}
