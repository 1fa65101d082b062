//! Pairwise cosine similarity index.

use crate::engine::vectorizer::FeatureMatrix;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Square, symmetric cosine similarity matrix aligned with the feature
/// matrix's index space.
///
/// Built once per snapshot version in full (O(N²·D)); there are no
/// incremental updates, a changed snapshot means a rebuild. Intended for
/// datasets up to the tens of thousands of rows.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn build(features: &FeatureMatrix) -> Self {
        let n = features.rows();
        let norms: Vec<f64> = (0..n)
            .map(|i| features.row(i).iter().map(|v| v * v).sum::<f64>().sqrt())
            .collect();

        let mut data = vec![0.0; n * n];
        data.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
            let vi = features.row(i);
            for (j, out) in row.iter_mut().enumerate() {
                *out = cosine(vi, features.row(j), norms[i], norms[j]);
            }
        });

        Self { n, data }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// All candidate indices for `idx` (everything except `idx` itself),
    /// ranked by descending similarity; ties broken by lower index.
    pub fn ranked(&self, idx: usize) -> Vec<(usize, f64)> {
        let mut candidates: Vec<(usize, f64)> = (0..self.n)
            .filter(|&j| j != idx)
            .map(|j| (j, self.get(idx, j)))
            .collect();
        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        candidates
    }

    /// Up to `n` nearest candidates for `idx`.
    pub fn query(&self, idx: usize, n: usize) -> Vec<(usize, f64)> {
        let mut ranked = self.ranked(idx);
        ranked.truncate(n);
        ranked
    }
}

/// Cosine similarity with the zero-norm convention: a vector with no
/// magnitude is similar to nothing.
fn cosine(a: &[f64], b: &[f64], norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}
