//! Feature vectorization: tabular records to a numeric matrix.

use crate::dataset::InfluencerRecord;
use crate::engine::EngineError;
use std::collections::HashMap;

/// Numeric attributes available for vectorization. Missing values read as 0
/// before standardization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericAttr {
    Followers,
    EngagementRate,
    GlobalScore,
    Posts,
    AvgLikes,
    AvgComments,
}

impl NumericAttr {
    fn extract(&self, record: &InfluencerRecord) -> f64 {
        match self {
            NumericAttr::Followers => record.followers as f64,
            NumericAttr::EngagementRate => record.engagement_rate,
            NumericAttr::GlobalScore => record.global_score,
            NumericAttr::Posts => record.posts.map(|p| p as f64).unwrap_or(0.0),
            NumericAttr::AvgLikes => record.avg_likes.unwrap_or(0.0),
            NumericAttr::AvgComments => record.avg_comments.unwrap_or(0.0),
        }
    }
}

/// Categorical attributes available for vectorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalAttr {
    Category,
    Country,
}

impl CategoricalAttr {
    fn extract<'a>(&self, record: &'a InfluencerRecord) -> &'a str {
        match self {
            CategoricalAttr::Category => &record.category,
            CategoricalAttr::Country => &record.country,
        }
    }
}

/// Row-major feature matrix, positionally aligned with the dataset snapshot
/// it was built from. Rebuilt wholesale on snapshot change, never patched.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
}

/// Converts a record snapshot into a `FeatureMatrix`.
///
/// Column order is fixed: numeric attributes in the configured order, each
/// standardized over the full dataset (zero-variance columns map to 0), then
/// categorical attributes in the configured order, each value encoded as an
/// integer code assigned in first-appearance order over the snapshot.
///
/// The ordinal codes carry identity only, not magnitude: code 3 is not "more"
/// than code 1. The enumeration is reproducible for a fixed snapshot, which
/// is all the similarity index requires of it.
#[derive(Debug, Clone)]
pub struct FeatureVectorizer {
    numeric: Vec<NumericAttr>,
    categorical: Vec<CategoricalAttr>,
}

impl Default for FeatureVectorizer {
    fn default() -> Self {
        Self {
            numeric: vec![
                NumericAttr::Followers,
                NumericAttr::EngagementRate,
                NumericAttr::GlobalScore,
            ],
            categorical: vec![CategoricalAttr::Category, CategoricalAttr::Country],
        }
    }
}

impl FeatureVectorizer {
    pub fn new(numeric: Vec<NumericAttr>, categorical: Vec<CategoricalAttr>) -> Self {
        Self {
            numeric,
            categorical,
        }
    }

    /// Build the feature matrix for `records`.
    ///
    /// Fails with `EngineError::Configuration` when no feature columns are
    /// configured; a service without a feature space must not start.
    pub fn build(&self, records: &[InfluencerRecord]) -> Result<FeatureMatrix, EngineError> {
        if self.numeric.is_empty() && self.categorical.is_empty() {
            return Err(EngineError::Configuration(
                "no usable numeric or categorical feature columns configured".to_string(),
            ));
        }
        if records.is_empty() {
            return Err(EngineError::Configuration(
                "cannot build a feature matrix over an empty dataset".to_string(),
            ));
        }

        let rows = records.len();
        let cols = self.numeric.len() + self.categorical.len();
        let mut data = vec![0.0; rows * cols];

        for (col, attr) in self.numeric.iter().enumerate() {
            let values: Vec<f64> = records.iter().map(|r| attr.extract(r)).collect();
            let standardized = standardize(&values);
            for (row, value) in standardized.into_iter().enumerate() {
                data[row * cols + col] = value;
            }
        }

        let offset = self.numeric.len();
        for (col, attr) in self.categorical.iter().enumerate() {
            let mut codes: HashMap<&str, usize> = HashMap::new();
            for (row, record) in records.iter().enumerate() {
                let value = attr.extract(record);
                let next = codes.len();
                let code = *codes.entry(value).or_insert(next);
                data[row * cols + offset + col] = code as f64;
            }
        }

        Ok(FeatureMatrix { rows, cols, data })
    }
}

/// Standardize a column: subtract the mean, divide by the population standard
/// deviation. A constant column has no spread to express, so it maps to 0.
fn standardize(values: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std_dev).collect()
}
