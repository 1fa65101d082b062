//! Immutable, versioned dataset snapshot.

use super::models::InfluencerRecord;

/// One immutable copy of the full dataset.
///
/// The ordinal index of a record is the contract shared with every derived
/// structure: row `i` of the feature matrix and row/column `i` of the
/// similarity matrix always refer to `records[i]` of the same snapshot
/// version. A snapshot is never mutated; new data means a new snapshot with a
/// bumped version, swapped in wholesale.
#[derive(Debug)]
pub struct DatasetSnapshot {
    records: Vec<InfluencerRecord>,
    version: u64,
}

impl DatasetSnapshot {
    pub fn new(records: Vec<InfluencerRecord>, version: u64) -> Self {
        Self { records, version }
    }

    pub fn records(&self) -> &[InfluencerRecord] {
        &self.records
    }

    pub fn get(&self, id: usize) -> Option<&InfluencerRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Canonical comparable form for category/country matching: trimmed and
/// case-folded.
pub fn canonical_key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_folds_case_and_whitespace() {
        assert_eq!(canonical_key("  Fashion "), "fashion");
        assert_eq!(canonical_key("FRANCE"), "france");
        assert_eq!(canonical_key(""), "");
    }

    #[test]
    fn snapshot_indexing_matches_record_ids() {
        let records = vec![
            InfluencerRecord {
                id: 0,
                name: "a".into(),
                category: "Fashion".into(),
                country: "France".into(),
                followers: 10,
                engagement_rate: 1.0,
                global_score: 50.0,
                posts: None,
                avg_likes: None,
                avg_comments: None,
            },
            InfluencerRecord {
                id: 1,
                name: "b".into(),
                category: "Tech".into(),
                country: "USA".into(),
                followers: 20,
                engagement_rate: 2.0,
                global_score: 60.0,
                posts: None,
                avg_likes: None,
                avg_comments: None,
            },
        ];
        let snapshot = DatasetSnapshot::new(records, 1);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(1).unwrap().name, "b");
        assert_eq!(snapshot.get(1).unwrap().id, 1);
        assert!(snapshot.get(2).is_none());
    }
}
