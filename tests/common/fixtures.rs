//! Dataset fixtures for the e2e tests.

use serde_json::{json, Value};
use std::io::Write;

pub fn influencer(
    name: &str,
    category: &str,
    country: &str,
    followers: u64,
    engagement_rate: f64,
    global_score: f64,
) -> Value {
    json!({
        "name": name,
        "category": category,
        "country": country,
        "followers": followers,
        "engagement_rate": engagement_rate,
        "global_score": global_score,
    })
}

/// 6 Fashion/France, 3 Fashion/USA, 2 Tech/Germany — 11 records.
pub fn mixed_dataset() -> Vec<Value> {
    let mut records = Vec::new();
    for i in 0..6u64 {
        records.push(influencer(
            &format!("fr_fashion_{}", i),
            "Fashion",
            "France",
            50_000 + i * 10_000,
            2.0 + i as f64 * 0.3,
            60.0 + i as f64,
        ));
    }
    for i in 0..3u64 {
        records.push(influencer(
            &format!("us_fashion_{}", i),
            "Fashion",
            "USA",
            80_000 + i * 10_000,
            3.0,
            50.0 + i as f64,
        ));
    }
    for i in 0..2u64 {
        records.push(influencer(
            &format!("de_tech_{}", i),
            "Tech",
            "Germany",
            2_000_000 + i * 100_000,
            1.2,
            85.0 + i as f64,
        ));
    }
    records
}

pub fn write_dataset(records: &[Value]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let body = serde_json::to_string_pretty(&records).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
