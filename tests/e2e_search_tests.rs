mod common;

use common::fixtures::{mixed_dataset, write_dataset};
use http::StatusCode;

#[tokio::test]
async fn search_filters_by_category_and_ranks_by_score() {
    let dataset = write_dataset(&mixed_dataset());
    let app = common::app_for_dataset(dataset.path());

    let (status, body) = common::get(app, "/v1/search?category=Fashion").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 9);

    let results = body["results"].as_array().unwrap();
    let mut previous = f64::INFINITY;
    for item in results {
        assert_eq!(item["category"], "Fashion");
        let score = item["global_score"].as_f64().unwrap();
        assert!(score <= previous);
        previous = score;
    }
}

#[tokio::test]
async fn search_combines_all_filters() {
    let dataset = write_dataset(&mixed_dataset());
    let app = common::app_for_dataset(dataset.path());

    let (status, body) = common::get(
        app,
        "/v1/search?category=Fashion&country=USA&min_followers=90000",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // us_fashion_1 (90K) and us_fashion_2 (100K).
    assert_eq!(body["count"], 2);
    for item in body["results"].as_array().unwrap() {
        assert_eq!(item["country"], "USA");
        assert!(item["followers"].as_u64().unwrap() >= 90_000);
    }
}

#[tokio::test]
async fn search_without_filters_respects_limit() {
    let dataset = write_dataset(&mixed_dataset());
    let app = common::app_for_dataset(dataset.path());

    let (status, body) = common::get(app, "/v1/search?limit=4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn search_with_no_matches_is_empty_success() {
    let dataset = write_dataset(&mixed_dataset());
    let app = common::app_for_dataset(dataset.path());

    let (status, body) = common::get(app, "/v1/search?category=Gaming").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn detail_returns_full_record() {
    let dataset = write_dataset(&mixed_dataset());
    let app = common::app_for_dataset(dataset.path());

    let (status, body) = common::get(app, "/v1/influencer/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 0);
    assert_eq!(body["name"], "fr_fashion_0");
    assert_eq!(body["category"], "Fashion");
    assert!(body["engagement_rate"].is_number());
}

#[tokio::test]
async fn detail_out_of_range_is_not_found() {
    let dataset = write_dataset(&mixed_dataset());
    let app = common::app_for_dataset(dataset.path());

    let (status, body) = common::get(app, "/v1/influencer/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn stats_aggregates_the_snapshot() {
    let dataset = write_dataset(&mixed_dataset());
    let app = common::app_for_dataset(dataset.path());

    let (status, body) = common::get(app, "/v1/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 11);
    assert_eq!(body["category_counts"]["Fashion"], 9);
    assert_eq!(body["category_counts"]["Tech"], 2);
    assert_eq!(body["country_counts"]["France"], 6);

    let followers = body["followers_distribution"].as_array().unwrap();
    let total: u64 = followers
        .iter()
        .map(|b| b["count"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 11);

    // The 2 Tech records are the only ones past 1M followers.
    let over_1m = followers
        .iter()
        .find(|b| b["label"] == "1M-10M")
        .unwrap();
    assert_eq!(over_1m["count"], 2);
}

#[tokio::test]
async fn home_reports_snapshot_info() {
    let dataset = write_dataset(&mixed_dataset());
    let app = common::app_for_dataset(dataset.path());

    let (status, body) = common::get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot_version"], 1);
    assert_eq!(body["total_records"], 11);
    assert!(body["uptime"].is_string());
}
