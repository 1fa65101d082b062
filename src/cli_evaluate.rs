//! Offline recommender comparison CLI.
//!
//! Loads a dataset, builds the canonical feature and similarity spaces, runs
//! every candidate strategy over a reproducible query sample and prints the
//! candidates ranked by composite score.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use influmatch_server::dataset::load_snapshot;
use influmatch_server::engine::{FeatureVectorizer, SimilarityMatrix};
use influmatch_server::evaluation::{
    CandidateRecommender, CosineRecommender, EvaluationHarness, PopularityRecommender,
    RandomRecommender,
};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the influencer dataset file (JSON array of records).
    pub dataset: PathBuf,

    /// Number of query indices to sample.
    #[clap(long, default_value_t = 50)]
    pub sample_size: usize,

    /// Recommendations requested per query.
    #[clap(short, long, default_value_t = 10)]
    pub n: usize,

    /// Seed for query sampling and the random baseline.
    #[clap(long, default_value_t = 42)]
    pub seed: u64,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let snapshot = load_snapshot(&cli_args.dataset, 1)?;
    let total = snapshot.len();

    info!("Building canonical feature and similarity spaces...");
    let features = Arc::new(FeatureVectorizer::default().build(snapshot.records())?);
    let similarity = Arc::new(SimilarityMatrix::build(&features));

    let candidates: Vec<Box<dyn CandidateRecommender>> = vec![
        Box::new(CosineRecommender::new(similarity.clone())),
        Box::new(PopularityRecommender::new(&snapshot)),
        Box::new(RandomRecommender::new(total, cli_args.seed)),
    ];

    let harness = EvaluationHarness::new(features, similarity);
    let queries = harness.sample_queries(cli_args.sample_size, cli_args.seed);
    info!(
        "Evaluating {} candidates over {} queries (n = {})",
        candidates.len(),
        queries.len(),
        cli_args.n
    );

    let reports = harness.evaluate(&candidates, &queries, cli_args.n);

    println!(
        "{:<4} {:<20} {:>10} {:>10} {:>10} {:>12} {:>10}",
        "rank", "candidate", "relevance", "div_norm", "coverage", "latency(ms)", "composite"
    );
    for (rank, report) in reports.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>10.4} {:>10.4} {:>10.4} {:>12.4} {:>10.4}",
            rank + 1,
            report.name,
            report.relevance,
            report.diversity_normalized,
            report.coverage,
            report.mean_latency_secs * 1000.0,
            report.composite
        );
    }

    Ok(())
}
