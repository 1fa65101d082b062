use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use influmatch_server::config::{AppConfig, CliConfig, FileConfig};
use influmatch_server::dataset::load_snapshot;
use influmatch_server::engine::{FeatureVectorizer, RecommendationService, SharedService};
use influmatch_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the influencer dataset file (JSON array of records).
    #[clap(value_parser = parse_path)]
    pub dataset: Option<PathBuf>,

    /// Path to an optional TOML config file; values there override CLI args.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Upper bound on the search `limit` parameter.
    #[clap(long, default_value_t = 100)]
    pub max_search_results: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
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

    info!("influmatch-server {}", env!("GIT_HASH"));

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;

    let cli_config = CliConfig {
        dataset_path: cli_args.dataset,
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        max_search_results: cli_args.max_search_results,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Loading dataset from {:?}...", config.dataset_path);
    let snapshot = Arc::new(load_snapshot(&config.dataset_path, 1)?);

    // A configuration error here aborts startup: the service never serves a
    // partially-built or fabricated feature space.
    let vectorizer = Arc::new(FeatureVectorizer::default());
    let service = RecommendationService::build(snapshot, &vectorizer)?;
    let recommender = SharedService::new(service);

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level,
        port: config.port,
        max_search_results: config.max_search_results,
    };

    info!("Ready to serve at port {}!", config.port);
    run_server(
        server_config,
        recommender,
        vectorizer,
        config.dataset_path,
    )
    .await
}
