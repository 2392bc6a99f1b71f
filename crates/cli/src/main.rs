//! Metrics Harvester CLI
//!
//! Scrapes a metrics endpoint over a time window and indexes the results
//! into a remote document store or a local directory. If no remote indexer
//! is specified, local output is used by default.

mod output;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use harvester_lib::discovery::RestMetadataProvider;
use harvester_lib::{execute, RunConfig};

/// Scrape and index cluster metrics
#[derive(Parser)]
#[command(name = "harvest")]
#[command(author, version, about = "Scrape and index cluster metrics", long_about = None)]
struct Cli {
    /// Run identifier stamped on every persisted record (generated if unset)
    #[arg(long, env = "HARVEST_UUID")]
    uuid: Option<String>,

    /// Metrics profile file
    #[arg(long, short = 'm', default_value = "metrics.yml")]
    metrics_profile: String,

    /// Directory to dump the metrics files in, when using default local indexing
    #[arg(long, default_value = "collected-metrics")]
    metrics_directory: String,

    /// Scrape step size in seconds
    #[arg(long, default_value_t = 30)]
    step: u64,

    /// Epoch start time (defaults to one hour ago)
    #[arg(long)]
    start: Option<i64>,

    /// Epoch end time (defaults to now)
    #[arg(long)]
    end: Option<i64>,

    /// Indexing job name
    #[arg(long, default_value = "kube-burner-ocp-indexing")]
    job_name: String,

    /// User provided metadata file, in YAML format
    #[arg(long)]
    user_metadata: Option<PathBuf>,

    /// Dump collected metrics into a tarball with the given name, requires local indexing
    #[arg(long)]
    tarball_name: Option<String>,

    /// Remote document store server URL
    #[arg(long, env = "HARVEST_ES_SERVER")]
    es_server: Option<String>,

    /// Remote index name, required together with --es-server
    #[arg(long, env = "HARVEST_ES_INDEX")]
    es_index: Option<String>,

    /// Explicit scrape endpoint URL, skips endpoint and token discovery
    #[arg(long)]
    metrics_endpoint: Option<String>,

    /// Cluster metadata service base URL
    #[arg(long, env = "HARVEST_METADATA_URL", default_value = "http://localhost:8080")]
    metadata_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let uuid = cli.uuid.unwrap_or_else(|| Uuid::new_v4().to_string());
    info!(uuid = %uuid, "Starting metrics harvest");

    let now = Utc::now().timestamp();
    let config = RunConfig {
        uuid: uuid.clone(),
        start: cli.start.unwrap_or(now - 3600),
        end: cli.end.unwrap_or(now),
        step: Duration::from_secs(cli.step),
        job_name: cli.job_name,
        metrics_profile: cli.metrics_profile,
        user_metadata: cli.user_metadata,
        endpoint_override: cli.metrics_endpoint,
        remote_server: cli.es_server,
        remote_index: cli.es_index,
        local_directory: cli.metrics_directory,
        archive_name: cli.tarball_name,
    };

    let provider = RestMetadataProvider::new(&cli.metadata_url)?;

    let outcome = match execute(&config, &provider).await {
        Ok(outcome) => outcome,
        Err(err) => {
            output::print_error(&err.to_string());
            std::process::exit(1);
        }
    };

    output::print_summary(&outcome);
    info!(uuid = %uuid, "Exiting metrics harvest");
    std::process::exit(outcome.exit_code());
}
