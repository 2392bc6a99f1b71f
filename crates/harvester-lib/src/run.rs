//! Run orchestration
//!
//! One run: resolve credentials, select the persistence backend, merge
//! metadata, assemble the scrape configuration, execute the job against
//! every configured client, then optionally archive local output. Fatal
//! conditions surface as [`FatalError`]; individual client failures are
//! recorded in the returned [`RunOutcome`].

use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::archive;
use crate::credentials;
use crate::discovery::MetadataProvider;
use crate::error::FatalError;
use crate::indexer::{self, IndexerTarget, DEFAULT_LOCAL_DIRECTORY};
use crate::metadata::{self, MetadataRecord};
use crate::models::ScrapeJob;
use crate::runner::{JobRunner, RunOutcome};
use crate::scrape::{self, ScrapeClient};

/// Everything a run needs, constructed once by the caller and passed by
/// reference through each stage
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Run identifier stamped on every persisted record
    pub uuid: String,
    /// Scrape window start, seconds since the epoch
    pub start: i64,
    /// Scrape window end, seconds since the epoch
    pub end: i64,
    /// Sample resolution requested from the metrics source
    pub step: Duration,
    pub job_name: String,
    /// Metrics profile file identifier
    pub metrics_profile: String,
    /// Optional operator metadata document (YAML)
    pub user_metadata: Option<PathBuf>,
    /// Explicit scrape endpoint; set to skip discovery
    pub endpoint_override: Option<String>,
    pub remote_server: Option<String>,
    pub remote_index: Option<String>,
    pub local_directory: String,
    pub archive_name: Option<String>,
}

impl RunConfig {
    /// A config with the standard defaults: the prior hour through now at a
    /// 30 second step, persisted locally
    pub fn new(uuid: impl Into<String>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            uuid: uuid.into(),
            start: now - 3600,
            end: now,
            step: Duration::from_secs(30),
            job_name: "kube-burner-ocp-indexing".to_string(),
            metrics_profile: "metrics.yml".to_string(),
            user_metadata: None,
            endpoint_override: None,
            remote_server: None,
            remote_index: None,
            local_directory: DEFAULT_LOCAL_DIRECTORY.to_string(),
            archive_name: None,
        }
    }
}

/// Execute one scrape-and-index run
pub async fn execute(
    config: &RunConfig,
    provider: &dyn MetadataProvider,
) -> Result<RunOutcome, FatalError> {
    let (start, end) = validate_window(config)?;

    let cluster = provider
        .cluster_metadata()
        .await
        .map_err(|source| FatalError::Discovery { source })?;
    info!(
        platform = %cluster.platform,
        version = %cluster.orchestrator_version,
        nodes = cluster.total_nodes,
        "Fetched cluster metadata"
    );

    let scrape_credentials =
        credentials::resolve(config.endpoint_override.as_deref(), provider).await?;

    let target = indexer::select_target(
        config.remote_server.as_deref(),
        config.remote_index.as_deref(),
        &config.local_directory,
        config.archive_name.as_deref(),
        &config.uuid,
    );
    info!(target = ?target, "Selected indexer target");

    let user = match &config.user_metadata {
        Some(path) => metadata::load_user_metadata(path)
            .map_err(|err| FatalError::Config(format!("{err:#}")))?,
        None => Default::default(),
    };
    let merged = MetadataRecord::merge(&cluster, user, &config.uuid);

    let scrape_config =
        scrape::build_config(&scrape_credentials, &config.metrics_profile, config.step);
    let mut queries = Vec::new();
    for profile in &scrape_config.metric_profiles {
        queries.extend(
            scrape::load_profile(Path::new(profile))
                .map_err(|err| FatalError::Config(format!("{err:#}")))?,
        );
    }
    let client = ScrapeClient::new(&scrape_config, queries, merged)
        .map_err(|err| FatalError::Config(format!("{err:#}")))?;

    let job = ScrapeJob {
        start,
        end,
        name: config.job_name.clone(),
        step: scrape_config.step,
    };
    let backend = indexer::create_indexer(&target)
        .map_err(|err| FatalError::Config(format!("{err:#}")))?;

    let runner = JobRunner::new(vec![client]);
    let clients = runner.run(&job, backend.as_ref()).await;

    if let IndexerTarget::Local {
        directory,
        archive: Some(name),
    } = &target
    {
        archive::create_archive(Path::new(directory), name)
            .map_err(|source| FatalError::Archive { source })?;
    }

    Ok(RunOutcome { clients, target })
}

fn validate_window(config: &RunConfig) -> Result<(DateTime<Utc>, DateTime<Utc>), FatalError> {
    if config.end < config.start {
        return Err(FatalError::Config(format!(
            "scrape window ends ({}) before it starts ({})",
            config.end, config.start
        )));
    }
    let start = Utc
        .timestamp_opt(config.start, 0)
        .single()
        .ok_or_else(|| FatalError::Config(format!("start time {} out of range", config.start)))?;
    let end = Utc
        .timestamp_opt(config.end, 0)
        .single()
        .ok_or_else(|| FatalError::Config(format!("end time {} out of range", config.end)))?;
    Ok((start, end))
}
