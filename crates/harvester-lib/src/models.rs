//! Core data models for the scrape-and-index pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::metadata::MetadataRecord;

/// Cluster facts fetched once from the metadata provider.
///
/// Read-only after discovery; every later stage borrows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetadata {
    pub platform: String,
    pub orchestrator_version: String,
    pub orchestrator_major_version: String,
    pub runtime_version: String,
    pub total_nodes: u32,
    pub network_driver: String,
}

/// Resolved scrape endpoint and bearer token; immutable for the run
#[derive(Debug, Clone)]
pub struct ScrapeCredentials {
    pub endpoint: String,
    pub token: String,
    /// Always false: scrape targets are typically self-signed cluster endpoints
    pub verify_tls: bool,
}

/// One scrape job: the window to cover, its name, and the sample resolution
#[derive(Debug, Clone)]
pub struct ScrapeJob {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub name: String,
    pub step: Duration,
}

/// One persisted sample produced by a scrape client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub timestamp: DateTime<Utc>,
    pub labels: BTreeMap<String, String>,
    pub value: f64,
    pub metric_name: String,
    pub query: String,
    pub job_name: String,
    pub uuid: String,
    pub metadata: MetadataRecord,
}
