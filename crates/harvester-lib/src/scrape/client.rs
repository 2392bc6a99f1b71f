//! Scrape client for Prometheus-compatible endpoints
//!
//! One client runs every profile query over the job window, converts the
//! response envelope into [`MetricRecord`]s stamped with the merged run
//! metadata, and hands each metric's records to the persistence backend.

use anyhow::{Context, Result};
use chrono::TimeZone;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{MetricQuery, ScrapeConfig};
use crate::indexer::Indexer;
use crate::metadata::MetadataRecord;
use crate::models::{MetricRecord, ScrapeJob};

/// One configured connection to a metrics source
pub struct ScrapeClient {
    http: Client,
    base: Url,
    token: String,
    queries: Vec<MetricQuery>,
    metadata: MetadataRecord,
}

#[derive(Debug, Deserialize)]
struct PromResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<PromData>,
}

#[derive(Debug, Deserialize)]
struct PromData {
    result: Vec<PromSeries>,
}

#[derive(Debug, Deserialize)]
struct PromSeries {
    metric: BTreeMap<String, String>,
    #[serde(default)]
    values: Vec<PromSample>,
    #[serde(default)]
    value: Option<PromSample>,
}

/// A sample is serialized as `[<unix seconds>, "<value>"]`
#[derive(Debug, Deserialize)]
struct PromSample(f64, String);

impl ScrapeClient {
    /// Create a client for the given configuration
    pub fn new(
        config: &ScrapeConfig,
        queries: Vec<MetricQuery>,
        metadata: MetadataRecord,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .danger_accept_invalid_certs(config.skip_tls_verify)
            .build()
            .context("Failed to create HTTP client")?;

        // Normalize to a trailing slash so joins append instead of replace.
        let base = Url::parse(&format!("{}/", config.endpoint.trim_end_matches('/')))
            .with_context(|| format!("Invalid scrape endpoint: {}", config.endpoint))?;

        Ok(Self {
            http,
            base,
            token: config.token.clone(),
            queries,
            metadata,
        })
    }

    /// The endpoint this client scrapes
    pub fn endpoint(&self) -> &str {
        self.base.as_str()
    }

    /// Run every profile query over the job window, persisting each metric's
    /// records as it completes. Any query or persist failure fails the whole
    /// job for this client.
    pub async fn scrape_job(&self, job: &ScrapeJob, indexer: &dyn Indexer) -> Result<()> {
        for query in &self.queries {
            let records = self.fetch(query, job).await?;
            debug!(
                metric = %query.metric_name,
                records = records.len(),
                "Scraped metric"
            );
            indexer
                .persist(&query.metric_name, &records)
                .await
                .with_context(|| format!("Failed to persist {}", query.metric_name))?;
        }
        Ok(())
    }

    async fn fetch(&self, query: &MetricQuery, job: &ScrapeJob) -> Result<Vec<MetricRecord>> {
        let (path, params) = if query.instant {
            (
                "api/v1/query",
                vec![
                    ("query", query.query.clone()),
                    ("time", job.end.timestamp().to_string()),
                ],
            )
        } else {
            (
                "api/v1/query_range",
                vec![
                    ("query", query.query.clone()),
                    ("start", job.start.timestamp().to_string()),
                    ("end", job.end.timestamp().to_string()),
                    ("step", format!("{}s", job.step.as_secs())),
                ],
            )
        };

        let url = self.base.join(path).context("Invalid scrape endpoint path")?;
        let mut request = self.http.get(url).query(&params);
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to query {}", self.base))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Scrape endpoint error ({}): {}", status, body);
        }

        let envelope: PromResponse = response
            .json()
            .await
            .context("Failed to parse query response")?;
        if envelope.status != "success" {
            anyhow::bail!(
                "Query '{}' failed: {}",
                query.query,
                envelope.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        let data = envelope.data.context("Query response carried no data")?;

        self.to_records(query, job, data)
    }

    fn to_records(
        &self,
        query: &MetricQuery,
        job: &ScrapeJob,
        data: PromData,
    ) -> Result<Vec<MetricRecord>> {
        let mut records = Vec::new();
        for series in data.result {
            let samples = match series.value {
                Some(sample) => vec![sample],
                None => series.values,
            };
            for PromSample(ts, raw) in samples {
                let timestamp = chrono::Utc
                    .timestamp_opt(ts.trunc() as i64, (ts.fract() * 1e9) as u32)
                    .single()
                    .with_context(|| format!("Sample timestamp {ts} out of range"))?;
                let value: f64 = raw
                    .parse()
                    .with_context(|| format!("Unparseable sample value '{raw}'"))?;
                records.push(MetricRecord {
                    timestamp,
                    labels: series.metric.clone(),
                    value,
                    metric_name: query.metric_name.clone(),
                    query: query.query.clone(),
                    job_name: job.name.clone(),
                    uuid: self.metadata.uuid.clone(),
                    metadata: self.metadata.clone(),
                });
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClusterMetadata;

    fn client() -> ScrapeClient {
        let config = ScrapeConfig {
            endpoint: "https://prom.cluster.local".to_string(),
            token: "tok".to_string(),
            step: Duration::from_secs(30),
            metric_profiles: vec!["metrics.yml".to_string()],
            skip_tls_verify: true,
        };
        let cluster = ClusterMetadata {
            platform: "AWS".to_string(),
            orchestrator_version: "4.14.2".to_string(),
            orchestrator_major_version: "4.14".to_string(),
            runtime_version: "v1.27.6".to_string(),
            total_nodes: 6,
            network_driver: "OVNKubernetes".to_string(),
        };
        let metadata = MetadataRecord::merge(&cluster, BTreeMap::new(), "abc123");
        ScrapeClient::new(&config, Vec::new(), metadata).unwrap()
    }

    fn job() -> ScrapeJob {
        ScrapeJob {
            start: chrono::Utc.timestamp_opt(0, 0).unwrap(),
            end: chrono::Utc.timestamp_opt(3600, 0).unwrap(),
            name: "test-job".to_string(),
            step: Duration::from_secs(30),
        }
    }

    fn query() -> MetricQuery {
        MetricQuery {
            query: "sum(irate(node_cpu_seconds_total[2m])) by (mode)".to_string(),
            metric_name: "nodeCPU".to_string(),
            instant: false,
        }
    }

    #[test]
    fn test_matrix_payload_converts_to_records() {
        let payload = r#"{
            "result": [
                {
                    "metric": {"mode": "idle"},
                    "values": [[60, "0.95"], [90, "0.97"]]
                },
                {
                    "metric": {"mode": "user"},
                    "values": [[60, "0.03"]]
                }
            ]
        }"#;
        let data: PromData = serde_json::from_str(payload).unwrap();

        let records = client().to_records(&query(), &job(), data).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].labels["mode"], "idle");
        assert_eq!(records[0].value, 0.95);
        assert_eq!(records[0].timestamp.timestamp(), 60);
        assert_eq!(records[0].metric_name, "nodeCPU");
        assert_eq!(records[0].job_name, "test-job");
        assert_eq!(records[0].uuid, "abc123");
        assert_eq!(records[2].labels["mode"], "user");
    }

    #[test]
    fn test_vector_payload_converts_to_records() {
        let payload = r#"{
            "result": [
                {"metric": {"instance": "node-0"}, "value": [3600, "42"]}
            ]
        }"#;
        let data: PromData = serde_json::from_str(payload).unwrap();

        let records = client().to_records(&query(), &job(), data).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 42.0);
        assert_eq!(records[0].metadata.platform, "AWS");
    }

    #[test]
    fn test_unparseable_sample_value_is_an_error() {
        let payload = r#"{
            "result": [
                {"metric": {}, "values": [[60, "not-a-number"]]}
            ]
        }"#;
        let data: PromData = serde_json::from_str(payload).unwrap();

        let err = client().to_records(&query(), &job(), data).unwrap_err();
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn test_error_envelope_parses() {
        let envelope: PromResponse = serde_json::from_str(
            r#"{"status": "error", "errorType": "bad_data", "error": "parse error"}"#,
        )
        .unwrap();

        assert_eq!(envelope.status, "error");
        assert_eq!(envelope.error.as_deref(), Some("parse error"));
        assert!(envelope.data.is_none());
    }
}
