//! Remote document store indexer

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::Indexer;
use crate::models::MetricRecord;

/// Ships records to a document store through its bulk endpoint
pub struct RemoteIndexer {
    client: Client,
    bulk_url: Url,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
}

impl RemoteIndexer {
    pub fn new(server: &str, index: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let bulk_url = Url::parse(&format!("{}/{}/_bulk", server.trim_end_matches('/'), index))
            .with_context(|| format!("Invalid document store server URL: {server}"))?;

        Ok(Self { client, bulk_url })
    }
}

#[async_trait]
impl Indexer for RemoteIndexer {
    async fn persist(&self, metric_name: &str, records: &[MetricRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut body = String::new();
        for record in records {
            body.push_str("{\"index\":{}}\n");
            body.push_str(&serde_json::to_string(record).context("Failed to serialize record")?);
            body.push('\n');
        }

        let response = self
            .client
            .post(self.bulk_url.clone())
            .header("content-type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .context("Failed to send bulk request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Document store error ({}): {}", status, body);
        }

        let bulk: BulkResponse = response
            .json()
            .await
            .context("Failed to parse bulk response")?;
        if bulk.errors {
            anyhow::bail!("Document store rejected part of the {metric_name} bulk request");
        }

        debug!(
            metric = metric_name,
            records = records.len(),
            "Indexed records remotely"
        );
        Ok(())
    }
}
