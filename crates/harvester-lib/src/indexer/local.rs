//! Local file-based indexer

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::Indexer;
use crate::models::MetricRecord;

/// Writes one JSON file per metric name into the output directory
pub struct LocalIndexer {
    directory: PathBuf,
}

impl LocalIndexer {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl Indexer for LocalIndexer {
    async fn persist(&self, metric_name: &str, records: &[MetricRecord]) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| {
                format!("Failed to create output directory {}", self.directory.display())
            })?;

        let path = self.directory.join(format!("{metric_name}.json"));
        let json = serde_json::to_vec_pretty(records).context("Failed to serialize records")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(
            file = %path.display(),
            records = records.len(),
            "Wrote local metric file"
        );
        Ok(())
    }
}
