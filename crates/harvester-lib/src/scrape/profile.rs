//! Metrics profile loading
//!
//! A profile is a YAML list of queries to run against the scrape endpoint:
//!
//! ```yaml
//! - query: sum(irate(node_cpu_seconds_total[2m])) by (mode)
//!   metricName: nodeCPU
//! - query: count(kube_namespace_labels)
//!   metricName: namespaceCount
//!   instant: true
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One profile entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricQuery {
    pub query: String,
    #[serde(rename = "metricName")]
    pub metric_name: String,
    /// Evaluate as a point query at the window end instead of a range query
    #[serde(default)]
    pub instant: bool,
}

/// Load a metrics profile from a YAML file
pub fn load_profile(path: &Path) -> Result<Vec<MetricQuery>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metrics profile {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse metrics profile {}", path.display()))
}
