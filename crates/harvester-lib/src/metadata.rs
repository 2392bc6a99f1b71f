//! Run metadata assembly
//!
//! Every persisted record carries one merged attribute set: six fixed
//! cluster-derived fields, the run UUID, and whatever the operator supplied
//! through the user metadata document. User entries are layered on top of the
//! cluster facts, so an entry naming a fixed field overrides it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::ClusterMetadata;

/// Merged attribute set attached to every persisted record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub platform: String,
    pub orchestrator_version: String,
    pub orchestrator_major_version: String,
    pub runtime_version: String,
    pub total_nodes: u32,
    pub network_driver: String,
    pub uuid: String,
    /// Operator-supplied entries, flattened beside the fixed fields
    #[serde(flatten)]
    pub user: BTreeMap<String, Value>,
}

impl MetadataRecord {
    /// Build the merged record from cluster facts, the user document, and
    /// the run UUID
    pub fn merge(
        cluster: &ClusterMetadata,
        user: BTreeMap<String, Value>,
        uuid: &str,
    ) -> Self {
        let mut record = Self {
            platform: cluster.platform.clone(),
            orchestrator_version: cluster.orchestrator_version.clone(),
            orchestrator_major_version: cluster.orchestrator_major_version.clone(),
            runtime_version: cluster.runtime_version.clone(),
            total_nodes: cluster.total_nodes,
            network_driver: cluster.network_driver.clone(),
            uuid: uuid.to_string(),
            user: BTreeMap::new(),
        };
        for (key, value) in user {
            record.apply(key, value);
        }
        record
    }

    /// Layer one user entry onto the record. A key naming a fixed field
    /// replaces that field; everything else lands in the extension map, which
    /// therefore never shadows a fixed attribute name.
    fn apply(&mut self, key: String, value: Value) {
        match key.as_str() {
            "platform" => self.platform = coerce_string(value),
            "orchestratorVersion" => self.orchestrator_version = coerce_string(value),
            "orchestratorMajorVersion" => self.orchestrator_major_version = coerce_string(value),
            "runtimeVersion" => self.runtime_version = coerce_string(value),
            "networkDriver" => self.network_driver = coerce_string(value),
            "uuid" => self.uuid = coerce_string(value),
            "totalNodes" => {
                if let Some(nodes) = value.as_u64() {
                    self.total_nodes = nodes as u32;
                }
            }
            _ => {
                self.user.insert(key, value);
            }
        }
    }
}

fn coerce_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Load the operator-supplied metadata document (a YAML mapping)
pub fn load_user_metadata(path: &Path) -> Result<BTreeMap<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read user metadata file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse user metadata file {}", path.display()))
}
