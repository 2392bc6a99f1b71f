//! Persistence backends for scraped records
//!
//! A run persists either to a remote document store or to a local directory.
//! Selection is a pure function of the caller-supplied identifiers; the
//! backends themselves sit behind the [`Indexer`] trait.

mod local;
mod remote;

pub use local::LocalIndexer;
pub use remote::RemoteIndexer;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::models::MetricRecord;

/// Built-in default for the local output directory
pub const DEFAULT_LOCAL_DIRECTORY: &str = "collected-metrics";

/// Where this run persists its records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexerTarget {
    /// Remote document store
    Remote { server: String, index: String },
    /// Local directory, optionally archived after the run
    Local {
        directory: String,
        archive: Option<String>,
    },
}

/// Decide where this run persists its records.
///
/// Both remote identifiers non-empty selects the remote store; any other
/// combination selects local output (a lone server or index is a likely
/// misconfiguration and is warned about). A default-named local directory
/// gets the run UUID appended so concurrent runs sharing a working directory
/// don't collide; an explicit override is used verbatim.
pub fn select_target(
    server: Option<&str>,
    index: Option<&str>,
    directory: &str,
    archive: Option<&str>,
    uuid: &str,
) -> IndexerTarget {
    let server = server.unwrap_or_default();
    let index = index.unwrap_or_default();

    if !server.is_empty() && !index.is_empty() {
        return IndexerTarget::Remote {
            server: server.to_string(),
            index: index.to_string(),
        };
    }

    if server.is_empty() != index.is_empty() {
        warn!("Remote server and index must both be set; falling back to local output");
    }

    let directory = if directory == DEFAULT_LOCAL_DIRECTORY {
        format!("{directory}-{uuid}")
    } else {
        directory.to_string()
    };

    IndexerTarget::Local {
        directory,
        archive: archive.filter(|name| !name.is_empty()).map(String::from),
    }
}

/// Persistence backend invoked by scrape clients
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Durably store one metric's records
    async fn persist(&self, metric_name: &str, records: &[MetricRecord]) -> Result<()>;
}

/// Create the backend for the selected target
pub fn create_indexer(target: &IndexerTarget) -> Result<Arc<dyn Indexer>> {
    match target {
        IndexerTarget::Remote { server, index } => {
            Ok(Arc::new(RemoteIndexer::new(server, index)?))
        }
        IndexerTarget::Local { directory, .. } => Ok(Arc::new(LocalIndexer::new(directory))),
    }
}
