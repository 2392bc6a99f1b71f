//! Fatal-tier errors
//!
//! Individual scrape-client failures are not errors at this level; they are
//! recorded per client in [`crate::runner::RunOutcome`] and surfaced through
//! the exit code.

use thiserror::Error;

/// Conditions that terminate a run immediately
#[derive(Debug, Error)]
pub enum FatalError {
    /// Cluster metadata could not be fetched; no contextual record can be built
    #[error("cluster metadata discovery failed: {source}")]
    Discovery {
        #[source]
        source: anyhow::Error,
    },

    /// Scrape credentials could not be discovered; there is no endpoint to scrape
    #[error("scrape credential discovery failed: {source}")]
    Credentials {
        #[source]
        source: anyhow::Error,
    },

    /// A requested archive could not be produced from the local output
    #[error("archive packaging failed: {source}")]
    Archive {
        #[source]
        source: anyhow::Error,
    },

    /// The run configuration is invalid; rejected before any collaborator call
    #[error("invalid run configuration: {0}")]
    Config(String),
}
