//! Metrics scrape-and-index pipeline
//!
//! This crate provides the core functionality for:
//! - Cluster metadata and scrape credential discovery
//! - Persistence backend selection (remote document store or local files)
//! - Metadata merging and scrape configuration assembly
//! - Scrape job execution with fail-soft per-client outcomes
//! - Archive packaging of local output

pub mod archive;
pub mod credentials;
pub mod discovery;
pub mod error;
pub mod indexer;
pub mod metadata;
pub mod models;
pub mod run;
pub mod runner;
pub mod scrape;

pub use error::FatalError;
pub use indexer::IndexerTarget;
pub use metadata::MetadataRecord;
pub use models::*;
pub use run::{execute, RunConfig};
pub use runner::{ClientOutcome, ClientState, JobRunner, RunOutcome};
