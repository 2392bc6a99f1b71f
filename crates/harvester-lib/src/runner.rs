//! Scrape job execution
//!
//! Runs the job against every configured client in order. Failures are
//! non-fatal and non-aborting: a failed client never stops the remaining
//! clients, but it makes the aggregate outcome sticky-failed so the operator
//! still gets a nonzero exit signal alongside whatever output did persist.

use tracing::{info, warn};

use crate::indexer::{Indexer, IndexerTarget};
use crate::models::ScrapeJob;
use crate::scrape::ScrapeClient;

/// Per-client scrape state. Every client moves
/// `Pending -> Scraping -> {Succeeded, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Pending,
    Scraping,
    Succeeded,
    Failed,
}

/// Terminal result for one scrape client
#[derive(Debug)]
pub struct ClientOutcome {
    pub endpoint: String,
    pub state: ClientState,
    pub error: Option<String>,
}

/// Aggregate result of a run: every client's outcome plus the indexer
/// target actually used
#[derive(Debug)]
pub struct RunOutcome {
    pub clients: Vec<ClientOutcome>,
    pub target: IndexerTarget,
}

impl RunOutcome {
    /// True when every scrape client succeeded
    pub fn succeeded(&self) -> bool {
        self.clients
            .iter()
            .all(|client| client.state == ClientState::Succeeded)
    }

    /// Process exit signal: 0 on full success, 1 when any client failed
    pub fn exit_code(&self) -> i32 {
        if self.succeeded() {
            0
        } else {
            1
        }
    }
}

/// Executes one scrape job against every configured client
pub struct JobRunner {
    clients: Vec<ScrapeClient>,
}

impl JobRunner {
    pub fn new(clients: Vec<ScrapeClient>) -> Self {
        Self { clients }
    }

    /// Run the job against each client in configured order, collecting one
    /// outcome per client
    pub async fn run(&self, job: &ScrapeJob, indexer: &dyn Indexer) -> Vec<ClientOutcome> {
        let mut outcomes = Vec::with_capacity(self.clients.len());

        for client in &self.clients {
            info!(
                endpoint = %client.endpoint(),
                job = %job.name,
                start = job.start.timestamp(),
                end = job.end.timestamp(),
                state = ?ClientState::Scraping,
                "Scraping client"
            );

            let outcome = match client.scrape_job(job, indexer).await {
                Ok(()) => ClientOutcome {
                    endpoint: client.endpoint().to_string(),
                    state: ClientState::Succeeded,
                    error: None,
                },
                Err(err) => {
                    warn!(
                        endpoint = %client.endpoint(),
                        error = %format!("{err:#}"),
                        "Scrape client failed, continuing with remaining clients"
                    );
                    ClientOutcome {
                        endpoint: client.endpoint().to_string(),
                        state: ClientState::Failed,
                        error: Some(format!("{err:#}")),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}
