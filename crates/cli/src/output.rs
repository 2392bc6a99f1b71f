//! Operator-facing output for run results

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use harvester_lib::{ClientState, IndexerTarget, RunOutcome};

/// Row for the per-client result table
#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// Print where records went, the per-client result table, and the aggregate
/// outcome
pub fn print_summary(outcome: &RunOutcome) {
    match &outcome.target {
        IndexerTarget::Remote { server, index } => {
            print_info(&format!("Indexed remotely to {server} (index {index})"));
        }
        IndexerTarget::Local { directory, archive } => {
            print_info(&format!("Collected metrics written to {directory}"));
            if let Some(archive) = archive {
                print_info(&format!("Archived as {archive}"));
            }
        }
    }

    let rows: Vec<ClientRow> = outcome
        .clients
        .iter()
        .map(|client| ClientRow {
            endpoint: client.endpoint.clone(),
            result: color_state(client.state),
            detail: client.error.clone().unwrap_or_default(),
        })
        .collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    if outcome.succeeded() {
        print_success("All scrape clients succeeded");
    } else {
        print_error("At least one scrape client failed");
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

fn color_state(state: ClientState) -> String {
    match state {
        ClientState::Succeeded => "succeeded".green().to_string(),
        ClientState::Failed => "failed".red().to_string(),
        ClientState::Pending | ClientState::Scraping => format!("{state:?}").yellow().to_string(),
    }
}
