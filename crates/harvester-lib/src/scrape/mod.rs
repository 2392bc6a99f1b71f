//! Scrape configuration and the scrape client

mod client;
mod profile;

pub use client::ScrapeClient;
pub use profile::{load_profile, MetricQuery};

use std::time::Duration;

use crate::models::ScrapeCredentials;

/// Immutable configuration for one scrape client
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub endpoint: String,
    pub token: String,
    pub step: Duration,
    /// Metric-profile file identifiers this client scrapes
    pub metric_profiles: Vec<String>,
    pub skip_tls_verify: bool,
}

/// Assemble the scrape configuration from the resolved credentials.
///
/// Pure assembly, no failure path. TLS verification stays disabled because
/// scrape targets are typically self-signed cluster endpoints.
pub fn build_config(
    credentials: &ScrapeCredentials,
    metrics_profile: &str,
    step: Duration,
) -> ScrapeConfig {
    ScrapeConfig {
        endpoint: credentials.endpoint.clone(),
        token: credentials.token.clone(),
        step,
        metric_profiles: vec![metrics_profile.to_string()],
        skip_tls_verify: !credentials.verify_tls,
    }
}
