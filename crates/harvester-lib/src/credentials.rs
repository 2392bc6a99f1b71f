//! Scrape credential resolution

use tracing::{debug, info};

use crate::discovery::MetadataProvider;
use crate::error::FatalError;
use crate::models::ScrapeCredentials;

/// Resolve the scrape endpoint and token for this run.
///
/// An explicit endpoint override skips discovery entirely and is used
/// verbatim, with no token lookup. Otherwise the metadata provider is
/// queried; a discovery failure is fatal since the run cannot proceed
/// without a valid endpoint.
pub async fn resolve(
    endpoint_override: Option<&str>,
    provider: &dyn MetadataProvider,
) -> Result<ScrapeCredentials, FatalError> {
    if let Some(endpoint) = endpoint_override {
        debug!(endpoint = %endpoint, "Using explicit scrape endpoint, skipping discovery");
        return Ok(ScrapeCredentials {
            endpoint: endpoint.to_string(),
            token: String::new(),
            verify_tls: false,
        });
    }

    let (endpoint, token) = provider
        .scrape_credentials()
        .await
        .map_err(|source| FatalError::Credentials { source })?;

    info!(endpoint = %endpoint, "Discovered scrape endpoint");
    Ok(ScrapeCredentials {
        endpoint,
        token,
        verify_tls: false,
    })
}
