//! Cluster metadata and scrape credential discovery
//!
//! The pipeline never talks to an orchestrator directly; cluster facts and
//! scrape credentials come through the [`MetadataProvider`] seam. The bundled
//! [`RestMetadataProvider`] implements it against a metadata service speaking
//! JSON over HTTP.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use crate::models::ClusterMetadata;

/// Source of cluster facts and scrape credentials for a run
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the immutable cluster facts attached to every persisted record
    async fn cluster_metadata(&self) -> Result<ClusterMetadata>;

    /// Fetch the scrape endpoint URL and bearer token
    async fn scrape_credentials(&self) -> Result<(String, String)>;
}

/// Metadata provider backed by a cluster metadata service
pub struct RestMetadataProvider {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct CredentialsResponse {
    endpoint: String,
    token: String,
}

impl RestMetadataProvider {
    /// Create a provider for the given metadata service base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid metadata service URL")?;

        Ok(Self { client, base_url })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Metadata service error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }
}

#[async_trait]
impl MetadataProvider for RestMetadataProvider {
    async fn cluster_metadata(&self) -> Result<ClusterMetadata> {
        self.get("metadata").await
    }

    async fn scrape_credentials(&self) -> Result<(String, String)> {
        let credentials: CredentialsResponse = self.get("prometheus").await?;
        Ok((credentials.endpoint, credentials.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cluster_metadata_fetch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/metadata")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "platform": "AWS",
                    "orchestratorVersion": "4.14.2",
                    "orchestratorMajorVersion": "4.14",
                    "runtimeVersion": "v1.27.6",
                    "totalNodes": 6,
                    "networkDriver": "OVNKubernetes"
                }"#,
            )
            .create_async()
            .await;

        let provider = RestMetadataProvider::new(&server.url()).unwrap();
        let metadata = provider.cluster_metadata().await.unwrap();

        mock.assert_async().await;
        assert_eq!(metadata.platform, "AWS");
        assert_eq!(metadata.total_nodes, 6);
        assert_eq!(metadata.network_driver, "OVNKubernetes");
    }

    #[tokio::test]
    async fn test_scrape_credentials_fetch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/prometheus")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"endpoint": "https://prometheus.cluster.local", "token": "sha256~abc"}"#)
            .create_async()
            .await;

        let provider = RestMetadataProvider::new(&server.url()).unwrap();
        let (endpoint, token) = provider.scrape_credentials().await.unwrap();

        assert_eq!(endpoint, "https://prometheus.cluster.local");
        assert_eq!(token, "sha256~abc");
    }

    #[tokio::test]
    async fn test_metadata_service_error_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/metadata")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let provider = RestMetadataProvider::new(&server.url()).unwrap();
        let err = provider.cluster_metadata().await.unwrap_err();

        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(RestMetadataProvider::new("not a url").is_err());
    }
}
