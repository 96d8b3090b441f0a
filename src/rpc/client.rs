//! HTTP client for pushing artifacts to the codeperf collector.

use super::endpoints::{upload_url, BenchCoordinates};
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::RemoteError;
use log::{debug, info};
use reqwest::blocking::Client;
use serde::Serialize;

/// Client for the collector API
pub struct CollectorClient {
    client: Client,
    api_url: String,
    coords: BenchCoordinates,
}

impl CollectorClient {
    /// Create a new collector client
    pub fn new(api_url: impl Into<String>, coords: BenchCoordinates) -> Result<Self, RemoteError> {
        let api_url = api_url.into();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(RemoteError::InvalidEndpoint(api_url));
        }

        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(RemoteError::RequestFailed)?;

        Ok(Self {
            client,
            api_url,
            coords,
        })
    }

    /// Endpoint an artifact is posted to
    pub fn endpoint(&self, artifact: &str) -> String {
        upload_url(&self.api_url, &self.coords, artifact)
    }

    /// POST one artifact as JSON. Any non-success status is an error.
    pub fn push<T: Serialize>(&self, artifact: &str, body: &T) -> Result<(), RemoteError> {
        let endpoint = self.endpoint(artifact);
        info!("Pushing {} to {}", artifact, endpoint);

        let response = self
            .client
            .post(&endpoint)
            .json(body)
            .send()
            .map_err(RemoteError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Rejected {
                endpoint,
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        debug!("Collector accepted {} ({})", artifact, status);
        Ok(())
    }
}
