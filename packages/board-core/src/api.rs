//! HTTP client for the remote provider resource.
//!
//! [`ProviderApi`] is the seam between the store and the wire: the store only
//! ever talks to the trait, so tests swap in
//! [`crate::testing::MockProviderApi`] without a server.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;
use crate::types::{NewProvider, Provider, ProviderId};

/// Remote CRUD surface for the provider collection.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    /// Read the full provider collection.
    async fn list(&self) -> Result<Vec<Provider>, ApiError>;

    /// Create a provider; the server returns the canonical record with id.
    async fn create(&self, input: &NewProvider) -> Result<Provider, ApiError>;

    /// Replace a provider with the given full record.
    async fn update(&self, provider: &Provider) -> Result<(), ApiError>;

    /// Delete a provider by id.
    async fn delete(&self, id: ProviderId) -> Result<(), ApiError>;
}

/// [`ProviderApi`] over plain JSON-over-HTTP.
///
/// No request timeout is applied; a hung request delays one refresh cycle
/// and nothing else.
#[derive(Debug, Clone)]
pub struct HttpProviderApi {
    http_client: Client,
    base_url: String,
}

impl HttpProviderApi {
    /// Create a client against the given base URL (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/api/providers", self.base_url)
    }

    fn resource_url(&self, id: ProviderId) -> String {
        format!("{}/api/providers/{}", self.base_url, id)
    }

    /// Map a non-success response to [`ApiError::Api`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "provider API returned an error");
        Err(ApiError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ProviderApi for HttpProviderApi {
    async fn list(&self) -> Result<Vec<Provider>, ApiError> {
        let response = self
            .http_client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "provider list request failed");
                ApiError::Network(e.to_string())
            })?;

        let payload: Value = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        // A non-array payload (error object, HTML-as-JSON, etc.) must not
        // take the display down; the store maps this to an empty list.
        if !payload.is_array() {
            warn!("provider list response was not an array");
            return Err(ApiError::UnexpectedShape);
        }

        serde_json::from_value(payload).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn create(&self, input: &NewProvider) -> Result<Provider, ApiError> {
        let response = self
            .http_client
            .post(self.collection_url())
            .json(input)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "provider create request failed");
                ApiError::Network(e.to_string())
            })?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn update(&self, provider: &Provider) -> Result<(), ApiError> {
        let response = self
            .http_client
            .put(self.resource_url(provider.id))
            .json(provider)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "provider update request failed");
                ApiError::Network(e.to_string())
            })?;

        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, id: ProviderId) -> Result<(), ApiError> {
        let response = self
            .http_client
            .delete(self.resource_url(id))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "provider delete request failed");
                ApiError::Network(e.to_string())
            })?;

        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let api = HttpProviderApi::new("http://localhost:8080/");
        assert_eq!(api.collection_url(), "http://localhost:8080/api/providers");
        assert_eq!(
            api.resource_url(ProviderId(3)),
            "http://localhost:8080/api/providers/3"
        );
    }
}
