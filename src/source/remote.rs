//! HTTP accessor for the live platform.
//!
//! The platform exposes its current configuration as one JSON document in
//! the same shape as the desired file. The accessor fetches it with a
//! bearer token and decodes it into a [`ConfigTree`].

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, trace};

use crate::config::ConfigTree;
use crate::error::{RemoteConfigurationError, Result};

use super::store::RemoteAccessor;

/// Remote accessor fetching the observed configuration over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemoteAccessor {
    /// HTTP client.
    client: Client,
    /// Snapshot endpoint.
    url: String,
    /// Bearer token.
    token: String,
}

impl HttpRemoteAccessor {
    /// Creates a new accessor for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| RemoteConfigurationError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl RemoteAccessor for HttpRemoteAccessor {
    async fn retrieve(&self) -> Result<ConfigTree> {
        trace!("Requesting remote configuration from: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| RemoteConfigurationError::network(format!("Request failed: {e}")))?;

        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(RemoteConfigurationError::Authentication {
                message: format!("Token rejected with status {}", status.as_u16()),
            }
            .into());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteConfigurationError::request_failed(status.as_u16(), body).into());
        }

        let tree: ConfigTree = response.json().await.map_err(|e| {
            RemoteConfigurationError::InvalidResponse {
                message: format!("Failed to parse response: {e}"),
            }
        })?;

        debug!("Retrieved remote configuration with {} entities", tree.entity_count());
        Ok(tree)
    }

    fn describe(&self) -> String {
        format!("remote {}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoresyncError;
    use serde_json::json;
    use wiremock::matchers::{header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn accessor_for(server: &MockServer) -> HttpRemoteAccessor {
        HttpRemoteAccessor::new(format!("{}/config", server.uri()), "secret").unwrap()
    }

    #[tokio::test]
    async fn test_retrieve_decodes_tree() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config"))
            .and(header_eq("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "channels": [{"slug": "de", "currencyCode": "EUR"}]
            })))
            .mount(&server)
            .await;

        let tree = accessor_for(&server).await.retrieve().await.unwrap();
        assert_eq!(tree.channels.len(), 1);
        assert_eq!(tree.channels[0].slug, "de");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = accessor_for(&server).await.retrieve().await.unwrap_err();
        assert!(matches!(
            err,
            StoresyncError::RemoteConfiguration(RemoteConfigurationError::Authentication { .. })
        ));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = accessor_for(&server).await.retrieve().await.unwrap_err();
        match err {
            StoresyncError::RemoteConfiguration(RemoteConfigurationError::RequestFailed {
                status,
                message,
            }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = accessor_for(&server).await.retrieve().await.unwrap_err();
        assert!(matches!(
            err,
            StoresyncError::RemoteConfiguration(RemoteConfigurationError::InvalidResponse { .. })
        ));
    }
}
