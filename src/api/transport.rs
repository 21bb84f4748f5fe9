//! HTTP transport abstraction.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::Result;

/// Default request timeout for the reqwest transport.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A response as seen by the API client, before any status handling.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body, as text
    pub body: String,
}

impl RawResponse {
    /// Create a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Trait for transports able to perform a GET request.
///
/// The API client only depends on this capability, so tests and callers
/// can swap in their own implementation.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a GET on `url` with the given query parameters.
    ///
    /// Non-success statuses are not errors at this level.
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse>;
}

/// Transport backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "Received response");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reqwest_transport_sends_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/lol/na/v1.4/summoner/by-name/someone"))
            .and(query_param("api_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"someone":{"id":1}}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let url = format!("{}/api/lol/na/v1.4/summoner/by-name/someone", mock_server.uri());
        let response = transport
            .get(&url, &[("api_key".to_string(), "secret".to_string())])
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, r#"{"someone":{"id":1}}"#);
    }

    #[tokio::test]
    async fn test_reqwest_transport_passes_error_status_through() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "3"))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::with_timeout(Duration::from_secs(2)).unwrap();
        let response = transport.get(&mock_server.uri(), &[]).await.unwrap();

        assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers["retry-after"], "3");
    }

    #[tokio::test]
    async fn test_reqwest_transport_connection_error() {
        let transport = ReqwestTransport::with_timeout(Duration::from_secs(1)).unwrap();
        let result = transport.get("http://127.0.0.1:1/unreachable", &[]).await;
        tokio_test::assert_err!(result);
    }
}
