//! HTTP transport seam.
//!
//! [`Transport`] is the single point where bytes leave the process, so retry
//! and protocol logic in [`crate::client`] can be exercised without a network.

use crate::client::ClientConfig;
use crate::config::ClientConfiguration;
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, ClientBuilder, Method};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// A fully resolved HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URL
    pub url: Url,
    /// Request headers in send order
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Bytes,
}

impl HttpRequest {
    /// Look up a header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response with the body fully read.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response with no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends HTTP requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and read the whole response.
    ///
    /// Non-2xx responses are returned as `Ok`; only failures to exchange the
    /// request (connect errors, timeouts) are errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`], [`Error::ServiceUnavailable`] or
    /// [`Error::HttpError`] when the exchange fails.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build a transport from the HTTP tuning and client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the CA certificate cannot be loaded or
    /// the HTTP client cannot be built.
    pub fn new(
        http_config: &ClientConfig,
        config: &ClientConfiguration,
        user_agent: &str,
    ) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(http_config.timeout)
            .pool_idle_timeout(http_config.pool_idle_timeout)
            .pool_max_idle_per_host(http_config.pool_max_idle_per_host)
            .gzip(http_config.enable_compression)
            .connect_timeout(Duration::from_secs(10));

        if !config.tls_verify {
            warn!("TLS verification disabled for service client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &config.tls_ca_cert {
            debug!("loading CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub const fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.http.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_response_helpers() {
        let response = HttpResponse::new(200, "ok").with_header("X-Amzn-RequestId", "abc");
        assert!(response.is_success());
        assert_eq!(response.header("x-amzn-requestid"), Some("abc"));
        assert!(!HttpResponse::new(503, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
    }

    #[tokio::test]
    async fn test_reqwest_transport_round_trip() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", "DynamoDB_20120810.GetItem"))
            .and(body_string("{}"))
            .respond_with(
                ResponseTemplate::new(400)
                    .insert_header("x-amzn-RequestId", "rid-7")
                    .set_body_string("{\"__type\":\"ValidationException\"}"),
            )
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(
            &ClientConfig::new(),
            &ClientConfiguration::default(),
            "cumulus-test",
        )
        .unwrap();

        let response = transport
            .send(HttpRequest {
                method: Method::POST,
                url: Url::parse(&server.uri()).unwrap(),
                headers: vec![(
                    "X-Amz-Target".to_string(),
                    "DynamoDB_20120810.GetItem".to_string(),
                )],
                body: Bytes::from_static(b"{}"),
            })
            .await
            .unwrap();

        assert_eq!(response.status, 400);
        assert_eq!(response.header("x-amzn-requestid"), Some("rid-7"));
        assert_eq!(response.body, Bytes::from_static(b"{\"__type\":\"ValidationException\"}"));
    }

    #[tokio::test]
    async fn test_connect_failure_is_an_error() {
        let transport = ReqwestTransport::from_client(Client::new());
        let result = transport
            .send(HttpRequest {
                method: Method::POST,
                url: Url::parse("http://127.0.0.1:9/").unwrap(),
                headers: Vec::new(),
                body: Bytes::new(),
            })
            .await;
        assert!(result.unwrap_err().is_retryable());
    }
}
