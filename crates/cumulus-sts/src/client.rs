//! Asynchronous Security Token Service client.

use crate::models::{
    AssumeRoleRequest, AssumeRoleResult, GetSessionTokenRequest, GetSessionTokenResult,
};
use crate::Result;
use cumulus_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use cumulus_core::transport::Transport;
use cumulus_core::{AwsResponse, AwsService, ClientConfiguration};
use std::sync::Arc;
use tracing::debug;

/// Builder for [`StsClient`].
#[derive(Debug, Clone)]
pub struct StsClientBuilder {
    inner: ServiceClientBuilder,
}

impl StsClientBuilder {
    /// Create a new builder from a [`ClientConfiguration`].
    #[must_use]
    pub fn new(config: ClientConfiguration) -> Self {
        Self {
            inner: ServiceClientBuilder::new(AwsService::SecurityToken, config),
        }
    }

    /// Override the HTTP client configuration used when building the client.
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(http_config);
        self
    }

    /// Send requests through a custom transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.inner = self.inner.with_transport(transport);
        self
    }

    /// Finalise the builder and create the [`StsClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<StsClient> {
        Ok(StsClient {
            inner: self.inner.build()?,
        })
    }
}

/// Asynchronous client for the Security Token Service.
///
/// The `us-east-1` region resolves to the global `sts.amazonaws.com`
/// endpoint; every other region uses its regional endpoint.
#[derive(Debug, Clone)]
pub struct StsClient {
    inner: ServiceClient,
}

impl StsClient {
    /// Construct a client directly from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &ClientConfiguration) -> Result<Self> {
        StsClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: ClientConfiguration) -> StsClientBuilder {
        StsClientBuilder::new(config)
    }

    /// Assume a role and return temporary credentials for it.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error, or a parse error if
    /// the returned credentials are incomplete.
    pub async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<AssumeRoleResult> {
        let result = self.inner.send_query(request).await.map(AwsResponse::into_output)?;
        if let Some(credentials) = &result.credentials {
            debug!(
                role_session_name = %request.role_session_name,
                expiration = %credentials.expiration,
                "assumed role"
            );
        }
        Ok(result)
    }

    /// Get temporary credentials for the calling identity.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn get_session_token(
        &self,
        request: &GetSessionTokenRequest,
    ) -> Result<GetSessionTokenResult> {
        self.inner.send_query(request).await.map(AwsResponse::into_output)
    }
}
