//! Asynchronous client for classic Elastic Load Balancing.

use crate::models::{
    AddTagsRequest, DescribeProvisionedCapacityRequest, DescribeProvisionedCapacityResult,
    DescribeTagsRequest, DescribeTagsResult,
};
use crate::Result;
use cumulus_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use cumulus_core::transport::Transport;
use cumulus_core::{AwsResponse, AwsService, ClientConfiguration};
use std::sync::Arc;

/// Builder for [`ElbClient`].
#[derive(Debug, Clone)]
pub struct ElbClientBuilder {
    inner: ServiceClientBuilder,
}

impl ElbClientBuilder {
    /// Create a new builder from a [`ClientConfiguration`].
    #[must_use]
    pub fn new(config: ClientConfiguration) -> Self {
        Self {
            inner: ServiceClientBuilder::new(AwsService::ElasticLoadBalancing, config),
        }
    }

    /// Override the HTTP client configuration.
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

    /// Finalise the builder.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<ElbClient> {
        Ok(ElbClient {
            inner: self.inner.build()?,
        })
    }
}

/// Asynchronous client for classic load balancers.
#[derive(Debug, Clone)]
pub struct ElbClient {
    inner: ServiceClient,
}

impl ElbClient {
    /// Construct a client directly from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &ClientConfiguration) -> Result<Self> {
        ElbClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: ClientConfiguration) -> ElbClientBuilder {
        ElbClientBuilder::new(config)
    }

    /// Describe the capacity reserved for a load balancer.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn describe_provisioned_capacity(
        &self,
        request: &DescribeProvisionedCapacityRequest,
    ) -> Result<DescribeProvisionedCapacityResult> {
        self.inner.send_query(request).await.map(AwsResponse::into_output)
    }

    /// Describe the tags of up to twenty load balancers.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn describe_tags(&self, request: &DescribeTagsRequest) -> Result<DescribeTagsResult> {
        self.inner.send_query(request).await.map(AwsResponse::into_output)
    }

    /// Add tags to load balancers.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn add_tags(&self, request: &AddTagsRequest) -> Result<()> {
        self.inner.send_query(request).await.map(AwsResponse::into_output)
    }
}
