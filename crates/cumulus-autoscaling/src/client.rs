//! Asynchronous Auto Scaling client.

use crate::models::{
    AttachLoadBalancerTargetGroupsRequest, AttachLoadBalancerTargetGroupsResult,
    CreateAutoScalingGroupRequest, DescribeLoadBalancerTargetGroupsRequest,
    DescribeLoadBalancerTargetGroupsResult, DetachLoadBalancerTargetGroupsRequest,
    DetachLoadBalancerTargetGroupsResult, LoadBalancerTargetGroupState,
};
use crate::Result;
use cumulus_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use cumulus_core::transport::Transport;
use cumulus_core::{AwsResponse, AwsService, ClientConfiguration};
use std::sync::Arc;
use tracing::debug;

/// Builder for [`AutoScalingClient`].
#[derive(Debug, Clone)]
pub struct AutoScalingClientBuilder {
    inner: ServiceClientBuilder,
}

impl AutoScalingClientBuilder {
    /// Create a new builder from a [`ClientConfiguration`].
    #[must_use]
    pub fn new(config: ClientConfiguration) -> Self {
        Self {
            inner: ServiceClientBuilder::new(AwsService::AutoScaling, config),
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

    /// Finalise the builder and create the [`AutoScalingClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<AutoScalingClient> {
        Ok(AutoScalingClient {
            inner: self.inner.build()?,
        })
    }
}

/// Asynchronous client for Auto Scaling.
#[derive(Debug, Clone)]
pub struct AutoScalingClient {
    inner: ServiceClient,
}

impl AutoScalingClient {
    /// Construct a client directly from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &ClientConfiguration) -> Result<Self> {
        AutoScalingClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: ClientConfiguration) -> AutoScalingClientBuilder {
        AutoScalingClientBuilder::new(config)
    }

    /// Access the underlying protocol client.
    #[must_use]
    pub const fn service_client(&self) -> &ServiceClient {
        &self.inner
    }

    /// Create an Auto Scaling group.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn create_auto_scaling_group(
        &self,
        request: &CreateAutoScalingGroupRequest,
    ) -> Result<()> {
        self.inner.send_query(request).await.map(AwsResponse::into_output)
    }

    /// Attach target groups to an Auto Scaling group.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn attach_load_balancer_target_groups(
        &self,
        request: &AttachLoadBalancerTargetGroupsRequest,
    ) -> Result<AttachLoadBalancerTargetGroupsResult> {
        self.inner.send_query(request).await.map(AwsResponse::into_output)
    }

    /// Detach target groups from an Auto Scaling group.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn detach_load_balancer_target_groups(
        &self,
        request: &DetachLoadBalancerTargetGroupsRequest,
    ) -> Result<DetachLoadBalancerTargetGroupsResult> {
        self.inner.send_query(request).await.map(AwsResponse::into_output)
    }

    /// Describe one page of the target groups attached to a group.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn describe_load_balancer_target_groups(
        &self,
        request: &DescribeLoadBalancerTargetGroupsRequest,
    ) -> Result<DescribeLoadBalancerTargetGroupsResult> {
        self.inner.send_query(request).await.map(AwsResponse::into_output)
    }

    /// Describe every target group attached to a group, following `NextToken`.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while paging.
    pub async fn describe_all_load_balancer_target_groups(
        &self,
        auto_scaling_group_name: &str,
    ) -> Result<Vec<LoadBalancerTargetGroupState>> {
        let mut request = DescribeLoadBalancerTargetGroupsRequest::new(auto_scaling_group_name);
        let mut groups = Vec::new();

        loop {
            let page = self.describe_load_balancer_target_groups(&request).await?;
            groups.extend(page.load_balancer_target_groups);

            match page.next_token {
                Some(token) if !token.is_empty() => {
                    debug!(auto_scaling_group_name, "fetching next target group page");
                    request.next_token = Some(token);
                }
                _ => return Ok(groups),
            }
        }
    }
}
