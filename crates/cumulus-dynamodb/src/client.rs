//! Asynchronous DynamoDB client.

use crate::models::{
    BatchWriteItemInput, BatchWriteItemOutput, DeleteItemInput, DeleteItemOutput, GetItemInput,
    GetItemOutput, PutItemInput, PutItemOutput,
};
use crate::Result;
use cumulus_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use cumulus_core::transport::Transport;
use cumulus_core::{AwsResponse, AwsService, ClientConfiguration};
use std::sync::Arc;
use tracing::warn;

/// Builder for [`DynamoDbClient`].
#[derive(Debug, Clone)]
pub struct DynamoDbClientBuilder {
    inner: ServiceClientBuilder,
}

impl DynamoDbClientBuilder {
    /// Create a new builder from a [`ClientConfiguration`].
    #[must_use]
    pub fn new(config: ClientConfiguration) -> Self {
        Self {
            inner: ServiceClientBuilder::new(AwsService::DynamoDb, config),
        }
    }

    /// Override the HTTP client configuration used when building the client.
    ///
    /// DynamoDB defaults to ten retries starting at 25ms.
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

    /// Finalise the builder and create the [`DynamoDbClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<DynamoDbClient> {
        Ok(DynamoDbClient {
            inner: self.inner.build()?,
        })
    }
}

/// Asynchronous client for DynamoDB item operations.
#[derive(Debug, Clone)]
pub struct DynamoDbClient {
    inner: ServiceClient,
}

impl DynamoDbClient {
    /// Construct a client directly from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &ClientConfiguration) -> Result<Self> {
        DynamoDbClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: ClientConfiguration) -> DynamoDbClientBuilder {
        DynamoDbClientBuilder::new(config)
    }

    /// Put and delete up to 25 items across tables.
    ///
    /// Writes the service could not process are returned in
    /// [`BatchWriteItemOutput::unprocessed_items`]; they are not resubmitted.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn batch_write_item(
        &self,
        input: &BatchWriteItemInput,
    ) -> Result<BatchWriteItemOutput> {
        let output = self.inner.send_json(input).await.map(AwsResponse::into_output)?;
        if !output.unprocessed_items.is_empty() {
            let unprocessed: usize = output.unprocessed_items.values().map(Vec::len).sum();
            warn!(
                unprocessed,
                requested = input.len(),
                "batch write left items unprocessed"
            );
        }
        Ok(output)
    }

    /// Create or replace an item.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn put_item(&self, input: &PutItemInput) -> Result<PutItemOutput> {
        self.inner.send_json(input).await.map(AwsResponse::into_output)
    }

    /// Read an item by primary key.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn get_item(&self, input: &GetItemInput) -> Result<GetItemOutput> {
        self.inner.send_json(input).await.map(AwsResponse::into_output)
    }

    /// Delete an item by primary key.
    ///
    /// # Errors
    ///
    /// Returns a validation, transport or service error.
    pub async fn delete_item(&self, input: &DeleteItemInput) -> Result<DeleteItemOutput> {
        self.inner.send_json(input).await.map(AwsResponse::into_output)
    }
}
