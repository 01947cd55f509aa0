//! Unmarshalled responses and their metadata.

use serde::Serialize;

/// Metadata the service attaches to every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ResponseMetadata {
    /// Request ID assigned by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// An operation result together with the response metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AwsResponse<T> {
    output: T,
    metadata: ResponseMetadata,
}

impl<T> AwsResponse<T> {
    /// Pair an output with its metadata.
    #[must_use]
    pub const fn new(output: T, metadata: ResponseMetadata) -> Self {
        Self { output, metadata }
    }

    /// Borrow the operation result.
    #[must_use]
    pub const fn output(&self) -> &T {
        &self.output
    }

    /// Response metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }

    /// Request ID assigned by the service, if it sent one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.metadata.request_id.as_deref()
    }

    /// Discard the metadata and return the operation result.
    #[must_use]
    pub fn into_output(self) -> T {
        self.output
    }

    /// Split into output and metadata.
    #[must_use]
    pub fn into_parts(self) -> (T, ResponseMetadata) {
        (self.output, self.metadata)
    }
}
