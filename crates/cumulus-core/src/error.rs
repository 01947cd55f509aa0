//! Error types for Cumulus operations.
//!
//! This module provides the error type shared by every service crate, including
//! the structured [`ServiceError`] returned by the remote web service and the
//! retry classification used by the transport.

use serde::Serialize;
use thiserror::Error;

use crate::xml::XmlError;

/// Error codes that the web services use to signal request throttling.
pub const THROTTLING_ERROR_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestThrottledException",
    "TooManyRequestsException",
    "ProvisionedThroughputExceededException",
    "RequestLimitExceeded",
    "BandwidthLimitExceeded",
    "RequestThrottled",
];

/// Main error type for Cumulus operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The caller passed an argument that cannot be marshalled
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A request field violated its documented constraints
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to parse an XML response document
    #[error("Failed to parse XML response: {0}")]
    XmlParseError(String),

    /// Failed to parse a JSON response document
    #[error("Failed to parse JSON response: {0}")]
    JsonParseError(String),

    /// The web service rejected the request
    #[error(transparent)]
    Service(ServiceError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for service: {0}")]
    Timeout(String),

    /// Service is unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Specialized result type for Cumulus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of the exchange the service blames for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorType {
    /// The request was invalid (`Sender` in query-protocol documents)
    Client,
    /// The service failed to process a valid request (`Receiver`)
    Service,
    /// The service did not say
    Unknown,
}

impl ErrorType {
    /// Classify an error from the query-protocol `<Type>` element.
    #[must_use]
    pub fn from_query_type(value: &str) -> Self {
        match value {
            "Sender" => Self::Client,
            "Receiver" => Self::Service,
            _ => Self::Unknown,
        }
    }

    /// Classify an error from its HTTP status when the body carries no type.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if status >= 500 {
            Self::Service
        } else if status >= 400 {
            Self::Client
        } else {
            Self::Unknown
        }
    }
}

/// Error document returned by a web service.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{service} error {status} {code}: {message}")]
pub struct ServiceError {
    /// Name of the service that produced the error
    pub service: String,
    /// Service error code (e.g. `ValidationError`)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Request ID assigned by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Blamed party
    pub error_type: ErrorType,
    /// HTTP status code of the response
    pub status: u16,
}

impl ServiceError {
    /// Returns true if the error code denotes throttling.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        self.status == 429 || THROTTLING_ERROR_CODES.contains(&self.code.as_str())
    }

    /// Returns true if resending the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.status >= 500 || self.is_throttling()
    }
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::XmlParseError(_) => "XML_PARSE_ERROR",
            Self::JsonParseError(_) => "JSON_PARSE_ERROR",
            Self::Service(err) => &err.code,
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the service request ID, when the service assigned one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Service(err) => err.request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns the service error, if this is one.
    #[must_use]
    pub const fn as_service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true if the request may be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::ServiceUnavailable(_) | Self::HttpError(_) => true,
            Self::Service(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::InternalError(_)
                | Self::ConfigError(_)
                | Self::XmlParseError(_)
                | Self::JsonParseError(_)
        )
    }
}

impl From<ServiceError> for Error {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError(err.to_string())
    }
}

impl From<XmlError> for Error {
    fn from(err: XmlError) -> Self {
        Self::XmlParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
