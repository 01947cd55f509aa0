//! # cumulus-core
//!
//! Core types and utilities shared by the Cumulus service clients.
//!
//! This crate provides the error type, client configuration, service
//! catalogue, the query/XML and JSON wire codecs, and the HTTP transport with
//! retries that every service crate builds on.
//!
//! ## Modules
//!
//! - [`error`] - Error types, service error documents and retry classification
//! - [`types`] - Service catalogue, protocols and regions
//! - [`config`] - Client configuration and endpoint resolution
//! - [`request`] - Marshalled requests
//! - [`query`] - Query-protocol marshalling
//! - [`xml`] - Pull-parsing XML unmarshalling
//! - [`json`] - JSON 1.0 protocol marshalling
//! - [`response`] - Unmarshalled responses and metadata
//! - [`transport`] - HTTP transport seam
//! - [`client`] - Service client, retry policy and HTTP tuning

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod json;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;
pub mod xml;

// Re-export commonly used types
pub use client::{ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder};
pub use config::ClientConfiguration;
pub use error::{Error, ErrorType, Result, ServiceError};
pub use response::{AwsResponse, ResponseMetadata};
pub use types::{AwsService, Region};
