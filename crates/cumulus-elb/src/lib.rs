//! Classic Elastic Load Balancing client for the Cumulus SDK.
//!
//! Covers load balancer tagging and provisioned capacity for API version
//! `2012-06-01`.

#![deny(missing_docs)]

pub mod client;
pub mod models;
mod transform;

pub use client::{ElbClient, ElbClientBuilder};
pub use models::{
    AddTagsRequest, DescribeProvisionedCapacityRequest, DescribeProvisionedCapacityResult,
    DescribeTagsRequest, DescribeTagsResult, ProvisionedCapacity, Tag, TagDescription,
};

/// Convenient result alias that reuses the shared Cumulus error type.
pub type Result<T> = cumulus_core::Result<T>;
