//! Auto Scaling client for the Cumulus SDK.
//!
//! This crate provides typed request and result models, their query-protocol
//! marshallers and XML unmarshallers, and an asynchronous client for the Auto
//! Scaling API (version `2011-01-01`).

#![deny(missing_docs)]

pub mod client;
pub mod models;
mod transform;

pub use client::{AutoScalingClient, AutoScalingClientBuilder};
pub use models::{
    AttachLoadBalancerTargetGroupsRequest, AttachLoadBalancerTargetGroupsResult,
    CreateAutoScalingGroupRequest, DescribeLoadBalancerTargetGroupsRequest,
    DescribeLoadBalancerTargetGroupsResult, DetachLoadBalancerTargetGroupsRequest,
    DetachLoadBalancerTargetGroupsResult, LoadBalancerTargetGroupState, Tag,
};

/// Convenient result alias that reuses the shared Cumulus error type.
pub type Result<T> = cumulus_core::Result<T>;
