//! Security Token Service client for the Cumulus SDK.
//!
//! Issues temporary credentials through `AssumeRole` and `GetSessionToken`
//! (API version `2011-06-15`). Secret material in returned [`Credentials`] is
//! held in [`secrecy::SecretString`] and redacted from debug output.

#![deny(missing_docs)]

pub mod client;
pub mod models;
mod transform;

pub use client::{StsClient, StsClientBuilder};
pub use models::{
    AssumeRoleRequest, AssumeRoleResult, AssumedRoleUser, Credentials, GetSessionTokenRequest,
    GetSessionTokenResult,
};

/// Convenient result alias that reuses the shared Cumulus error type.
pub type Result<T> = cumulus_core::Result<T>;
