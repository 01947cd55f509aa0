//! DynamoDB client for the Cumulus SDK.
//!
//! Speaks the JSON 1.0 protocol (`DynamoDB_20120810`). Items are maps of
//! [`AttributeValue`]s, serialized in their single-key wire form.

#![deny(missing_docs)]

pub mod attribute_value;
pub mod client;
pub mod models;
mod transform;

pub use attribute_value::{AttributeValue, Item};
pub use client::{DynamoDbClient, DynamoDbClientBuilder};
pub use models::{
    BatchWriteItemInput, BatchWriteItemOutput, Capacity, ConsumedCapacity, DeleteItemInput,
    DeleteItemOutput, DeleteRequest, GetItemInput, GetItemOutput, PutItemInput, PutItemOutput,
    PutRequest, ReturnConsumedCapacity, ReturnValue, WriteRequest,
};

/// Convenient result alias that reuses the shared Cumulus error type.
pub type Result<T> = cumulus_core::Result<T>;
