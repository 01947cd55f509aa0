//! DynamoDB operation inputs, outputs and shared shapes.

use crate::attribute_value::{AttributeValue, Item};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError};

/// Largest number of write requests in one `BatchWriteItem` call.
pub const MAX_BATCH_WRITE_REQUESTS: usize = 25;

fn validate_table_name(name: &str) -> Result<(), ValidationError> {
    let valid_length = (3..=255).contains(&name.len());
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid_length && valid_chars {
        Ok(())
    } else {
        Err(ValidationError::new("table_name"))
    }
}

/// Whether the response reports consumed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReturnConsumedCapacity {
    /// Totals plus per-index figures.
    Indexes,
    /// Totals only.
    Total,
    /// Nothing.
    #[default]
    None,
}

/// Which item attributes a write returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnValue {
    /// Nothing.
    #[default]
    None,
    /// The item as it was before the write.
    AllOld,
    /// Changed attributes, before the write.
    UpdatedOld,
    /// The item as it is after the write.
    AllNew,
    /// Changed attributes, after the write.
    UpdatedNew,
}

/// Capacity units consumed by one table or index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capacity {
    /// Total units.
    pub capacity_units: Option<f64>,
    /// Read units.
    pub read_capacity_units: Option<f64>,
    /// Write units.
    pub write_capacity_units: Option<f64>,
}

/// Capacity consumed by an operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    /// Table the operation touched.
    pub table_name: Option<String>,
    /// Total units.
    pub capacity_units: Option<f64>,
    /// Read units.
    pub read_capacity_units: Option<f64>,
    /// Write units.
    pub write_capacity_units: Option<f64>,
    /// Units spent on the base table.
    pub table: Option<Capacity>,
    /// Units spent per local secondary index.
    pub local_secondary_indexes: Option<HashMap<String, Capacity>>,
    /// Units spent per global secondary index.
    pub global_secondary_indexes: Option<HashMap<String, Capacity>>,
}

/// Put an item as part of a batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    /// The full item, including its key attributes.
    pub item: Item,
}

/// Delete an item as part of a batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    /// Primary key of the item.
    pub key: Item,
}

/// One write in a `BatchWriteItem` call.
///
/// Exactly one of the two requests must be set. Members other than
/// `PutRequest` and `DeleteRequest` are ignored when reading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteRequest {
    /// Put an item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_request: Option<PutRequest>,
    /// Delete an item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_request: Option<DeleteRequest>,
}

impl WriteRequest {
    /// A put of `item`.
    #[must_use]
    pub fn put(item: Item) -> Self {
        Self {
            put_request: Some(PutRequest { item }),
            delete_request: None,
        }
    }

    /// A delete of the item with `key`.
    #[must_use]
    pub fn delete(key: Item) -> Self {
        Self {
            put_request: None,
            delete_request: Some(DeleteRequest { key }),
        }
    }

    /// Returns true when exactly one action is set.
    #[must_use]
    pub const fn has_single_action(&self) -> bool {
        self.put_request.is_some() != self.delete_request.is_some()
    }
}

fn validate_request_items(
    request_items: &HashMap<String, Vec<WriteRequest>>,
) -> Result<(), ValidationError> {
    let total: usize = request_items.values().map(Vec::len).sum();
    if total == 0 || total > MAX_BATCH_WRITE_REQUESTS {
        let mut err = ValidationError::new("request_count");
        err.message = Some(
            format!("between 1 and {MAX_BATCH_WRITE_REQUESTS} write requests allowed, got {total}")
                .into(),
        );
        return Err(err);
    }
    for table_name in request_items.keys() {
        validate_table_name(table_name)?;
    }
    if !request_items
        .values()
        .flatten()
        .all(WriteRequest::has_single_action)
    {
        let mut err = ValidationError::new("write_request");
        err.message = Some("each write request needs exactly one of PutRequest or DeleteRequest".into());
        return Err(err);
    }
    Ok(())
}

/// Input of `BatchWriteItem`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemInput {
    /// Write requests grouped by table name.
    #[validate(custom(function = "validate_request_items"))]
    pub request_items: HashMap<String, Vec<WriteRequest>>,
    /// Whether to report consumed capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl BatchWriteItemInput {
    /// An empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a write against `table_name`.
    #[must_use]
    pub fn with_write(mut self, table_name: impl Into<String>, request: WriteRequest) -> Self {
        self.request_items
            .entry(table_name.into())
            .or_default()
            .push(request);
        self
    }

    /// Ask for consumed capacity.
    #[must_use]
    pub const fn with_return_consumed_capacity(mut self, value: ReturnConsumedCapacity) -> Self {
        self.return_consumed_capacity = Some(value);
        self
    }

    /// Number of write requests across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.request_items.values().map(Vec::len).sum()
    }

    /// Returns true if the batch holds no writes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output of `BatchWriteItem`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemOutput {
    /// Writes the service did not process, in request form for resubmission.
    #[serde(default)]
    pub unprocessed_items: HashMap<String, Vec<WriteRequest>>,
    /// Capacity consumed per table.
    #[serde(default)]
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

/// Input of `PutItem`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemInput {
    /// Target table.
    #[validate(custom(function = "validate_table_name"))]
    pub table_name: String,
    /// The item to write.
    #[validate(length(min = 1))]
    pub item: Item,
    /// Condition that must hold for the put to succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    /// Substitutions for attribute names in expressions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    /// Substitutions for values in expressions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Item>,
    /// `NONE` or `ALL_OLD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,
    /// Whether to report consumed capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl PutItemInput {
    /// Put `item` into `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>, item: Item) -> Self {
        Self {
            table_name: table_name.into(),
            item,
            ..Self::default()
        }
    }

    /// Only write if `expression` holds.
    #[must_use]
    pub fn with_condition_expression(mut self, expression: impl Into<String>) -> Self {
        self.condition_expression = Some(expression.into());
        self
    }

    /// Bind an expression attribute name placeholder such as `#n`.
    #[must_use]
    pub fn with_expression_attribute_name(
        mut self,
        placeholder: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.into(), name.into());
        self
    }

    /// Bind an expression value placeholder such as `:v`.
    #[must_use]
    pub fn with_expression_attribute_value(
        mut self,
        placeholder: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        self.expression_attribute_values
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.into(), value);
        self
    }

    /// Choose what the output carries.
    #[must_use]
    pub const fn with_return_values(mut self, value: ReturnValue) -> Self {
        self.return_values = Some(value);
        self
    }

    /// Ask for consumed capacity.
    #[must_use]
    pub const fn with_return_consumed_capacity(mut self, value: ReturnConsumedCapacity) -> Self {
        self.return_consumed_capacity = Some(value);
        self
    }
}

/// Output of `PutItem`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemOutput {
    /// The replaced item, when `ALL_OLD` was requested.
    pub attributes: Option<Item>,
    /// Capacity consumed by the put.
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Input of `GetItem`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemInput {
    /// Table to read.
    #[validate(custom(function = "validate_table_name"))]
    pub table_name: String,
    /// Primary key of the item.
    #[validate(length(min = 1, max = 2))]
    pub key: Item,
    /// Use a strongly consistent read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    /// Attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    /// Substitutions for attribute names in the projection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    /// Whether to report consumed capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl GetItemInput {
    /// Read the item with `key` from `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>, key: Item) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            ..Self::default()
        }
    }

    /// Request a strongly consistent read.
    #[must_use]
    pub const fn with_consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = Some(consistent);
        self
    }

    /// Return only the attributes named by `expression`.
    #[must_use]
    pub fn with_projection_expression(mut self, expression: impl Into<String>) -> Self {
        self.projection_expression = Some(expression.into());
        self
    }

    /// Bind an expression attribute name placeholder such as `#n`.
    #[must_use]
    pub fn with_expression_attribute_name(
        mut self,
        placeholder: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.into(), name.into());
        self
    }

    /// Ask for consumed capacity.
    #[must_use]
    pub const fn with_return_consumed_capacity(mut self, value: ReturnConsumedCapacity) -> Self {
        self.return_consumed_capacity = Some(value);
        self
    }
}

/// Output of `GetItem`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// The item, or `None` if no item has the key.
    pub item: Option<Item>,
    /// Capacity consumed by the read.
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Input of `DeleteItem`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemInput {
    /// Target table.
    #[validate(custom(function = "validate_table_name"))]
    pub table_name: String,
    /// Primary key of the item.
    #[validate(length(min = 1, max = 2))]
    pub key: Item,
    /// Condition that must hold for the delete to succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    /// Substitutions for attribute names in expressions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    /// Substitutions for values in expressions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Item>,
    /// `NONE` or `ALL_OLD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,
    /// Whether to report consumed capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl DeleteItemInput {
    /// Delete the item with `key` from `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>, key: Item) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            ..Self::default()
        }
    }

    /// Only delete if `expression` holds.
    #[must_use]
    pub fn with_condition_expression(mut self, expression: impl Into<String>) -> Self {
        self.condition_expression = Some(expression.into());
        self
    }

    /// Bind an expression value placeholder such as `:v`.
    #[must_use]
    pub fn with_expression_attribute_value(
        mut self,
        placeholder: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        self.expression_attribute_values
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.into(), value);
        self
    }

    /// Choose what the output carries.
    #[must_use]
    pub const fn with_return_values(mut self, value: ReturnValue) -> Self {
        self.return_values = Some(value);
        self
    }
}

/// Output of `DeleteItem`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemOutput {
    /// The deleted item, when `ALL_OLD` was requested.
    pub attributes: Option<Item>,
    /// Capacity consumed by the delete.
    pub consumed_capacity: Option<ConsumedCapacity>,
}
