//! Load balancer request and result models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

/// A key/value tag on a load balancer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Tag key.
    #[validate(length(min = 1, max = 128))]
    pub key: String,
    /// Tag value.
    #[validate(length(max = 256))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    /// Create a tag with a key and no value.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Set the tag value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// The tags of one load balancer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagDescription {
    /// Name of the load balancer.
    pub load_balancer_name: Option<String>,
    /// Tags assigned to it.
    pub tags: Vec<Tag>,
}

/// Parameters of `DescribeProvisionedCapacity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Validate)]
pub struct DescribeProvisionedCapacityRequest {
    /// Load balancer to describe; omitted from the request when unset.
    #[validate(length(min = 1, max = 32))]
    pub load_balancer_name: Option<String>,
}

impl DescribeProvisionedCapacityRequest {
    /// Create a request for the named load balancer.
    #[must_use]
    pub fn new(load_balancer_name: impl Into<String>) -> Self {
        Self {
            load_balancer_name: Some(load_balancer_name.into()),
        }
    }
}

/// Capacity reserved for a load balancer, in load balancer capacity units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedCapacity {
    /// Minimum number of LCUs kept warm.
    #[serde(rename = "MinimumLCU")]
    pub minimum_lcu: Option<i32>,
    /// Provisioning status, e.g. `provisioned` or `pending`.
    pub status: Option<String>,
    /// When the reservation last changed.
    pub last_modified_time: Option<DateTime<Utc>>,
}

/// Result of `DescribeProvisionedCapacity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeProvisionedCapacityResult {
    /// Reserved capacity, if any.
    pub provisioned_capacity: Option<ProvisionedCapacity>,
}

/// Parameters of `DescribeTags`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Validate)]
pub struct DescribeTagsRequest {
    /// Load balancers whose tags are returned.
    #[validate(length(min = 1, max = 20))]
    pub load_balancer_names: Vec<String>,
}

impl DescribeTagsRequest {
    /// Create a request for the given load balancers.
    #[must_use]
    pub fn new<I, S>(load_balancer_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            load_balancer_names: load_balancer_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of `DescribeTags`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTagsResult {
    /// One entry per requested load balancer.
    pub tag_descriptions: Vec<TagDescription>,
}

/// Parameters of `AddTags`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Validate)]
pub struct AddTagsRequest {
    /// Load balancers to tag.
    #[validate(length(min = 1, max = 20))]
    pub load_balancer_names: Vec<String>,
    /// Tags to add; an existing key is overwritten.
    #[validate(length(min = 1), nested)]
    pub tags: Vec<Tag>,
}

impl AddTagsRequest {
    /// Create a request with no tags yet.
    #[must_use]
    pub fn new<I, S>(load_balancer_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            load_balancer_names: load_balancer_names.into_iter().map(Into::into).collect(),
            tags: Vec::new(),
        }
    }

    /// Append a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }
}
