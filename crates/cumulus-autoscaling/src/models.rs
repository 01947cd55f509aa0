//! Auto Scaling request and result models.

use serde::Serialize;
use validator::Validate;

/// A tag applied to an Auto Scaling group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Name of the group the tag belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Resource type; only `auto-scaling-group` is supported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Tag key.
    #[validate(length(min = 1, max = 128))]
    pub key: String,
    /// Tag value.
    #[validate(length(max = 256))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Whether instances launched by the group inherit the tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagate_at_launch: Option<bool>,
}

impl Tag {
    /// Create a tag with the given key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Set the tag value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the resource the tag belongs to.
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Set the resource type.
    #[must_use]
    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Set whether the tag propagates to launched instances.
    #[must_use]
    pub const fn with_propagate_at_launch(mut self, propagate: bool) -> Self {
        self.propagate_at_launch = Some(propagate);
        self
    }
}

/// Parameters of `CreateAutoScalingGroup`.
///
/// Optional list fields distinguish an absent list (`None`, not sent) from an
/// explicitly empty one (`Some(vec![])`, sent as an empty value).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Validate)]
pub struct CreateAutoScalingGroupRequest {
    /// Name of the group, unique per region and account.
    #[validate(length(min = 1, max = 255))]
    pub auto_scaling_group_name: String,
    /// Launch configuration used to launch instances.
    #[validate(length(min = 1, max = 1600))]
    pub launch_configuration_name: Option<String>,
    /// Instance whose attributes seed a new launch configuration.
    #[validate(length(min = 1, max = 19))]
    pub instance_id: Option<String>,
    /// Minimum group size.
    pub min_size: i32,
    /// Maximum group size.
    pub max_size: i32,
    /// Number of instances the group should run.
    pub desired_capacity: Option<i32>,
    /// Seconds after a scaling activity before another can start.
    pub default_cooldown: Option<i32>,
    /// Availability Zones for the group.
    pub availability_zones: Option<Vec<String>>,
    /// Classic load balancers to register instances with.
    pub load_balancer_names: Option<Vec<String>>,
    /// Target groups to register instances with.
    pub target_group_arns: Option<Vec<String>>,
    /// `EC2` or `ELB`.
    #[validate(length(min = 1, max = 32))]
    pub health_check_type: Option<String>,
    /// Seconds to wait before checking the health of a new instance.
    pub health_check_grace_period: Option<i32>,
    /// Placement group for the instances.
    #[validate(length(min = 1, max = 255))]
    pub placement_group: Option<String>,
    /// Comma-separated subnet IDs.
    #[validate(length(min = 1, max = 2047))]
    pub vpc_zone_identifier: Option<String>,
    /// Termination policies, applied in order.
    pub termination_policies: Option<Vec<String>>,
    /// Whether new instances are protected from scale in.
    pub new_instances_protected_from_scale_in: Option<bool>,
    /// Tags applied to the group.
    #[validate(nested)]
    pub tags: Option<Vec<Tag>>,
}

impl CreateAutoScalingGroupRequest {
    /// Create a request with the required fields.
    #[must_use]
    pub fn new(auto_scaling_group_name: impl Into<String>, min_size: i32, max_size: i32) -> Self {
        Self {
            auto_scaling_group_name: auto_scaling_group_name.into(),
            min_size,
            max_size,
            ..Self::default()
        }
    }

    /// Set the launch configuration.
    #[must_use]
    pub fn with_launch_configuration_name(mut self, name: impl Into<String>) -> Self {
        self.launch_configuration_name = Some(name.into());
        self
    }

    /// Seed the launch configuration from an instance.
    #[must_use]
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    /// Set the desired capacity.
    #[must_use]
    pub const fn with_desired_capacity(mut self, capacity: i32) -> Self {
        self.desired_capacity = Some(capacity);
        self
    }

    /// Set the default cooldown in seconds.
    #[must_use]
    pub const fn with_default_cooldown(mut self, seconds: i32) -> Self {
        self.default_cooldown = Some(seconds);
        self
    }

    /// Append Availability Zones.
    #[must_use]
    pub fn with_availability_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.availability_zones
            .get_or_insert_with(Vec::new)
            .extend(zones.into_iter().map(Into::into));
        self
    }

    /// Append classic load balancer names.
    #[must_use]
    pub fn with_load_balancer_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.load_balancer_names
            .get_or_insert_with(Vec::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Append target group ARNs.
    #[must_use]
    pub fn with_target_group_arns<I, S>(mut self, arns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_group_arns
            .get_or_insert_with(Vec::new)
            .extend(arns.into_iter().map(Into::into));
        self
    }

    /// Set the health check type.
    #[must_use]
    pub fn with_health_check_type(mut self, check_type: impl Into<String>) -> Self {
        self.health_check_type = Some(check_type.into());
        self
    }

    /// Set the health check grace period in seconds.
    #[must_use]
    pub const fn with_health_check_grace_period(mut self, seconds: i32) -> Self {
        self.health_check_grace_period = Some(seconds);
        self
    }

    /// Set the placement group.
    #[must_use]
    pub fn with_placement_group(mut self, group: impl Into<String>) -> Self {
        self.placement_group = Some(group.into());
        self
    }

    /// Set the subnets as a comma-separated list.
    #[must_use]
    pub fn with_vpc_zone_identifier(mut self, subnets: impl Into<String>) -> Self {
        self.vpc_zone_identifier = Some(subnets.into());
        self
    }

    /// Append termination policies.
    #[must_use]
    pub fn with_termination_policies<I, S>(mut self, policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.termination_policies
            .get_or_insert_with(Vec::new)
            .extend(policies.into_iter().map(Into::into));
        self
    }

    /// Set scale-in protection for new instances.
    #[must_use]
    pub const fn with_new_instances_protected_from_scale_in(mut self, protected: bool) -> Self {
        self.new_instances_protected_from_scale_in = Some(protected);
        self
    }

    /// Append tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.get_or_insert_with(Vec::new).extend(tags);
        self
    }
}

/// Parameters of `AttachLoadBalancerTargetGroups`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Validate)]
pub struct AttachLoadBalancerTargetGroupsRequest {
    /// Name of the group.
    #[validate(length(min = 1, max = 255))]
    pub auto_scaling_group_name: String,
    /// Target groups to attach.
    #[validate(length(max = 10))]
    pub target_group_arns: Vec<String>,
}

impl AttachLoadBalancerTargetGroupsRequest {
    /// Create a request attaching `target_group_arns` to the named group.
    #[must_use]
    pub fn new<I, S>(auto_scaling_group_name: impl Into<String>, target_group_arns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            auto_scaling_group_name: auto_scaling_group_name.into(),
            target_group_arns: target_group_arns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of `AttachLoadBalancerTargetGroups`; the service returns no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AttachLoadBalancerTargetGroupsResult;

/// Parameters of `DetachLoadBalancerTargetGroups`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Validate)]
pub struct DetachLoadBalancerTargetGroupsRequest {
    /// Name of the group.
    #[validate(length(min = 1, max = 255))]
    pub auto_scaling_group_name: String,
    /// Target groups to detach.
    #[validate(length(max = 10))]
    pub target_group_arns: Vec<String>,
}

impl DetachLoadBalancerTargetGroupsRequest {
    /// Create a request detaching `target_group_arns` from the named group.
    #[must_use]
    pub fn new<I, S>(auto_scaling_group_name: impl Into<String>, target_group_arns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            auto_scaling_group_name: auto_scaling_group_name.into(),
            target_group_arns: target_group_arns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of `DetachLoadBalancerTargetGroups`; the service returns no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DetachLoadBalancerTargetGroupsResult;

/// Parameters of `DescribeLoadBalancerTargetGroups`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Validate)]
pub struct DescribeLoadBalancerTargetGroupsRequest {
    /// Name of the group.
    #[validate(length(min = 1, max = 255))]
    pub auto_scaling_group_name: String,
    /// Token from a previous page.
    pub next_token: Option<String>,
    /// Maximum number of items to return.
    #[validate(range(min = 1, max = 100))]
    pub max_records: Option<i32>,
}

impl DescribeLoadBalancerTargetGroupsRequest {
    /// Create a request for the named group.
    #[must_use]
    pub fn new(auto_scaling_group_name: impl Into<String>) -> Self {
        Self {
            auto_scaling_group_name: auto_scaling_group_name.into(),
            ..Self::default()
        }
    }

    /// Continue from a previous page.
    #[must_use]
    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }

    /// Limit the page size.
    #[must_use]
    pub const fn with_max_records(mut self, max_records: i32) -> Self {
        self.max_records = Some(max_records);
        self
    }
}

/// State of a target group attached to an Auto Scaling group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerTargetGroupState {
    /// ARN of the target group.
    #[serde(rename = "LoadBalancerTargetGroupARN")]
    pub load_balancer_target_group_arn: Option<String>,
    /// `Adding`, `Added`, `InService`, `Removing` or `Removed`.
    pub state: Option<String>,
}

/// Result of `DescribeLoadBalancerTargetGroups`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeLoadBalancerTargetGroupsResult {
    /// Attached target groups.
    pub load_balancer_target_groups: Vec<LoadBalancerTargetGroupState>,
    /// Token for the next page, if there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
