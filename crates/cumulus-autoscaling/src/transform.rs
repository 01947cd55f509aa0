//! Query marshallers and XML unmarshallers for Auto Scaling operations.

use crate::models::{
    AttachLoadBalancerTargetGroupsRequest, AttachLoadBalancerTargetGroupsResult,
    CreateAutoScalingGroupRequest, DescribeLoadBalancerTargetGroupsRequest,
    DescribeLoadBalancerTargetGroupsResult, DetachLoadBalancerTargetGroupsRequest,
    DetachLoadBalancerTargetGroupsResult, LoadBalancerTargetGroupState, Tag,
};
use cumulus_core::query::{QueryParams, QueryRequest, QuerySerialize};
use cumulus_core::xml::{XmlError, XmlReader, XmlUnmarshaller};
use cumulus_core::AwsService;

impl QuerySerialize for Tag {
    fn write_query(&self, prefix: &str, params: &mut QueryParams) {
        params.push_opt(format!("{prefix}.ResourceId"), self.resource_id.as_ref());
        params.push_opt(format!("{prefix}.ResourceType"), self.resource_type.as_ref());
        params.push(format!("{prefix}.Key"), &self.key);
        params.push_opt(format!("{prefix}.Value"), self.value.as_ref());
        params.push_opt(
            format!("{prefix}.PropagateAtLaunch"),
            self.propagate_at_launch,
        );
    }
}

impl QueryRequest for CreateAutoScalingGroupRequest {
    const SERVICE: AwsService = AwsService::AutoScaling;
    const ACTION: &'static str = "CreateAutoScalingGroup";
    type Output = ();

    fn write_params(&self, params: &mut QueryParams) {
        params.push("AutoScalingGroupName", &self.auto_scaling_group_name);
        params.push_opt(
            "LaunchConfigurationName",
            self.launch_configuration_name.as_ref(),
        );
        params.push_opt("InstanceId", self.instance_id.as_ref());
        params.push("MinSize", self.min_size);
        params.push("MaxSize", self.max_size);
        params.push_opt("DesiredCapacity", self.desired_capacity);
        params.push_opt("DefaultCooldown", self.default_cooldown);
        params.push_list("AvailabilityZones", self.availability_zones.as_deref());
        params.push_list("LoadBalancerNames", self.load_balancer_names.as_deref());
        params.push_list("TargetGroupARNs", self.target_group_arns.as_deref());
        params.push_opt("HealthCheckType", self.health_check_type.as_ref());
        params.push_opt("HealthCheckGracePeriod", self.health_check_grace_period);
        params.push_opt("PlacementGroup", self.placement_group.as_ref());
        params.push_opt("VPCZoneIdentifier", self.vpc_zone_identifier.as_ref());
        params.push_list("TerminationPolicies", self.termination_policies.as_deref());
        params.push_opt(
            "NewInstancesProtectedFromScaleIn",
            self.new_instances_protected_from_scale_in,
        );
        params.push_struct_list("Tags", self.tags.as_deref());
    }
}

impl QueryRequest for AttachLoadBalancerTargetGroupsRequest {
    const SERVICE: AwsService = AwsService::AutoScaling;
    const ACTION: &'static str = "AttachLoadBalancerTargetGroups";
    type Output = AttachLoadBalancerTargetGroupsResult;

    fn write_params(&self, params: &mut QueryParams) {
        params.push("AutoScalingGroupName", &self.auto_scaling_group_name);
        params.push_list("TargetGroupARNs", Some(self.target_group_arns.as_slice()));
    }
}

impl QueryRequest for DetachLoadBalancerTargetGroupsRequest {
    const SERVICE: AwsService = AwsService::AutoScaling;
    const ACTION: &'static str = "DetachLoadBalancerTargetGroups";
    type Output = DetachLoadBalancerTargetGroupsResult;

    fn write_params(&self, params: &mut QueryParams) {
        params.push("AutoScalingGroupName", &self.auto_scaling_group_name);
        params.push_list("TargetGroupARNs", Some(self.target_group_arns.as_slice()));
    }
}

impl QueryRequest for DescribeLoadBalancerTargetGroupsRequest {
    const SERVICE: AwsService = AwsService::AutoScaling;
    const ACTION: &'static str = "DescribeLoadBalancerTargetGroups";
    type Output = DescribeLoadBalancerTargetGroupsResult;

    fn write_params(&self, params: &mut QueryParams) {
        params.push("AutoScalingGroupName", &self.auto_scaling_group_name);
        params.push_opt("NextToken", self.next_token.as_ref());
        params.push_opt("MaxRecords", self.max_records);
    }
}

impl XmlUnmarshaller for AttachLoadBalancerTargetGroupsResult {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        reader.skip()?;
        Ok(Self)
    }
}

impl XmlUnmarshaller for DetachLoadBalancerTargetGroupsResult {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        reader.skip()?;
        Ok(Self)
    }
}

impl XmlUnmarshaller for LoadBalancerTargetGroupState {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut state = Self::default();
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "LoadBalancerTargetGroupARN" => {
                    state.load_balancer_target_group_arn = Some(reader.read_text()?);
                }
                "State" => state.state = Some(reader.read_text()?),
                _ => reader.skip()?,
            }
        }
        Ok(state)
    }
}

impl XmlUnmarshaller for DescribeLoadBalancerTargetGroupsResult {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut result = Self::default();
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "LoadBalancerTargetGroups" => {
                    result.load_balancer_target_groups = reader.read_struct_list()?;
                }
                "NextToken" => result.next_token = Some(reader.read_text()?),
                _ => reader.skip()?,
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus_core::query::marshall;
    use cumulus_core::xml::unmarshall_response;
    use cumulus_core::Error;

    fn pairs(request: &impl QueryRequest) -> Vec<(String, String)> {
        marshall(request).unwrap().parameters().to_vec()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_create_group_writes_fields_in_order() {
        let request = CreateAutoScalingGroupRequest::new("web", 1, 4)
            .with_launch_configuration_name("web-lc")
            .with_desired_capacity(2)
            .with_availability_zones(["us-east-1a", "us-east-1b"])
            .with_termination_policies(Vec::<String>::new())
            .with_new_instances_protected_from_scale_in(false)
            .with_tags([Tag::new("env")
                .with_value("prod")
                .with_propagate_at_launch(true)]);

        assert_eq!(
            pairs(&request),
            vec![
                pair("Action", "CreateAutoScalingGroup"),
                pair("Version", "2011-01-01"),
                pair("AutoScalingGroupName", "web"),
                pair("LaunchConfigurationName", "web-lc"),
                pair("MinSize", "1"),
                pair("MaxSize", "4"),
                pair("DesiredCapacity", "2"),
                pair("AvailabilityZones.member.1", "us-east-1a"),
                pair("AvailabilityZones.member.2", "us-east-1b"),
                pair("TerminationPolicies", ""),
                pair("NewInstancesProtectedFromScaleIn", "false"),
                pair("Tags.member.1.Key", "env"),
                pair("Tags.member.1.Value", "prod"),
                pair("Tags.member.1.PropagateAtLaunch", "true"),
            ]
        );
    }

    #[test]
    fn test_create_group_validates_name_and_tags() {
        let request = CreateAutoScalingGroupRequest::new("", 1, 1);
        assert!(matches!(marshall(&request), Err(Error::ValidationError(_))));

        let request = CreateAutoScalingGroupRequest::new("web", 1, 1).with_tags([Tag::new("")]);
        assert!(matches!(marshall(&request), Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_attach_writes_target_group_members() {
        let request = AttachLoadBalancerTargetGroupsRequest::new(
            "web",
            ["arn:aws:elasticloadbalancing:us-east-1:123456789012:targetgroup/a/1"],
        );
        assert_eq!(
            pairs(&request),
            vec![
                pair("Action", "AttachLoadBalancerTargetGroups"),
                pair("Version", "2011-01-01"),
                pair("AutoScalingGroupName", "web"),
                pair(
                    "TargetGroupARNs.member.1",
                    "arn:aws:elasticloadbalancing:us-east-1:123456789012:targetgroup/a/1"
                ),
            ]
        );
    }

    #[test]
    fn test_detach_with_no_target_groups_sends_empty_list() {
        let request = DetachLoadBalancerTargetGroupsRequest::new("web", Vec::<String>::new());
        let pairs = pairs(&request);
        assert_eq!(&pairs[3..], &[pair("TargetGroupARNs", "")]);
    }

    #[test]
    fn test_describe_skips_absent_fields() {
        let request = DescribeLoadBalancerTargetGroupsRequest::new("web").with_max_records(10);
        assert_eq!(
            pairs(&request),
            vec![
                pair("Action", "DescribeLoadBalancerTargetGroups"),
                pair("Version", "2011-01-01"),
                pair("AutoScalingGroupName", "web"),
                pair("MaxRecords", "10"),
            ]
        );

        let request = DescribeLoadBalancerTargetGroupsRequest::new("web").with_max_records(500);
        assert!(marshall(&request).is_err());
    }

    #[test]
    fn test_attach_result_ignores_content() {
        let xml = br#"<AttachLoadBalancerTargetGroupsResponse><AttachLoadBalancerTargetGroupsResult><Surprise>1</Surprise></AttachLoadBalancerTargetGroupsResult><ResponseMetadata><RequestId>r</RequestId></ResponseMetadata></AttachLoadBalancerTargetGroupsResponse>"#;
        let response = unmarshall_response::<AttachLoadBalancerTargetGroupsResult>(
            xml,
            "AttachLoadBalancerTargetGroups",
        )
        .unwrap();
        assert_eq!(response.request_id(), Some("r"));
    }

    #[test]
    fn test_describe_result_reads_states() {
        let xml = br#"<DescribeLoadBalancerTargetGroupsResponse>
  <DescribeLoadBalancerTargetGroupsResult>
    <LoadBalancerTargetGroups>
      <member>
        <LoadBalancerTargetGroupARN>arn:tg/a</LoadBalancerTargetGroupARN>
        <State>Added</State>
      </member>
      <member>
        <State>Removing</State>
      </member>
    </LoadBalancerTargetGroups>
  </DescribeLoadBalancerTargetGroupsResult>
</DescribeLoadBalancerTargetGroupsResponse>"#;

        let result = unmarshall_response::<DescribeLoadBalancerTargetGroupsResult>(
            xml,
            "DescribeLoadBalancerTargetGroups",
        )
        .unwrap()
        .into_output();

        assert_eq!(result.load_balancer_target_groups.len(), 2);
        assert_eq!(
            result.load_balancer_target_groups[0],
            LoadBalancerTargetGroupState {
                load_balancer_target_group_arn: Some("arn:tg/a".to_string()),
                state: Some("Added".to_string()),
            }
        );
        assert_eq!(result.load_balancer_target_groups[1].load_balancer_target_group_arn, None);
        assert_eq!(result.next_token, None);
    }
}
