//! Target group operations against a mock Auto Scaling endpoint.

use cumulus_autoscaling::{
    AttachLoadBalancerTargetGroupsRequest, AutoScalingClient, CreateAutoScalingGroupRequest,
    DescribeLoadBalancerTargetGroupsRequest, DetachLoadBalancerTargetGroupsRequest, Tag,
};
use cumulus_core::client::ClientConfig;
use cumulus_core::{AwsService, ClientConfiguration, Error, ErrorType};
use wiremock::matchers::{body_string, body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DESCRIBE_TARGET_GROUPS: &str = include_str!("fixtures/describe_target_groups.xml");
const VALIDATION_ERROR: &str = include_str!("fixtures/validation_error.xml");

const WEB_TARGETS: &str =
    "arn:aws:elasticloadbalancing:us-west-2:123456789012:targetgroup/web-targets/1a2b3c4d5e6f7a8b";

fn client(server: &MockServer) -> AutoScalingClient {
    let config = ClientConfiguration::default().with_endpoint(server.uri());
    AutoScalingClient::builder(config)
        .with_http_config(ClientConfig::for_service(AwsService::AutoScaling).without_retries())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_describe_target_groups_reads_every_member() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string(
            "Action=DescribeLoadBalancerTargetGroups&Version=2011-01-01&AutoScalingGroupName=web-asg&MaxRecords=20",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESCRIBE_TARGET_GROUPS))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .describe_load_balancer_target_groups(
            &DescribeLoadBalancerTargetGroupsRequest::new("web-asg").with_max_records(20),
        )
        .await
        .unwrap();

    assert_eq!(result.load_balancer_target_groups.len(), 2);
    assert_eq!(
        result.load_balancer_target_groups[0]
            .load_balancer_target_group_arn
            .as_deref(),
        Some(WEB_TARGETS)
    );
    assert_eq!(
        result.load_balancer_target_groups[1].state.as_deref(),
        Some("Adding")
    );
    assert!(result.next_token.is_none());
}

#[tokio::test]
async fn test_attach_and_detach_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("Action=AttachLoadBalancerTargetGroups"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<AttachLoadBalancerTargetGroupsResponse><AttachLoadBalancerTargetGroupsResult/><ResponseMetadata><RequestId>a1</RequestId></ResponseMetadata></AttachLoadBalancerTargetGroupsResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("Action=DetachLoadBalancerTargetGroups"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<DetachLoadBalancerTargetGroupsResponse><DetachLoadBalancerTargetGroupsResult/></DetachLoadBalancerTargetGroupsResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client
        .attach_load_balancer_target_groups(&AttachLoadBalancerTargetGroupsRequest::new(
            "web-asg",
            [WEB_TARGETS],
        ))
        .await
        .unwrap();
    client
        .detach_load_balancer_target_groups(&DetachLoadBalancerTargetGroupsRequest::new(
            "web-asg",
            [WEB_TARGETS],
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_service_validation_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string(VALIDATION_ERROR))
        .mount(&server)
        .await;

    let err = client(&server)
        .attach_load_balancer_target_groups(&AttachLoadBalancerTargetGroupsRequest::new(
            "web-asg",
            [WEB_TARGETS],
        ))
        .await
        .unwrap_err();

    let service_error = err.as_service_error().unwrap();
    assert_eq!(service_error.code, "ValidationError");
    assert_eq!(service_error.error_type, ErrorType::Client);
    assert_eq!(
        service_error.request_id.as_deref(),
        Some("0d1f2a3b-36d1-11e6-9f1c-validation01")
    );
}

#[tokio::test]
async fn test_too_many_target_groups_never_reach_the_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let arns: Vec<String> = (0..11).map(|i| format!("{WEB_TARGETS}-{i}")).collect();
    let err = client(&server)
        .attach_load_balancer_target_groups(&AttachLoadBalancerTargetGroupsRequest::new(
            "web-asg", arns,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ValidationError(_)));
}

#[tokio::test]
async fn test_create_group_sends_tags_and_lists() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("TargetGroupARNs.member.1="))
        .and(body_string_contains("Tags.member.1.Key=team"))
        .and(body_string_contains("Tags.member.1.PropagateAtLaunch=true"))
        .and(body_string_contains("VPCZoneIdentifier=subnet-1%2Csubnet-2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<CreateAutoScalingGroupResponse><ResponseMetadata><RequestId>c2</RequestId></ResponseMetadata></CreateAutoScalingGroupResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateAutoScalingGroupRequest::new("web-asg", 1, 3)
        .with_launch_configuration_name("web-lc")
        .with_target_group_arns([WEB_TARGETS])
        .with_vpc_zone_identifier("subnet-1,subnet-2")
        .with_tags([Tag::new("team")
            .with_value("platform")
            .with_propagate_at_launch(true)]);

    client(&server).create_auto_scaling_group(&request).await.unwrap();
}
