use crate::models::{
    AddTagsRequest, DescribeProvisionedCapacityRequest, DescribeProvisionedCapacityResult,
    DescribeTagsRequest, DescribeTagsResult, ProvisionedCapacity, Tag, TagDescription,
};
use cumulus_core::query::{QueryParams, QueryRequest, QuerySerialize};
use cumulus_core::xml::{XmlError, XmlReader, XmlUnmarshaller};
use cumulus_core::AwsService;

impl QuerySerialize for Tag {
    fn write_query(&self, prefix: &str, params: &mut QueryParams) {
        params.push(format!("{prefix}.Key"), &self.key);
        params.push_opt(format!("{prefix}.Value"), self.value.as_ref());
    }
}

impl QueryRequest for DescribeProvisionedCapacityRequest {
    const SERVICE: AwsService = AwsService::ElasticLoadBalancing;
    const ACTION: &'static str = "DescribeProvisionedCapacity";
    type Output = DescribeProvisionedCapacityResult;

    fn write_params(&self, params: &mut QueryParams) {
        params.push_opt("LoadBalancerName", self.load_balancer_name.as_ref());
    }
}

impl QueryRequest for DescribeTagsRequest {
    const SERVICE: AwsService = AwsService::ElasticLoadBalancing;
    const ACTION: &'static str = "DescribeTags";
    type Output = DescribeTagsResult;

    fn write_params(&self, params: &mut QueryParams) {
        params.push_list("LoadBalancerNames", Some(self.load_balancer_names.as_slice()));
    }
}

impl QueryRequest for AddTagsRequest {
    const SERVICE: AwsService = AwsService::ElasticLoadBalancing;
    const ACTION: &'static str = "AddTags";
    type Output = ();

    fn write_params(&self, params: &mut QueryParams) {
        params.push_list("LoadBalancerNames", Some(self.load_balancer_names.as_slice()));
        params.push_struct_list("Tags", Some(self.tags.as_slice()));
    }
}

impl XmlUnmarshaller for Tag {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut tag = Self::default();
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "Key" => tag.key = reader.read_text()?,
                "Value" => tag.value = Some(reader.read_text()?),
                _ => reader.skip()?,
            }
        }
        Ok(tag)
    }
}

impl XmlUnmarshaller for TagDescription {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut description = Self::default();
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "LoadBalancerName" => description.load_balancer_name = Some(reader.read_text()?),
                "Tags" => description.tags = reader.read_struct_list()?,
                _ => reader.skip()?,
            }
        }
        Ok(description)
    }
}

impl XmlUnmarshaller for DescribeTagsResult {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut result = Self::default();
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "TagDescriptions" => result.tag_descriptions = reader.read_struct_list()?,
                _ => reader.skip()?,
            }
        }
        Ok(result)
    }
}

impl XmlUnmarshaller for ProvisionedCapacity {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut capacity = Self::default();
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "MinimumLCU" => capacity.minimum_lcu = Some(reader.read_i32()?),
                "Status" => capacity.status = Some(reader.read_text()?),
                "LastModifiedTime" => capacity.last_modified_time = Some(reader.read_timestamp()?),
                _ => reader.skip()?,
            }
        }
        Ok(capacity)
    }
}

impl XmlUnmarshaller for DescribeProvisionedCapacityResult {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut result = Self::default();
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "ProvisionedCapacity" => {
                    result.provisioned_capacity = Some(ProvisionedCapacity::unmarshall(reader)?);
                }
                _ => reader.skip()?,
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use cumulus_core::query::marshall;
    use cumulus_core::xml::unmarshall_response;
    use cumulus_core::Error;

    #[test]
    fn test_provisioned_capacity_omits_unset_name() {
        let request = marshall(&DescribeProvisionedCapacityRequest::default()).unwrap();
        assert_eq!(request.parameters().len(), 2);
        assert_eq!(request.parameter("Action"), Some("DescribeProvisionedCapacity"));
        assert_eq!(request.parameter("Version"), Some("2012-06-01"));

        let request = marshall(&DescribeProvisionedCapacityRequest::new("front")).unwrap();
        assert_eq!(request.parameter("LoadBalancerName"), Some("front"));
    }

    #[test]
    fn test_describe_tags_requires_between_one_and_twenty_names() {
        let empty = DescribeTagsRequest::new(Vec::<String>::new());
        assert!(matches!(marshall(&empty), Err(Error::ValidationError(_))));

        let too_many = DescribeTagsRequest::new((0..21).map(|i| format!("lb-{i}")));
        assert!(matches!(marshall(&too_many), Err(Error::ValidationError(_))));

        let request = marshall(&DescribeTagsRequest::new(["a", "b"])).unwrap();
        assert_eq!(request.parameter("LoadBalancerNames.member.1"), Some("a"));
        assert_eq!(request.parameter("LoadBalancerNames.member.2"), Some("b"));
    }

    #[test]
    fn test_add_tags_writes_tag_structures() {
        let request = AddTagsRequest::new(["front"])
            .with_tag(Tag::new("env").with_value("prod"))
            .with_tag(Tag::new("owner"));
        let request = marshall(&request).unwrap();

        assert_eq!(
            request.encoded_parameters(),
            "Action=AddTags&Version=2012-06-01&LoadBalancerNames.member.1=front\
             &Tags.member.1.Key=env&Tags.member.1.Value=prod&Tags.member.2.Key=owner"
        );
    }

    #[test]
    fn test_add_tags_validates_tags() {
        let no_tags = AddTagsRequest::new(["front"]);
        assert!(marshall(&no_tags).is_err());

        let long_key = AddTagsRequest::new(["front"]).with_tag(Tag::new("k".repeat(129)));
        assert!(marshall(&long_key).is_err());
    }

    #[test]
    fn test_tag_descriptions_are_read() {
        let xml = br#"<DescribeTagsResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/">
  <DescribeTagsResult>
    <TagDescriptions>
      <member>
        <Tags>
          <member><Key>env</Key><Value>prod</Value></member>
          <member><Key>empty</Key></member>
        </Tags>
        <LoadBalancerName>front</LoadBalancerName>
      </member>
    </TagDescriptions>
  </DescribeTagsResult>
  <ResponseMetadata><RequestId>t-1</RequestId></ResponseMetadata>
</DescribeTagsResponse>"#;

        let response = unmarshall_response::<DescribeTagsResult>(xml, "DescribeTags").unwrap();
        assert_eq!(response.request_id(), Some("t-1"));

        let descriptions = &response.output().tag_descriptions;
        assert_eq!(descriptions.len(), 1);
        assert_eq!(descriptions[0].load_balancer_name.as_deref(), Some("front"));
        assert_eq!(
            descriptions[0].tags,
            vec![Tag::new("env").with_value("prod"), Tag::new("empty")]
        );
    }

    #[test]
    fn test_provisioned_capacity_is_read() {
        let xml = br"<DescribeProvisionedCapacityResponse>
  <DescribeProvisionedCapacityResult>
    <ProvisionedCapacity>
      <MinimumLCU>50</MinimumLCU>
      <Status>provisioned</Status>
      <LastModifiedTime>2024-03-01T12:30:00Z</LastModifiedTime>
    </ProvisionedCapacity>
  </DescribeProvisionedCapacityResult>
</DescribeProvisionedCapacityResponse>";

        let result = unmarshall_response::<DescribeProvisionedCapacityResult>(
            xml,
            "DescribeProvisionedCapacity",
        )
        .unwrap()
        .into_output();

        assert_eq!(
            result.provisioned_capacity,
            Some(ProvisionedCapacity {
                minimum_lcu: Some(50),
                status: Some("provisioned".to_string()),
                last_modified_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
            })
        );
    }

    #[test]
    fn test_missing_capacity_element_yields_none() {
        let xml = b"<DescribeProvisionedCapacityResponse><DescribeProvisionedCapacityResult/></DescribeProvisionedCapacityResponse>";
        let result = unmarshall_response::<DescribeProvisionedCapacityResult>(
            xml,
            "DescribeProvisionedCapacity",
        )
        .unwrap();
        assert_eq!(result.output().provisioned_capacity, None);
    }
}
