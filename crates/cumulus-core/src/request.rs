//! Marshalled, transport-ready requests.

use crate::types::AwsService;
use bytes::Bytes;
use reqwest::Method;
use url::form_urlencoded;

/// A request produced by a marshaller, ready to be sent to a service endpoint.
///
/// Parameters and headers keep their insertion order. Setting a parameter that
/// is already present replaces its value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SdkRequest {
    service: AwsService,
    method: Method,
    resource_path: String,
    parameters: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    content: Option<Bytes>,
}

impl SdkRequest {
    /// Create an empty `POST /` request for `service`.
    #[must_use]
    pub fn new(service: AwsService) -> Self {
        Self {
            service,
            method: Method::POST,
            resource_path: "/".to_string(),
            parameters: Vec::new(),
            headers: Vec::new(),
            content: None,
        }
    }

    /// Target service.
    #[must_use]
    pub const fn service(&self) -> AwsService {
        self.service
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Set the HTTP method.
    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// Path relative to the service endpoint.
    #[must_use]
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Set the path relative to the service endpoint.
    pub fn set_resource_path(&mut self, path: impl Into<String>) {
        self.resource_path = path.into();
    }

    /// Add or replace a parameter.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.parameters.iter_mut().find(|(key, _)| *key == name) {
            Some(existing) => existing.1 = value,
            None => self.parameters.push((name, value)),
        }
    }

    /// All parameters in insertion order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Look up a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Add or replace a header. Header names compare case-insensitively.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// All headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Look up a header by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set the body content.
    pub fn set_content(&mut self, content: impl Into<Bytes>) {
        self.content = Some(content.into());
    }

    /// Body content, if any.
    #[must_use]
    pub const fn content(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }

    /// Parameters encoded as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn encoded_parameters(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.parameters.iter())
            .finish()
    }

    /// Body to send on the wire: the explicit content, or the encoded
    /// parameters when no content was set.
    #[must_use]
    pub fn body(&self) -> Bytes {
        match &self.content {
            Some(content) => content.clone(),
            None => Bytes::from(self.encoded_parameters()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_defaults() {
        let request = SdkRequest::new(AwsService::AutoScaling);
        assert_eq!(request.service(), AwsService::AutoScaling);
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.resource_path(), "/");
        assert!(request.parameters().is_empty());
        assert!(request.content().is_none());
    }

    #[test]
    fn test_parameters_keep_order_and_replace_in_place() {
        let mut request = SdkRequest::new(AwsService::SecurityToken);
        request.add_parameter("Action", "AssumeRole");
        request.add_parameter("Version", "2011-06-15");
        request.add_parameter("Action", "GetSessionToken");

        assert_eq!(
            request.parameters(),
            &[
                ("Action".to_string(), "GetSessionToken".to_string()),
                ("Version".to_string(), "2011-06-15".to_string()),
            ]
        );
        assert_eq!(request.parameter("Version"), Some("2011-06-15"));
        assert_eq!(request.parameter("Missing"), None);
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut request = SdkRequest::new(AwsService::DynamoDb);
        request.add_header("X-Amz-Target", "DynamoDB_20120810.GetItem");
        request.add_header("x-amz-target", "DynamoDB_20120810.PutItem");
        assert_eq!(request.headers().len(), 1);
        assert_eq!(
            request.header("X-AMZ-TARGET"),
            Some("DynamoDB_20120810.PutItem")
        );
    }

    #[test]
    fn test_encoded_parameters_escape_values() {
        let mut request = SdkRequest::new(AwsService::SecurityToken);
        request.add_parameter("Action", "AssumeRole");
        request.add_parameter("Policy", "{\"a\": \"b&c\"}");
        assert_eq!(
            request.encoded_parameters(),
            "Action=AssumeRole&Policy=%7B%22a%22%3A+%22b%26c%22%7D"
        );
    }

    #[test]
    fn test_body_prefers_explicit_content() {
        let mut request = SdkRequest::new(AwsService::DynamoDb);
        request.add_parameter("Ignored", "yes");
        request.set_content("{}");
        assert_eq!(request.body(), Bytes::from_static(b"{}"));

        let mut request = SdkRequest::new(AwsService::AutoScaling);
        request.add_parameter("Action", "DescribeLoadBalancerTargetGroups");
        assert_eq!(
            request.body(),
            Bytes::from_static(b"Action=DescribeLoadBalancerTargetGroups")
        );
    }
}
