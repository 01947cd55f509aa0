//! JSON 1.0 protocol marshalling.
//!
//! Requests are `POST /` with a JSON body; the operation is selected by the
//! `X-Amz-Target: {prefix}.{Operation}` header. Errors come back as
//! `{"__type": "namespace#Code", "message": "..."}`.

use crate::error::{Error, ErrorType, Result, ServiceError};
use crate::request::SdkRequest;
use crate::response::{AwsResponse, ResponseMetadata};
use crate::types::AwsService;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

/// Header naming the JSON operation.
pub const TARGET_HEADER: &str = "X-Amz-Target";

/// Header carrying the request ID on JSON responses.
pub const REQUEST_ID_HEADER: &str = "x-amzn-RequestId";

/// Marshaller contract for a JSON 1.0 operation.
pub trait JsonRequest: Serialize + Validate {
    /// Service that implements the operation.
    const SERVICE: AwsService;
    /// Operation name appended to the target prefix.
    const OPERATION: &'static str;
    /// Result type of the operation.
    type Output: DeserializeOwned + Default;
}

/// Marshall a JSON request into an [`SdkRequest`].
///
/// # Errors
///
/// Returns [`Error::ValidationError`] if a field violates its constraints, or
/// [`Error::InvalidArgument`] if the service is not a JSON service or the body
/// cannot be serialized.
pub fn marshall<R>(request: &R) -> Result<SdkRequest>
where
    R: JsonRequest,
{
    request.validate()?;

    let service = R::SERVICE;
    let prefix = service.json_target_prefix().ok_or_else(|| {
        Error::InvalidArgument(format!("{service} does not speak the JSON protocol"))
    })?;

    let body = serde_json::to_vec(request).map_err(|err| {
        Error::InvalidArgument(format!("Unable to marshall {}: {err}", R::OPERATION))
    })?;

    let mut sdk_request = SdkRequest::new(service);
    sdk_request.add_header(TARGET_HEADER, format!("{prefix}.{}", R::OPERATION));
    sdk_request.add_header("Content-Type", service.protocol().content_type());
    sdk_request.set_content(body);
    Ok(sdk_request)
}

/// Deserialize a JSON response body.
///
/// An empty body is read as `{}`. Unknown members are ignored.
///
/// # Errors
///
/// Returns [`Error::JsonParseError`] if the body does not match `T`.
pub fn unmarshall_response<T>(body: &[u8], request_id: Option<String>) -> Result<AwsResponse<T>>
where
    T: DeserializeOwned,
{
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    let output = serde_json::from_slice(body)?;
    Ok(AwsResponse::new(output, ResponseMetadata { request_id }))
}

/// Header some JSON services use to carry the error code.
pub const ERROR_TYPE_HEADER: &str = "x-amzn-ErrorType";

/// Reduce a raw `__type` or header value to the bare error code.
///
/// `aws.protocoltests#FooError:http://internal/...` becomes `FooError`.
fn sanitize_error_code(raw: &str) -> &str {
    let raw = raw.split(':').next().unwrap_or_default();
    raw.rsplit('#').next().unwrap_or_default().trim()
}

fn string_member<'a>(body: &'a Value, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| body.get(*name).and_then(Value::as_str))
}

/// Parse a JSON error body into a [`ServiceError`].
///
/// The code comes from `__type` (or `code`), falling back to the
/// `x-amzn-ErrorType` header and finally to the HTTP status.
#[must_use]
pub fn parse_error_response(
    service: AwsService,
    status: u16,
    body: &[u8],
    error_type_header: Option<&str>,
    request_id: Option<String>,
) -> ServiceError {
    let parsed = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);

    let code = string_member(&parsed, &["__type", "code", "Code"])
        .map(sanitize_error_code)
        .filter(|code| !code.is_empty())
        .or_else(|| {
            error_type_header
                .map(sanitize_error_code)
                .filter(|code| !code.is_empty())
        })
        .map_or_else(|| format!("Http{status}"), str::to_string);

    let message = string_member(&parsed, &["message", "Message", "errorMessage"])
        .map_or_else(|| String::from_utf8_lossy(body).trim().to_string(), str::to_string);

    ServiceError {
        service: service.name().to_string(),
        code,
        message,
        request_id,
        error_type: ErrorType::from_status(status),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Validate)]
    #[serde(rename_all = "PascalCase")]
    struct DescribeThingInput {
        #[validate(length(min = 3, max = 255))]
        table_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<i32>,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct DescribeThingOutput {
        #[serde(default)]
        count: Option<i64>,
    }

    impl JsonRequest for DescribeThingInput {
        const SERVICE: AwsService = AwsService::DynamoDb;
        const OPERATION: &'static str = "DescribeThing";
        type Output = DescribeThingOutput;
    }

    #[test]
    fn test_marshall_sets_target_and_body() {
        let request = DescribeThingInput {
            table_name: "Music".to_string(),
            limit: None,
        };
        let sdk_request = marshall(&request).unwrap();
        assert_eq!(
            sdk_request.header("x-amz-target"),
            Some("DynamoDB_20120810.DescribeThing")
        );
        assert_eq!(
            sdk_request.header("content-type"),
            Some("application/x-amz-json-1.0")
        );
        let body: Value = serde_json::from_slice(sdk_request.content().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"TableName": "Music"}));
    }

    #[test]
    fn test_marshall_validates() {
        let request = DescribeThingInput {
            table_name: "ab".to_string(),
            limit: Some(1),
        };
        assert!(matches!(
            marshall(&request),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_body_reads_as_empty_object() {
        let response =
            unmarshall_response::<DescribeThingOutput>(b"  ", Some("rid".to_string())).unwrap();
        assert_eq!(response.output(), &DescribeThingOutput::default());
        assert_eq!(response.request_id(), Some("rid"));
    }

    #[test]
    fn test_unknown_members_are_ignored() {
        let response =
            unmarshall_response::<DescribeThingOutput>(br#"{"Count": 4, "Extra": [1]}"#, None)
                .unwrap();
        assert_eq!(response.output().count, Some(4));
    }

    #[test]
    fn test_malformed_body_is_a_parse_error() {
        let err = unmarshall_response::<DescribeThingOutput>(b"{\"Count\":", None).unwrap_err();
        assert!(matches!(err, Error::JsonParseError(_)));
    }

    #[test]
    fn test_parses_namespaced_error_type() {
        let body = br#"{"__type":"com.amazonaws.dynamodb.v20120810#ResourceNotFoundException","message":"Requested resource not found"}"#;
        let err = parse_error_response(AwsService::DynamoDb, 400, body, None, Some("r-1".into()));
        assert_eq!(err.code, "ResourceNotFoundException");
        assert_eq!(err.message, "Requested resource not found");
        assert_eq!(err.error_type, ErrorType::Client);
        assert_eq!(err.request_id.as_deref(), Some("r-1"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_accepts_capitalised_message() {
        let body = br#"{"__type":"ProvisionedThroughputExceededException","Message":"Rate exceeded"}"#;
        let err = parse_error_response(AwsService::DynamoDb, 400, body, None, None);
        assert_eq!(err.code, "ProvisionedThroughputExceededException");
        assert_eq!(err.message, "Rate exceeded");
        assert!(err.is_throttling());
    }

    #[test]
    fn test_non_json_error_falls_back_to_status() {
        let err = parse_error_response(AwsService::DynamoDb, 500, b"<html>oops</html>", None, None);
        assert_eq!(err.code, "Http500");
        assert_eq!(err.error_type, ErrorType::Service);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_both_message_spellings_keep_the_code() {
        let body = br#"{"__type":"com.amazonaws#ThrottlingException","message":"a","Message":"b"}"#;
        let err = parse_error_response(AwsService::DynamoDb, 400, body, None, None);
        assert_eq!(err.code, "ThrottlingException");
        assert_eq!(err.message, "a");
        assert!(err.is_throttling());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_strips_uri_suffix_from_error_type() {
        let body = br#"{"__type":"ThrottlingException:http://internal.amazon.com/coral/com.amazon.coral.availability/","message":"slow down"}"#;
        let err = parse_error_response(AwsService::DynamoDb, 400, body, None, None);
        assert_eq!(err.code, "ThrottlingException");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_falls_back_to_error_type_header() {
        let err = parse_error_response(
            AwsService::DynamoDb,
            400,
            br#"{"message":"Rate exceeded"}"#,
            Some("ThrottlingException:http://internal.amazon.com/"),
            None,
        );
        assert_eq!(err.code, "ThrottlingException");
        assert_eq!(err.message, "Rate exceeded");
        assert!(err.is_throttling());
    }

    #[test]
    fn test_body_code_wins_over_header() {
        let body = br#"{"__type":"com.amazonaws#ValidationException"}"#;
        let err = parse_error_response(
            AwsService::DynamoDb,
            400,
            body,
            Some("ThrottlingException"),
            None,
        );
        assert_eq!(err.code, "ValidationException");
    }

    #[test]
    fn test_sanitizes_error_codes() {
        assert_eq!(sanitize_error_code("aws.protocoltests#FooError"), "FooError");
        assert_eq!(sanitize_error_code("FooError:http://internal/"), "FooError");
        assert_eq!(
            sanitize_error_code("aws.protocoltests.restjson#FooError:http://internal/"),
            "FooError"
        );
        assert_eq!(sanitize_error_code("FooError"), "FooError");
    }
}
