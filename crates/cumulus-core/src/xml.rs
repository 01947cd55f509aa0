//! Pull-parsing XML unmarshalling for query-protocol responses.
//!
//! Responses are walked one level at a time: an unmarshaller is handed an
//! [`XmlReader`] positioned just after its element's start tag, asks for child
//! elements by name, reads the ones it knows and skips the rest, and returns
//! once the matching end tag has been consumed.
//!
//! A successful response looks like:
//!
//! ```xml
//! <DescribeLoadBalancerTargetGroupsResponse xmlns="http://autoscaling.amazonaws.com/doc/2011-01-01/">
//!   <DescribeLoadBalancerTargetGroupsResult>
//!     <LoadBalancerTargetGroups>
//!       <member>...</member>
//!     </LoadBalancerTargetGroups>
//!   </DescribeLoadBalancerTargetGroupsResult>
//!   <ResponseMetadata>
//!     <RequestId>7c6e177f-f082-11e1-ac58-3714bEXAMPLE</RequestId>
//!   </ResponseMetadata>
//! </DescribeLoadBalancerTargetGroupsResponse>
//! ```

use crate::error::{ErrorType, ServiceError};
use crate::response::{AwsResponse, ResponseMetadata};
use crate::types::AwsService;
use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Errors that can occur while reading an XML document.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// The document ended inside an element.
    #[error("unexpected end of document {0}")]
    UnexpectedEof(String),

    /// An error parsing a value from XML text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),

    /// The document root was not the element the operation answers with.
    #[error("expected root element <{expected}> but found <{found}>")]
    UnexpectedRoot {
        /// Root element the operation answers with
        expected: String,
        /// Root element actually present
        found: String,
    },
}

/// Depth-one walker over an XML document.
pub struct XmlReader<'a> {
    reader: Reader<&'a [u8]>,
}

impl std::fmt::Debug for XmlReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlReader")
            .field("position", &self.reader.buffer_position())
            .finish()
    }
}

impl<'a> XmlReader<'a> {
    /// Create a reader over a complete document.
    #[must_use]
    pub fn new(xml: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(xml);
        // `<Foo/>` becomes `<Foo></Foo>` so empty results need no special case.
        reader.config_mut().expand_empty_elements = true;
        Self { reader }
    }

    /// Advance past the XML declaration to the root element and return its
    /// local name. The reader is left inside the root element.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or has no root element.
    pub fn enter_root(&mut self) -> Result<String, XmlError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return local_name(e.local_name().as_ref()),
                Event::Eof => return Err(XmlError::MissingElement("root element".to_string())),
                _ => {}
            }
        }
    }

    /// Advance to the next child element of the current element.
    ///
    /// Returns the child's local name with the reader positioned inside it, or
    /// `None` once the current element's end tag has been consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or ends early.
    pub fn next_child(&mut self) -> Result<Option<String>, XmlError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return local_name(e.local_name().as_ref()).map(Some),
                Event::End(_) => return Ok(None),
                Event::Eof => {
                    return Err(XmlError::UnexpectedEof("while reading child elements".into()))
                }
                _ => {}
            }
        }
    }

    /// Read the text content of the current element and consume its end tag.
    ///
    /// Entity and character references are resolved. Nested elements are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or ends early.
    pub fn read_text(&mut self) -> Result<String, XmlError> {
        let mut text = String::new();
        loop {
            match self.reader.read_event()? {
                Event::Text(e) => {
                    let decoded = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(e) => {
                    let raw = std::str::from_utf8(&e)
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    text.push_str(raw);
                }
                Event::GeneralRef(e) => {
                    if let Some(ch) = e
                        .resolve_char_ref()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?
                    {
                        text.push(ch);
                    } else {
                        let name = e
                            .decode()
                            .map_err(|err| XmlError::ParseError(err.to_string()))?;
                        let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                            .ok_or_else(|| {
                                XmlError::ParseError(format!("unknown entity `&{name};`"))
                            })?;
                        text.push_str(resolved);
                    }
                }
                Event::Start(_) => self.skip()?,
                Event::End(_) => return Ok(text),
                Event::Eof => {
                    return Err(XmlError::UnexpectedEof("while reading text content".into()))
                }
                _ => {}
            }
        }
    }

    /// Skip the current element and all of its children.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or ends early.
    pub fn skip(&mut self) -> Result<(), XmlError> {
        let mut depth: u32 = 1;
        loop {
            match self.reader.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Event::Eof => {
                    return Err(XmlError::UnexpectedEof("while skipping element".into()))
                }
                _ => {}
            }
        }
    }

    /// Read the current element as a 32-bit integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not an integer.
    pub fn read_i32(&mut self) -> Result<i32, XmlError> {
        let text = self.read_text()?;
        text.trim()
            .parse::<i32>()
            .map_err(|e| XmlError::ParseError(format!("invalid i32 '{text}': {e}")))
    }

    /// Read the current element as a 64-bit integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not an integer.
    pub fn read_i64(&mut self) -> Result<i64, XmlError> {
        let text = self.read_text()?;
        text.trim()
            .parse::<i64>()
            .map_err(|e| XmlError::ParseError(format!("invalid i64 '{text}': {e}")))
    }

    /// Read the current element as a floating point number.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a number.
    pub fn read_f64(&mut self) -> Result<f64, XmlError> {
        let text = self.read_text()?;
        text.trim()
            .parse::<f64>()
            .map_err(|e| XmlError::ParseError(format!("invalid f64 '{text}': {e}")))
    }

    /// Read the current element as a boolean (`true`/`false`).
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a boolean.
    pub fn read_bool(&mut self) -> Result<bool, XmlError> {
        let text = self.read_text()?;
        match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(XmlError::ParseError(format!("invalid boolean: {other}"))),
        }
    }

    /// Read the current element as an ISO 8601 timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a timestamp.
    pub fn read_timestamp(&mut self) -> Result<DateTime<Utc>, XmlError> {
        let text = self.read_text()?;
        parse_timestamp(text.trim())
    }

    /// Read a list whose items are wrapped in `item_tag` elements.
    ///
    /// The reader must be positioned inside the list element. Other child
    /// elements are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `read_item` or by the document.
    pub fn read_list<T, F>(&mut self, item_tag: &str, mut read_item: F) -> Result<Vec<T>, XmlError>
    where
        F: FnMut(&mut Self) -> Result<T, XmlError>,
    {
        let mut items = Vec::new();
        while let Some(name) = self.next_child()? {
            if name == item_tag {
                items.push(read_item(self)?);
            } else {
                self.skip()?;
            }
        }
        Ok(items)
    }

    /// Read a `<member>` list of strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed.
    pub fn read_string_list(&mut self) -> Result<Vec<String>, XmlError> {
        self.read_list("member", Self::read_text)
    }

    /// Read a `<member>` list of structures.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by an item unmarshaller.
    pub fn read_struct_list<T>(&mut self) -> Result<Vec<T>, XmlError>
    where
        T: XmlUnmarshaller,
    {
        self.read_list("member", T::unmarshall)
    }
}

fn local_name(raw: &[u8]) -> Result<String, XmlError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| XmlError::ParseError(e.to_string()))
}

/// Parse an ISO 8601 timestamp as sent by query services.
///
/// # Errors
///
/// Returns an error if `s` is not a timestamp.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, XmlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
                .map(|ndt| ndt.and_utc())
        })
        .map_err(|e| XmlError::ParseError(format!("invalid timestamp '{s}': {e}")))
}

/// Unmarshaller contract for a structure read from XML.
pub trait XmlUnmarshaller: Sized {
    /// Read the structure from `reader`.
    ///
    /// The reader is positioned just after the structure's start tag. The
    /// implementation reads the children it knows, skips the rest, and returns
    /// once the matching end tag has been consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed or a value cannot be parsed.
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError>;
}

impl XmlUnmarshaller for () {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        reader.skip()
    }
}

/// Unmarshall a complete `<{action}Response>` document.
///
/// The `<{action}Result>` element is read with `T`; operations whose response
/// carries no result element produce `T::default()`. The request ID is taken
/// from `<ResponseMetadata>`.
///
/// # Errors
///
/// Returns an error if the document is malformed, its root is not
/// `{action}Response`, or the result cannot be read.
pub fn unmarshall_response<T>(body: &[u8], action: &str) -> Result<AwsResponse<T>, XmlError>
where
    T: XmlUnmarshaller + Default,
{
    let mut reader = XmlReader::new(body);
    let root = reader.enter_root()?;
    let expected = format!("{action}Response");
    if root != expected {
        return Err(XmlError::UnexpectedRoot {
            expected,
            found: root,
        });
    }

    let result_tag = format!("{action}Result");
    let mut output = None;
    let mut metadata = ResponseMetadata::default();

    while let Some(name) = reader.next_child()? {
        if name == result_tag {
            output = Some(T::unmarshall(&mut reader)?);
        } else if name == "ResponseMetadata" {
            while let Some(child) = reader.next_child()? {
                match child.as_str() {
                    "RequestId" => metadata.request_id = Some(reader.read_text()?),
                    _ => reader.skip()?,
                }
            }
        } else {
            reader.skip()?;
        }
    }

    Ok(AwsResponse::new(output.unwrap_or_default(), metadata))
}

#[derive(Default)]
struct ErrorFields {
    error_type: Option<String>,
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

fn read_error_element(reader: &mut XmlReader<'_>, fields: &mut ErrorFields) -> Result<(), XmlError> {
    while let Some(name) = reader.next_child()? {
        match name.as_str() {
            "Type" => fields.error_type = Some(reader.read_text()?),
            "Code" => fields.code = Some(reader.read_text()?),
            "Message" => fields.message = Some(reader.read_text()?),
            _ => reader.skip()?,
        }
    }
    Ok(())
}

fn read_error_document(body: &[u8]) -> Result<ErrorFields, XmlError> {
    let mut reader = XmlReader::new(body);
    reader.enter_root()?;
    let mut fields = ErrorFields::default();

    while let Some(name) = reader.next_child()? {
        match name.as_str() {
            "Error" => read_error_element(&mut reader, &mut fields)?,
            "Errors" => {
                while let Some(child) = reader.next_child()? {
                    if child == "Error" && fields.code.is_none() {
                        read_error_element(&mut reader, &mut fields)?;
                    } else {
                        reader.skip()?;
                    }
                }
            }
            "RequestId" | "RequestID" => fields.request_id = Some(reader.read_text()?),
            _ => reader.skip()?,
        }
    }

    Ok(fields)
}

/// Parse a query-protocol error document into a [`ServiceError`].
///
/// Accepts both `<ErrorResponse><Error>..</Error><RequestId/></ErrorResponse>`
/// and `<Response><Errors><Error>..</Error></Errors><RequestID/></Response>`.
/// When the body cannot be parsed the error is derived from the HTTP status.
#[must_use]
pub fn parse_error_response(service: AwsService, status: u16, body: &[u8]) -> ServiceError {
    let fields = match read_error_document(body) {
        Ok(fields) => fields,
        Err(err) => {
            tracing::debug!(service = %service, status, error = %err, "unparseable error document");
            ErrorFields::default()
        }
    };

    let error_type = fields
        .error_type
        .as_deref()
        .map_or_else(|| ErrorType::from_status(status), ErrorType::from_query_type);

    ServiceError {
        service: service.name().to_string(),
        code: fields.code.unwrap_or_else(|| format!("Http{status}")),
        message: fields
            .message
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string()),
        request_id: fields.request_id,
        error_type,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Group {
        name: Option<String>,
        size: Option<i32>,
        zones: Vec<String>,
        protected: Option<bool>,
    }

    impl XmlUnmarshaller for Group {
        fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
            let mut group = Self::default();
            while let Some(name) = reader.next_child()? {
                match name.as_str() {
                    "Name" => group.name = Some(reader.read_text()?),
                    "Size" => group.size = Some(reader.read_i32()?),
                    "Zones" => group.zones = reader.read_string_list()?,
                    "Protected" => group.protected = Some(reader.read_bool()?),
                    _ => reader.skip()?,
                }
            }
            Ok(group)
        }
    }

    #[test]
    fn test_reads_result_and_request_id() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<DescribeGroupResponse xmlns="http://example.com/doc/2011-01-01/">
  <DescribeGroupResult>
    <Name>web &amp; api</Name>
    <Unknown><Nested>ignored</Nested></Unknown>
    <Size>3</Size>
    <Zones>
      <member>us-east-1a</member>
      <member>us-east-1b</member>
    </Zones>
    <Protected>true</Protected>
  </DescribeGroupResult>
  <ResponseMetadata>
    <RequestId>req-123</RequestId>
  </ResponseMetadata>
</DescribeGroupResponse>"#;

        let response = unmarshall_response::<Group>(xml, "DescribeGroup").unwrap();
        assert_eq!(response.metadata().request_id.as_deref(), Some("req-123"));
        let group = response.into_output();
        assert_eq!(group.name.as_deref(), Some("web & api"));
        assert_eq!(group.size, Some(3));
        assert_eq!(group.zones, vec!["us-east-1a", "us-east-1b"]);
        assert_eq!(group.protected, Some(true));
    }

    #[test]
    fn test_missing_result_element_yields_default() {
        let xml = br#"<CreateGroupResponse><ResponseMetadata><RequestId>r</RequestId></ResponseMetadata></CreateGroupResponse>"#;
        let response = unmarshall_response::<Group>(xml, "CreateGroup").unwrap();
        assert_eq!(response.output(), &Group::default());
    }

    #[test]
    fn test_self_closing_result_is_empty() {
        let xml = br#"<AttachResponse><AttachResult/><ResponseMetadata><RequestId>r</RequestId></ResponseMetadata></AttachResponse>"#;
        let response = unmarshall_response::<()>(xml, "Attach").unwrap();
        assert_eq!(response.metadata().request_id.as_deref(), Some("r"));
    }

    #[test]
    fn test_character_references_and_cdata_are_resolved() {
        let mut reader = XmlReader::new(b"<Value>a&#65;b<![CDATA[<raw>]]>&lt;</Value>");
        assert_eq!(reader.enter_root().unwrap(), "Value");
        assert_eq!(reader.read_text().unwrap(), "aAb<raw><");
    }

    #[test]
    fn test_namespace_prefixes_are_stripped() {
        let mut reader = XmlReader::new(b"<ns:Root xmlns:ns=\"urn:x\"><ns:Item>1</ns:Item></ns:Root>");
        assert_eq!(reader.enter_root().unwrap(), "Root");
        assert_eq!(reader.next_child().unwrap().as_deref(), Some("Item"));
        assert_eq!(reader.read_i64().unwrap(), 1);
        assert_eq!(reader.next_child().unwrap(), None);
    }

    #[test]
    fn test_invalid_scalars_are_reported() {
        let mut reader = XmlReader::new(b"<Size>three</Size>");
        reader.enter_root().unwrap();
        assert!(matches!(reader.read_i32(), Err(XmlError::ParseError(_))));

        let mut reader = XmlReader::new(b"<Flag>yes</Flag>");
        reader.enter_root().unwrap();
        assert!(matches!(reader.read_bool(), Err(XmlError::ParseError(_))));
    }

    #[test]
    fn test_reads_floating_point_values() {
        let mut reader = XmlReader::new(b"<Capacity> 2.5 </Capacity>");
        reader.enter_root().unwrap();
        assert!((reader.read_f64().unwrap() - 2.5).abs() < f64::EPSILON);

        let mut reader = XmlReader::new(b"<Capacity>1e3</Capacity>");
        reader.enter_root().unwrap();
        assert!((reader.read_f64().unwrap() - 1000.0).abs() < f64::EPSILON);

        let mut reader = XmlReader::new(b"<Capacity>two</Capacity>");
        reader.enter_root().unwrap();
        assert!(matches!(reader.read_f64(), Err(XmlError::ParseError(_))));
    }

    #[test]
    fn test_mismatched_root_is_rejected() {
        let xml = br#"<ErrorResponse><Error><Code>Throttling</Code></Error><RequestId>r</RequestId></ErrorResponse>"#;
        let err = unmarshall_response::<Group>(xml, "DescribeGroup").unwrap_err();
        assert!(matches!(
            err,
            XmlError::UnexpectedRoot { ref expected, ref found }
                if expected == "DescribeGroupResponse" && found == "ErrorResponse"
        ));
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let xml = b"<DescribeGroupResponse><DescribeGroupResult><Name>x</Name>";
        assert!(unmarshall_response::<Group>(xml, "DescribeGroup").is_err());
    }

    #[test]
    fn test_empty_document_has_no_root() {
        let err = unmarshall_response::<Group>(b"", "DescribeGroup").unwrap_err();
        assert!(matches!(err, XmlError::MissingElement(_)));
    }

    #[test]
    fn test_timestamps_accept_both_formats() {
        let a = parse_timestamp("2016-07-01T12:00:00Z").unwrap();
        let b = parse_timestamp("2016-07-01T12:00:00.000Z").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parses_error_response_document() {
        let xml = br#"<ErrorResponse xmlns="http://autoscaling.amazonaws.com/doc/2011-01-01/">
  <Error>
    <Type>Sender</Type>
    <Code>AlreadyExists</Code>
    <Message>AutoScalingGroup by this name already exists</Message>
  </Error>
  <RequestId>b2a1fd52-0000-0000-0000-000000000000</RequestId>
</ErrorResponse>"#;

        let err = parse_error_response(AwsService::AutoScaling, 400, xml);
        assert_eq!(err.service, "AmazonAutoScaling");
        assert_eq!(err.code, "AlreadyExists");
        assert_eq!(err.message, "AutoScalingGroup by this name already exists");
        assert_eq!(err.error_type, ErrorType::Client);
        assert_eq!(
            err.request_id.as_deref(),
            Some("b2a1fd52-0000-0000-0000-000000000000")
        );
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_parses_errors_list_document() {
        let xml = br#"<Response><Errors><Error><Code>RequestLimitExceeded</Code><Message>Slow down</Message></Error></Errors><RequestID>abc</RequestID></Response>"#;
        let err = parse_error_response(AwsService::ElasticLoadBalancing, 503, xml);
        assert_eq!(err.code, "RequestLimitExceeded");
        assert_eq!(err.error_type, ErrorType::Service);
        assert_eq!(err.request_id.as_deref(), Some("abc"));
        assert!(err.is_throttling());
    }

    #[test]
    fn test_unparseable_error_falls_back_to_status() {
        let err = parse_error_response(AwsService::SecurityToken, 502, b"Bad Gateway");
        assert_eq!(err.code, "Http502");
        assert_eq!(err.message, "Bad Gateway");
        assert_eq!(err.error_type, ErrorType::Service);
        assert!(err.request_id.is_none());
    }
}
