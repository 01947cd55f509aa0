//! Query-protocol marshalling.
//!
//! Query services receive a flat list of form-encoded `name=value` pairs. The
//! `Action` and `Version` pairs select the operation; the remaining pairs carry
//! the request fields. Lists are flattened into `Name.member.N` entries and
//! structures into `Name.member.N.Field` entries, with `N` starting at 1.

use crate::error::Result;
use crate::request::SdkRequest;
use crate::types::AwsService;
use crate::xml::XmlUnmarshaller;
use chrono::{DateTime, SecondsFormat, Utc};
use validator::Validate;

/// A value that can be written as a query parameter.
pub trait QueryValue {
    /// Render the value in its wire form.
    fn to_query_value(&self) -> String;
}

impl QueryValue for str {
    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl QueryValue for String {
    fn to_query_value(&self) -> String {
        self.clone()
    }
}

impl QueryValue for bool {
    fn to_query_value(&self) -> String {
        let value = if *self { "true" } else { "false" };
        value.to_string()
    }
}

macro_rules! integer_query_value {
    ($($ty:ty),*) => {
        $(
            impl QueryValue for $ty {
                fn to_query_value(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_query_value!(i32, i64, u32, u64);

impl QueryValue for f64 {
    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl QueryValue for DateTime<Utc> {
    fn to_query_value(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query_value(&self) -> String {
        (**self).to_query_value()
    }
}

/// A structure that can be flattened under a parameter prefix.
pub trait QuerySerialize {
    /// Write every present field as `{prefix}.{Field}`.
    fn write_query(&self, prefix: &str, params: &mut QueryParams);
}

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: QueryValue,
    {
        self.pairs.push((key.into(), value.to_query_value()));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: impl Into<String>, value: Option<T>)
    where
        T: QueryValue,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Append a list of scalars as `key.member.N`.
    ///
    /// An absent list writes nothing. A present but empty list writes `key=`
    /// so the service sees an explicitly cleared list.
    pub fn push_list<T>(&mut self, key: &str, values: Option<&[T]>)
    where
        T: QueryValue,
    {
        let Some(values) = values else {
            return;
        };
        if values.is_empty() {
            self.pairs.push((key.to_string(), String::new()));
            return;
        }
        for (index, value) in values.iter().enumerate() {
            self.push(format!("{key}.member.{}", index + 1), value);
        }
    }

    /// Append a list of structures as `key.member.N.Field`.
    ///
    /// Empty and absent lists follow [`QueryParams::push_list`].
    pub fn push_struct_list<T>(&mut self, key: &str, values: Option<&[T]>)
    where
        T: QuerySerialize,
    {
        let Some(values) = values else {
            return;
        };
        if values.is_empty() {
            self.pairs.push((key.to_string(), String::new()));
            return;
        }
        for (index, value) in values.iter().enumerate() {
            value.write_query(&format!("{key}.member.{}", index + 1), self);
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Marshaller contract for a query-protocol operation.
///
/// Each operation's request type implements this trait; its `Output` is the
/// type read from the `<{Action}Result>` element of the response.
pub trait QueryRequest: Validate {
    /// Service that implements the operation.
    const SERVICE: AwsService;
    /// Value of the `Action` parameter.
    const ACTION: &'static str;
    /// Result type of the operation.
    type Output: XmlUnmarshaller + Default;

    /// Write the request fields in declaration order, skipping absent ones.
    fn write_params(&self, params: &mut QueryParams);
}

/// Marshall a query request into an [`SdkRequest`].
///
/// # Errors
///
/// Returns [`crate::Error::ValidationError`] if a field violates its constraints.
pub fn marshall<R>(request: &R) -> Result<SdkRequest>
where
    R: QueryRequest,
{
    request.validate()?;

    let service = R::SERVICE;
    let mut sdk_request = SdkRequest::new(service);
    sdk_request.add_header("Content-Type", service.protocol().content_type());
    sdk_request.add_parameter("Action", R::ACTION);
    sdk_request.add_parameter("Version", service.api_version());

    let mut params = QueryParams::new();
    request.write_params(&mut params);
    for (key, value) in params.into_pairs() {
        sdk_request.add_parameter(key, value);
    }

    Ok(sdk_request)
}
