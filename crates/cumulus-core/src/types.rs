//! Service catalogue and region types.

use crate::client::{
    AUTOSCALING_DEFAULT_TIMEOUT, DYNAMODB_DEFAULT_TIMEOUT, ELB_DEFAULT_TIMEOUT, STS_DEFAULT_TIMEOUT,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Wire protocol spoken by a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Form-encoded `Action`/`Version` parameters, XML responses
    Query,
    /// JSON 1.0 bodies routed by the `X-Amz-Target` header
    Json10,
}

impl Protocol {
    /// Content type of request bodies for this protocol.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Query => "application/x-www-form-urlencoded; charset=utf-8",
            Self::Json10 => "application/x-amz-json-1.0",
        }
    }
}

/// Web services supported by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwsService {
    /// Auto Scaling
    AutoScaling,
    /// Elastic Load Balancing (classic)
    ElasticLoadBalancing,
    /// Security Token Service
    SecurityToken,
    /// DynamoDB
    DynamoDb,
}

impl AwsService {
    /// Returns the service name used in logs and error values.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AutoScaling => "AmazonAutoScaling",
            Self::ElasticLoadBalancing => "AmazonElasticLoadBalancing",
            Self::SecurityToken => "AWSSecurityTokenService",
            Self::DynamoDb => "AmazonDynamoDBv2",
        }
    }

    /// Returns the DNS prefix of the service endpoint.
    #[must_use]
    pub const fn endpoint_prefix(&self) -> &'static str {
        match self {
            Self::AutoScaling => "autoscaling",
            Self::ElasticLoadBalancing => "elasticloadbalancing",
            Self::SecurityToken => "sts",
            Self::DynamoDb => "dynamodb",
        }
    }

    /// Returns the API version the SDK models were generated from.
    #[must_use]
    pub const fn api_version(&self) -> &'static str {
        match self {
            Self::AutoScaling => "2011-01-01",
            Self::ElasticLoadBalancing => "2012-06-01",
            Self::SecurityToken => "2011-06-15",
            Self::DynamoDb => "2012-08-10",
        }
    }

    /// Returns the wire protocol of the service.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        match self {
            Self::DynamoDb => Protocol::Json10,
            _ => Protocol::Query,
        }
    }

    /// Returns the `X-Amz-Target` prefix for JSON services.
    #[must_use]
    pub const fn json_target_prefix(&self) -> Option<&'static str> {
        match self {
            Self::DynamoDb => Some("DynamoDB_20120810"),
            _ => None,
        }
    }

    /// Returns the default request timeout for the service.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        let secs = match self {
            Self::AutoScaling => AUTOSCALING_DEFAULT_TIMEOUT,
            Self::ElasticLoadBalancing => ELB_DEFAULT_TIMEOUT,
            Self::SecurityToken => STS_DEFAULT_TIMEOUT,
            Self::DynamoDb => DYNAMODB_DEFAULT_TIMEOUT,
        };
        Duration::from_secs(secs)
    }

    /// Returns all available services.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::AutoScaling,
            Self::ElasticLoadBalancing,
            Self::SecurityToken,
            Self::DynamoDb,
        ]
    }
}

impl FromStr for AwsService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|svc| {
                svc.endpoint_prefix() == lowered || svc.name().to_lowercase() == lowered
            })
            .ok_or_else(|| Error::InvalidArgument(format!("Unknown service: {s}")))
    }
}

impl std::fmt::Display for AwsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Region code such as `us-east-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    /// Parse and validate a region code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or contains characters other than
    /// lowercase ASCII letters, digits and hyphens.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let valid = !code.is_empty()
            && !code.starts_with('-')
            && !code.ends_with('-')
            && code
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if valid {
            Ok(Self(code))
        } else {
            Err(Error::ConfigError(format!("Invalid region: `{code}`")))
        }
    }

    /// Returns the region code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the default HTTPS endpoint of `service` in this region.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL cannot be parsed.
    pub fn endpoint_for(&self, service: AwsService) -> Result<Url> {
        let url = if service == AwsService::SecurityToken && self.0 == "us-east-1" {
            "https://sts.amazonaws.com/".to_string()
        } else {
            let suffix = if self.0.starts_with("cn-") {
                "amazonaws.com.cn"
            } else {
                "amazonaws.com"
            };
            format!("https://{}.{}.{suffix}/", service.endpoint_prefix(), self.0)
        };
        Url::parse(&url).map_err(Error::from)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self("us-east-1".to_string())
    }
}

impl TryFrom<String> for Region {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
