//! Configuration structures for Cumulus clients.
//!
//! This module provides the configuration shared by every service client:
//! region, endpoint overrides, timeouts, retries and TLS settings.

use crate::types::{AwsService, Region};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variables consulted by [`ClientConfiguration::from_env`], in
/// order of precedence.
pub const REGION_ENV_VARS: &[&str] = &["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Environment variable holding a global endpoint override.
pub const ENDPOINT_ENV_VAR: &str = "AWS_ENDPOINT_URL";

/// Configuration for a Cumulus service client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientConfiguration {
    /// Region the client talks to
    #[serde(default)]
    pub region: Region,

    /// Endpoint used for every service instead of the regional default
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Per-service endpoint overrides
    #[serde(default)]
    pub endpoints: ServiceEndpoints,

    /// Request timeout in seconds; each service has its own default
    #[validate(range(min = 1, max = 300))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Maximum number of retry attempts; each service has its own default
    #[validate(range(min = 0, max = 10))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<std::path::PathBuf>,

    /// Appended to the `User-Agent` header
    #[validate(length(min = 1, max = 256))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent_suffix: Option<String>,
}

const fn default_tls_verify() -> bool {
    true
}

impl ClientConfiguration {
    /// Create a configuration for `region` with default settings.
    #[must_use]
    pub fn new(region: Region) -> Self {
        Self {
            region,
            endpoint: None,
            endpoints: ServiceEndpoints::new(),
            request_timeout_secs: None,
            max_retries: None,
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            user_agent_suffix: None,
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// The region comes from `AWS_REGION` or `AWS_DEFAULT_REGION` (falling back
    /// to `us-east-1`), and `AWS_ENDPOINT_URL` sets a global endpoint override.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = REGION_ENV_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|value| !value.is_empty()))
            .map(Region::new)
            .transpose()?
            .unwrap_or_default();

        let mut config = Self::new(region);
        if let Some(endpoint) = lookup(ENDPOINT_ENV_VAR).filter(|value| !value.is_empty()) {
            config = config.with_endpoint(endpoint);
        }
        config.validate_config()?;
        Ok(config)
    }

    /// Set a global endpoint override.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set per-service endpoint overrides.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: ServiceEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Append `suffix` to the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Run the field validators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing every violated constraint.
    pub fn validate_config(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        for service in AwsService::all() {
            if let Some(endpoint) = self.endpoints.get(*service) {
                endpoint.validate_endpoint()?;
            }
        }
        Ok(())
    }

    /// Resolve the endpoint for `service`.
    ///
    /// A per-service override wins over the global override, which wins over
    /// the regional default.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen URL cannot be parsed.
    pub fn resolve_endpoint(&self, service: AwsService) -> Result<Url, Error> {
        if let Some(endpoint) = self.endpoints.get(service) {
            return endpoint.parse_url();
        }
        if let Some(endpoint) = &self.endpoint {
            return Url::parse(endpoint)
                .map_err(|e| Error::ConfigError(format!("Invalid endpoint URL: {e}")));
        }
        self.region.endpoint_for(service)
    }

    /// Request timeout for `service`.
    #[must_use]
    pub fn timeout_for(&self, service: AwsService) -> Duration {
        self.endpoints
            .get(service)
            .and_then(ServiceEndpointConfig::timeout)
            .or_else(|| self.request_timeout_secs.map(Duration::from_secs))
            .unwrap_or_else(|| service.default_timeout())
    }
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self::new(Region::default())
    }
}

/// Static endpoint overrides, one per service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    /// Auto Scaling endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<ServiceEndpointConfig>,

    /// Elastic Load Balancing endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elb: Option<ServiceEndpointConfig>,

    /// Security Token Service endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sts: Option<ServiceEndpointConfig>,

    /// DynamoDB endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamodb: Option<ServiceEndpointConfig>,
}

impl ServiceEndpoints {
    /// Create a new empty service endpoints collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            autoscaling: None,
            elb: None,
            sts: None,
            dynamodb: None,
        }
    }

    /// Set the override for `service`.
    #[must_use]
    pub fn with(mut self, service: AwsService, endpoint: ServiceEndpointConfig) -> Self {
        let slot = match service {
            AwsService::AutoScaling => &mut self.autoscaling,
            AwsService::ElasticLoadBalancing => &mut self.elb,
            AwsService::SecurityToken => &mut self.sts,
            AwsService::DynamoDb => &mut self.dynamodb,
        };
        *slot = Some(endpoint);
        self
    }

    /// Override configured for `service`, if any.
    #[must_use]
    pub const fn get(&self, service: AwsService) -> Option<&ServiceEndpointConfig> {
        match service {
            AwsService::AutoScaling => self.autoscaling.as_ref(),
            AwsService::ElasticLoadBalancing => self.elb.as_ref(),
            AwsService::SecurityToken => self.sts.as_ref(),
            AwsService::DynamoDb => self.dynamodb.as_ref(),
        }
    }
}

/// Configuration for a single service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceEndpointConfig {
    /// Service base URL
    #[validate(url)]
    pub url: String,

    /// Optional timeout override for this service (in seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_override_secs: Option<u64>,
}

impl ServiceEndpointConfig {
    /// Create a new service endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            url: url.into(),
            timeout_override_secs: None,
        };
        config.validate_endpoint()?;
        Ok(config)
    }

    /// Set timeout override in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_override_secs = Some(seconds);
        self
    }

    /// Get the timeout as a Duration, if set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_override_secs.map(Duration::from_secs)
    }

    /// Parse the URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_url(&self) -> Result<Url, Error> {
        Url::parse(&self.url).map_err(|e| Error::ConfigError(format!("Invalid service URL: {e}")))
    }

    fn validate_endpoint(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid endpoint configuration: {e}")))
    }
}
