//! HTTP client utilities and retry logic.
//!
//! This module provides the retry policy, HTTP tuning and the
//! [`ServiceClient`] that every service crate wraps: it marshals a request,
//! sends it through a [`Transport`], retries transient failures and
//! unmarshals the response or the service's error document.

use crate::config::ClientConfiguration;
use crate::error::{Error, Result, ServiceError};
use crate::json::{self, JsonRequest, ERROR_TYPE_HEADER, REQUEST_ID_HEADER};
use crate::query::{self, QueryRequest};
use crate::request::SdkRequest;
use crate::response::AwsResponse;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::types::{AwsService, Protocol};
use crate::xml;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

// Service-specific timeout configurations (in seconds)

/// Default timeout for Auto Scaling requests
pub const AUTOSCALING_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for Elastic Load Balancing requests
pub const ELB_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for STS requests
pub const STS_DEFAULT_TIMEOUT: u64 = 20;

/// Default timeout for DynamoDB requests
pub const DYNAMODB_DEFAULT_TIMEOUT: u64 = 20;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

// Retry settings

/// Default maximum number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;

/// Default maximum retry delay in milliseconds (for exponential backoff)
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 20_000;

/// DynamoDB maximum number of retry attempts
pub const DYNAMODB_MAX_RETRIES: u32 = 10;

/// DynamoDB initial retry delay in milliseconds
pub const DYNAMODB_RETRY_DELAY_MS: u64 = 25;

/// Header carrying the per-invocation ID, constant across retries.
pub const INVOCATION_ID_HEADER: &str = "amz-sdk-invocation-id";

/// Header carrying the attempt counter.
pub const SDK_REQUEST_HEADER: &str = "amz-sdk-request";

const USER_AGENT: &str = concat!("cumulus-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Retry policy with exponential backoff.
///
/// Configures how requests are retried on transient failure, using exponential
/// backoff to avoid overwhelming a struggling or throttling service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,

    /// Backoff multiplier (typically 2 for exponential backoff)
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// Default policy for `service`. DynamoDB retries more often with a
    /// shorter base delay.
    #[must_use]
    pub const fn for_service(service: AwsService) -> Self {
        match service {
            AwsService::DynamoDb => Self::new()
                .with_max_retries(DYNAMODB_MAX_RETRIES)
                .with_initial_delay(Duration::from_millis(DYNAMODB_RETRY_DELAY_MS)),
            _ => Self::new(),
        }
    }

    /// Create a retry policy with no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// Uses exponential backoff: delay = min(initial_delay * multiplier^(attempt - 1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let delay = self.initial_delay.saturating_mul(multiplier);

        std::cmp::min(delay, self.max_delay)
    }

    /// Total number of attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client configuration.
///
/// Configures HTTP client behavior including timeouts, retries, and connection pooling.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Retry policy
    pub retry_policy: RetryPolicy,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_policy: RetryPolicy::new(),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Default configuration for `service`.
    #[must_use]
    pub const fn for_service(service: AwsService) -> Self {
        Self::new()
            .with_timeout(service.default_timeout())
            .with_retry_policy(RetryPolicy::for_service(service))
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Disable retries.
    #[must_use]
    pub const fn without_retries(mut self) -> Self {
        self.retry_policy = RetryPolicy::no_retry();
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Clone)]
pub struct ServiceClientBuilder {
    service: AwsService,
    config: ClientConfiguration,
    http_config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for ServiceClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClientBuilder")
            .field("service", &self.service)
            .field("config", &self.config)
            .field("http_config", &self.http_config)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl ServiceClientBuilder {
    /// Create a new builder for `service`.
    #[must_use]
    pub fn new(service: AwsService, config: ClientConfiguration) -> Self {
        Self {
            service,
            config,
            http_config: ClientConfig::for_service(service),
            transport: None,
        }
    }

    /// Override the HTTP client configuration used when building the client.
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Send requests through `transport` instead of the default `reqwest` one.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Finalise the builder and create the [`ServiceClient`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn build(self) -> Result<ServiceClient> {
        self.config.validate_config()?;
        let endpoint = self.config.resolve_endpoint(self.service)?;

        let mut http_config = self.http_config;
        if self.config.request_timeout_secs.is_some()
            || self.config.endpoints.get(self.service).is_some()
        {
            http_config.timeout = self.config.timeout_for(self.service);
        }
        if let Some(max_retries) = self.config.max_retries {
            http_config.retry_policy = http_config.retry_policy.with_max_retries(max_retries);
        }

        let user_agent = match &self.config.user_agent_suffix {
            Some(suffix) => format!("{USER_AGENT} {suffix}"),
            None => USER_AGENT.to_string(),
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&http_config, &self.config, &user_agent)?),
        };

        debug!(service = %self.service, endpoint = %endpoint, "built service client");

        Ok(ServiceClient {
            service: self.service,
            endpoint,
            transport,
            retry_policy: http_config.retry_policy,
            enable_logging: http_config.enable_logging,
        })
    }
}

/// Protocol-aware client for one web service.
#[derive(Clone)]
pub struct ServiceClient {
    service: AwsService,
    endpoint: Url,
    transport: Arc<dyn Transport>,
    retry_policy: RetryPolicy,
    enable_logging: bool,
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("endpoint", &self.endpoint.as_str())
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Start a builder for `service`.
    #[must_use]
    pub fn builder(service: AwsService, config: ClientConfiguration) -> ServiceClientBuilder {
        ServiceClientBuilder::new(service, config)
    }

    /// Service this client talks to.
    #[must_use]
    pub const fn service(&self) -> AwsService {
        self.service
    }

    /// Resolved endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Retry policy in effect.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Marshal, send and unmarshal a query-protocol operation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid requests, [`Error::Service`] for
    /// error documents, or a transport or parse error.
    pub async fn send_query<R>(&self, request: &R) -> Result<AwsResponse<R::Output>>
    where
        R: QueryRequest,
    {
        self.check_service(R::SERVICE)?;
        let sdk_request = query::marshall(request)?;
        let response = self.execute(&sdk_request, R::ACTION).await?;
        xml::unmarshall_response::<R::Output>(&response.body, R::ACTION).map_err(Error::from)
    }

    /// Marshal, send and unmarshal a JSON-protocol operation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid requests, [`Error::Service`] for
    /// error documents, or a transport or parse error.
    pub async fn send_json<R>(&self, request: &R) -> Result<AwsResponse<R::Output>>
    where
        R: JsonRequest,
    {
        self.check_service(R::SERVICE)?;
        let sdk_request = json::marshall(request)?;
        let response = self.execute(&sdk_request, R::OPERATION).await?;
        let request_id = response.header(REQUEST_ID_HEADER).map(str::to_string);
        json::unmarshall_response(&response.body, request_id)
    }

    /// Send a marshalled request, retrying transient failures.
    ///
    /// Every attempt carries the same `amz-sdk-invocation-id` and an
    /// `amz-sdk-request: attempt=N; max=M` header. Non-2xx responses are
    /// converted with the service protocol's error parser.
    ///
    /// # Errors
    ///
    /// Returns the last error once it is not retryable or attempts run out.
    pub async fn execute(&self, request: &SdkRequest, operation: &str) -> Result<HttpResponse> {
        let url = self.build_url(request.resource_path())?;
        let invocation_id = Uuid::new_v4().to_string();
        let max_attempts = self.retry_policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let http_request = HttpRequest {
                method: request.method().clone(),
                url: url.clone(),
                headers: self.attempt_headers(request, &invocation_id, attempt, max_attempts),
                body: request.body(),
            };

            if self.enable_logging {
                info!(
                    service = %self.service,
                    operation,
                    attempt,
                    invocation_id = %invocation_id,
                    "Sending request"
                );
            }

            let error = match self.transport.send(http_request).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => Error::Service(self.parse_error(&response)),
                Err(err) => err,
            };

            if !error.is_retryable() || attempt >= max_attempts {
                if error.should_log() {
                    warn!(service = %self.service, operation, error = %error, "request failed");
                }
                return Err(error);
            }

            let delay = self.retry_policy.delay_for_attempt(attempt);
            debug!(
                service = %self.service,
                operation,
                attempt,
                ?delay,
                error = %error,
                "Retrying request"
            );
            sleep(delay).await;
        }
    }

    fn check_service(&self, service: AwsService) -> Result<()> {
        if service == self.service {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "{service} operation sent through a {} client",
                self.service
            )))
        }
    }

    fn build_url(&self, resource_path: &str) -> Result<Url> {
        let relative = resource_path.trim_start_matches('/');
        if relative.is_empty() {
            return Ok(self.endpoint.clone());
        }
        self.endpoint.join(relative).map_err(Error::from)
    }

    fn attempt_headers(
        &self,
        request: &SdkRequest,
        invocation_id: &str,
        attempt: u32,
        max_attempts: u32,
    ) -> Vec<(String, String)> {
        let mut headers = request.headers().to_vec();
        headers.push((INVOCATION_ID_HEADER.to_string(), invocation_id.to_string()));
        headers.push((
            SDK_REQUEST_HEADER.to_string(),
            format!("attempt={attempt}; max={max_attempts}"),
        ));
        headers
    }

    fn parse_error(&self, response: &HttpResponse) -> ServiceError {
        match self.service.protocol() {
            Protocol::Query => xml::parse_error_response(self.service, response.status, &response.body),
            Protocol::Json10 => json::parse_error_response(
                self.service,
                response.status,
                &response.body,
                response.header(ERROR_TYPE_HEADER),
                response.header(REQUEST_ID_HEADER).map(str::to_string),
            ),
        }
    }
}
