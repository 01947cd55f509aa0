//! Security Token Service request and result models.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use validator::{Validate, ValidationError};

fn is_word_or(c: char, extra: &str) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || extra.contains(c)
}

fn check_chars(
    value: &str,
    code: &'static str,
    allowed: impl Fn(char) -> bool,
) -> Result<(), ValidationError> {
    if value.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

fn validate_role_session_name(value: &str) -> Result<(), ValidationError> {
    check_chars(value, "role_session_name", |c| is_word_or(c, "+=,.@-"))
}

fn validate_external_id(value: &str) -> Result<(), ValidationError> {
    check_chars(value, "external_id", |c| is_word_or(c, "+=,.@:/-"))
}

fn validate_serial_number(value: &str) -> Result<(), ValidationError> {
    check_chars(value, "serial_number", |c| is_word_or(c, "+=/:,.@-"))
}

fn validate_token_code(value: &str) -> Result<(), ValidationError> {
    check_chars(value, "token_code", |c| c.is_ascii_digit())
}

// Tab, newline, carriage return and Latin-1.
fn validate_policy(value: &str) -> Result<(), ValidationError> {
    check_chars(value, "policy", |c| {
        matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{ff}')
    })
}

/// Parameters of `AssumeRole`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Validate)]
pub struct AssumeRoleRequest {
    /// ARN of the role to assume.
    #[validate(length(min = 20, max = 2048))]
    pub role_arn: String,
    /// Identifier for the assumed role session.
    #[validate(length(min = 2, max = 64), custom(function = "validate_role_session_name"))]
    pub role_session_name: String,
    /// Inline session policy in JSON.
    #[validate(length(min = 1, max = 2048), custom(function = "validate_policy"))]
    pub policy: Option<String>,
    /// Session duration in seconds.
    #[validate(range(min = 900, max = 3600))]
    pub duration_seconds: Option<i32>,
    /// Identifier a third party may require in the role's trust policy.
    #[validate(length(min = 2, max = 1224), custom(function = "validate_external_id"))]
    pub external_id: Option<String>,
    /// MFA device serial number or ARN.
    #[validate(length(min = 9, max = 256), custom(function = "validate_serial_number"))]
    pub serial_number: Option<String>,
    /// Current code from the MFA device.
    #[validate(length(equal = 6), custom(function = "validate_token_code"))]
    pub token_code: Option<String>,
}

impl AssumeRoleRequest {
    /// Create a request for `role_arn` under `role_session_name`.
    #[must_use]
    pub fn new(role_arn: impl Into<String>, role_session_name: impl Into<String>) -> Self {
        Self {
            role_arn: role_arn.into(),
            role_session_name: role_session_name.into(),
            ..Self::default()
        }
    }

    /// Scope the session down with an inline policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    /// Set the session duration.
    #[must_use]
    pub const fn with_duration_seconds(mut self, seconds: i32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Set the external ID.
    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Authenticate with an MFA device.
    #[must_use]
    pub fn with_mfa(
        mut self,
        serial_number: impl Into<String>,
        token_code: impl Into<String>,
    ) -> Self {
        self.serial_number = Some(serial_number.into());
        self.token_code = Some(token_code.into());
        self
    }
}

/// Parameters of `GetSessionToken`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Validate)]
pub struct GetSessionTokenRequest {
    /// Session duration in seconds.
    #[validate(range(min = 900, max = 129_600))]
    pub duration_seconds: Option<i32>,
    /// MFA device serial number or ARN.
    #[validate(length(min = 9, max = 256), custom(function = "validate_serial_number"))]
    pub serial_number: Option<String>,
    /// Current code from the MFA device.
    #[validate(length(equal = 6), custom(function = "validate_token_code"))]
    pub token_code: Option<String>,
}

impl GetSessionTokenRequest {
    /// Create a request using the service's default duration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session duration.
    #[must_use]
    pub const fn with_duration_seconds(mut self, seconds: i32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Authenticate with an MFA device.
    #[must_use]
    pub fn with_mfa(
        mut self,
        serial_number: impl Into<String>,
        token_code: impl Into<String>,
    ) -> Self {
        self.serial_number = Some(serial_number.into());
        self.token_code = Some(token_code.into());
        self
    }
}

/// Temporary security credentials.
///
/// The secret access key and session token are never printed by `Debug`;
/// use [`secrecy::ExposeSecret`] to read them.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: SecretString,
    /// Session token to send with signed requests.
    pub session_token: SecretString,
    /// When the credentials stop working.
    pub expiration: DateTime<Utc>,
}

impl Credentials {
    /// Returns true if the credentials expire at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration <= now
    }
}

/// Identity of an assumed role session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssumedRoleUser {
    /// `role-id:role-session-name`.
    pub assumed_role_id: String,
    /// ARN of the session.
    pub arn: String,
}

/// Result of `AssumeRole`.
#[derive(Debug, Clone, Default)]
pub struct AssumeRoleResult {
    /// Temporary credentials for the session.
    pub credentials: Option<Credentials>,
    /// Identity of the session.
    pub assumed_role_user: Option<AssumedRoleUser>,
    /// Percentage of the packed policy size limit used by the session policy.
    pub packed_policy_size: Option<i32>,
}

/// Result of `GetSessionToken`.
#[derive(Debug, Clone, Default)]
pub struct GetSessionTokenResult {
    /// Temporary credentials for the session.
    pub credentials: Option<Credentials>,
}
