//! Query marshallers and XML unmarshallers for STS operations.

use crate::models::{
    AssumeRoleRequest, AssumeRoleResult, AssumedRoleUser, Credentials, GetSessionTokenRequest,
    GetSessionTokenResult,
};
use cumulus_core::query::{QueryParams, QueryRequest};
use cumulus_core::xml::{XmlError, XmlReader, XmlUnmarshaller};
use cumulus_core::AwsService;
use secrecy::SecretString;

fn required<T>(value: Option<T>, element: &str) -> Result<T, XmlError> {
    value.ok_or_else(|| XmlError::MissingElement(element.to_string()))
}

impl QueryRequest for AssumeRoleRequest {
    const SERVICE: AwsService = AwsService::SecurityToken;
    const ACTION: &'static str = "AssumeRole";
    type Output = AssumeRoleResult;

    fn write_params(&self, params: &mut QueryParams) {
        params.push("RoleArn", &self.role_arn);
        params.push("RoleSessionName", &self.role_session_name);
        params.push_opt("Policy", self.policy.as_ref());
        params.push_opt("DurationSeconds", self.duration_seconds);
        params.push_opt("ExternalId", self.external_id.as_ref());
        params.push_opt("SerialNumber", self.serial_number.as_ref());
        params.push_opt("TokenCode", self.token_code.as_ref());
    }
}

impl QueryRequest for GetSessionTokenRequest {
    const SERVICE: AwsService = AwsService::SecurityToken;
    const ACTION: &'static str = "GetSessionToken";
    type Output = GetSessionTokenResult;

    fn write_params(&self, params: &mut QueryParams) {
        params.push_opt("DurationSeconds", self.duration_seconds);
        params.push_opt("SerialNumber", self.serial_number.as_ref());
        params.push_opt("TokenCode", self.token_code.as_ref());
    }
}

impl XmlUnmarshaller for Credentials {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut access_key_id = None;
        let mut secret_access_key = None;
        let mut session_token = None;
        let mut expiration = None;

        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "AccessKeyId" => access_key_id = Some(reader.read_text()?),
                "SecretAccessKey" => {
                    secret_access_key = Some(SecretString::new(reader.read_text()?.into()));
                }
                "SessionToken" => {
                    session_token = Some(SecretString::new(reader.read_text()?.into()));
                }
                "Expiration" => expiration = Some(reader.read_timestamp()?),
                _ => reader.skip()?,
            }
        }

        Ok(Self {
            access_key_id: required(access_key_id, "Credentials/AccessKeyId")?,
            secret_access_key: required(secret_access_key, "Credentials/SecretAccessKey")?,
            session_token: required(session_token, "Credentials/SessionToken")?,
            expiration: required(expiration, "Credentials/Expiration")?,
        })
    }
}

impl XmlUnmarshaller for AssumedRoleUser {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut assumed_role_id = None;
        let mut arn = None;
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "AssumedRoleId" => assumed_role_id = Some(reader.read_text()?),
                "Arn" => arn = Some(reader.read_text()?),
                _ => reader.skip()?,
            }
        }
        Ok(Self {
            assumed_role_id: required(assumed_role_id, "AssumedRoleUser/AssumedRoleId")?,
            arn: required(arn, "AssumedRoleUser/Arn")?,
        })
    }
}

impl XmlUnmarshaller for AssumeRoleResult {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut result = Self::default();
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "Credentials" => result.credentials = Some(Credentials::unmarshall(reader)?),
                "AssumedRoleUser" => {
                    result.assumed_role_user = Some(AssumedRoleUser::unmarshall(reader)?);
                }
                "PackedPolicySize" => result.packed_policy_size = Some(reader.read_i32()?),
                _ => reader.skip()?,
            }
        }
        Ok(result)
    }
}

impl XmlUnmarshaller for GetSessionTokenResult {
    fn unmarshall(reader: &mut XmlReader<'_>) -> Result<Self, XmlError> {
        let mut result = Self::default();
        while let Some(name) = reader.next_child()? {
            match name.as_str() {
                "Credentials" => result.credentials = Some(Credentials::unmarshall(reader)?),
                _ => reader.skip()?,
            }
        }
        Ok(result)
    }
}
