//! Remote role assumption.

use async_trait::async_trait;
use aws_sdk_sts::{Client, config::Credentials};
use aws_smithy_types::{DateTime, error::display::DisplayErrorContext};
use chrono::Utc;
use log::debug;

use crate::{
    credentials::BaseCredentials,
    error::{Result, SwitcherError},
};

/// MFA device and the current code from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaToken {
    pub serial_number: String,
    pub token_code: String,
}

/// Parameters of one `AssumeRole` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    /// Long-term keys the call is signed with
    pub base: BaseCredentials,
    pub role_arn: String,
    pub session_name: String,
    pub duration_seconds: i32,
    pub mfa: Option<MfaToken>,
}

/// Temporary credentials returned by a role assumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: chrono::DateTime<Utc>,
}

/// Exchanges long-term keys for temporary role credentials.
///
/// Implementations do not retry; any failure aborts the assumption.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<TemporaryCredentials>;
}

/// [`CredentialProvider`] backed by AWS STS.
#[derive(Debug, Clone)]
pub struct StsProvider {
    region: String,
}

impl StsProvider {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StsProvider {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<TemporaryCredentials> {
        let credentials = Credentials::new(
            &request.base.access_key_id,
            &request.base.secret_access_key,
            None,
            None,
            "aws-sessions-switcher",
        );
        let config = aws_config::from_env()
            .region(aws_config::Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let (serial_number, token_code) = match &request.mfa {
            Some(mfa) => (Some(mfa.serial_number.clone()), Some(mfa.token_code.clone())),
            None => (None, None),
        };

        let output = Client::new(&config)
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name)
            .duration_seconds(request.duration_seconds)
            .set_serial_number(serial_number)
            .set_token_code(token_code)
            .send()
            .await
            .map_err(|e| SwitcherError::AssumeRole(DisplayErrorContext(&e).to_string()))?;

        let session = output
            .credentials()
            .ok_or_else(|| SwitcherError::EmptyCredentials("no credentials in response".into()))?;
        debug!("STS credentials for {} expire at {:?}", request.session_name, session.expiration());

        Ok(TemporaryCredentials {
            access_key_id: session.access_key_id().to_string(),
            secret_access_key: session.secret_access_key().to_string(),
            session_token: session.session_token().to_string(),
            expiration: to_chrono(session.expiration())?,
        })
    }
}

fn to_chrono(expiration: &DateTime) -> Result<chrono::DateTime<Utc>> {
    chrono::DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos()).ok_or_else(|| {
        SwitcherError::EmptyCredentials(format!("expiration {expiration:?} is out of range"))
    })
}
