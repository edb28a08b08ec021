//! IAM and STS calls that turn an MFA code into temporary credentials.
//!
//! The calls go through [`SessionApi`] so the pipeline in
//! [`SessionGenerator`] can be exercised without AWS.

use std::error::Error;

use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_sts::{error::ProvideErrorMetadata, types};
use aws_smithy_types::date_time::Format;
use log::{debug, info};

use crate::{credentials::LongTermCredentials, error::MfaError, token::MfaToken};

/// IAM is a global service; any commercial region resolves its endpoint.
const FALLBACK_REGION: &str = "us-east-1";

const EXPIRED_TOKEN_CODE: &str = "ExpiredTokenException";
const INVALID_TOKEN_CODE: &str = "InvalidIdentityToken";

/// Temporary credentials returned by `GetSessionToken`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    /// RFC 3339 timestamp
    pub expiration: String,
}

impl TryFrom<&types::Credentials> for SessionCredentials {
    type Error = MfaError;

    fn try_from(creds: &types::Credentials) -> Result<Self, Self::Error> {
        let expiration = creds
            .expiration()
            .fmt(Format::DateTime)
            .map_err(|e| MfaError::MalformedResponse(format!("expiration: {e}")))?;
        Ok(Self {
            access_key_id: creds.access_key_id().to_string(),
            secret_access_key: creds.secret_access_key().to_string(),
            session_token: creds.session_token().to_string(),
            expiration,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
    pub user_id: String,
}

/// Everything that ends up in the shell environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedCredentials {
    pub session: SessionCredentials,
    pub principal_arn: String,
}

#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Serial number of the first MFA device registered for the caller.
    async fn first_mfa_device(&self) -> Result<String, MfaError>;

    async fn session_token(
        &self,
        serial_number: &str,
        token: &MfaToken,
        duration: Option<u32>,
    ) -> Result<SessionCredentials, MfaError>;

    async fn caller_identity(&self) -> Result<CallerIdentity, MfaError>;
}

/// [`SessionApi`] backed by the AWS SDK clients.
pub struct SdkSessionApi {
    iam: aws_sdk_iam::Client,
    sts: aws_sdk_sts::Client,
}

impl SdkSessionApi {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            iam: aws_sdk_iam::Client::new(config),
            sts: aws_sdk_sts::Client::new(config),
        }
    }

    /// Builds SDK clients signed with the long-term credentials of the profile.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Keys loaded from the profile; the profile name also
    ///   drives region lookup in the shared config files
    /// * `region` - Explicit region. When `None` and nothing is configured,
    ///   `us-east-1` is used.
    pub async fn from_credentials(
        credentials: &LongTermCredentials,
        region: Option<String>,
    ) -> Self {
        let mut loader = aws_config::from_env()
            .profile_name(credentials.profile())
            .credentials_provider(credentials.credentials().clone());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let mut config = loader.load().await;

        if config.region().is_none() {
            debug!("No region configured, falling back to {FALLBACK_REGION}");
            config = config
                .to_builder()
                .region(Region::new(FALLBACK_REGION))
                .build();
        }

        Self::new(&config)
    }
}

#[async_trait]
impl SessionApi for SdkSessionApi {
    async fn first_mfa_device(&self) -> Result<String, MfaError> {
        let output = self
            .iam
            .list_mfa_devices()
            .send()
            .await
            .map_err(|e| {
                let e = e.into_service_error();
                MfaError::MfaDeviceLookup(error_message(e.message(), &e))
            })?;

        output
            .mfa_devices()
            .first()
            .map(|device| device.serial_number().to_string())
            .ok_or(MfaError::NoMfaDevice)
    }

    async fn session_token(
        &self,
        serial_number: &str,
        token: &MfaToken,
        duration: Option<u32>,
    ) -> Result<SessionCredentials, MfaError> {
        let output = self
            .sts
            .get_session_token()
            .set_duration_seconds(duration.map(|d| d as i32))
            .serial_number(serial_number)
            .token_code(token.as_str())
            .send()
            .await
            .map_err(|e| {
                let e = e.into_service_error();
                session_token_error(e.code(), error_message(e.message(), &e), serial_number)
            })?;

        output
            .credentials()
            .ok_or_else(|| MfaError::MalformedResponse("no credentials returned".into()))?
            .try_into()
    }

    async fn caller_identity(&self) -> Result<CallerIdentity, MfaError> {
        let output = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| {
                let e = e.into_service_error();
                MfaError::CallerIdentity(error_message(e.message(), &e))
            })?;

        Ok(CallerIdentity {
            account: output.account().unwrap_or_default().to_string(),
            arn: output.arn().unwrap_or_default().to_string(),
            user_id: output.user_id().unwrap_or_default().to_string(),
        })
    }
}

/// The service message when AWS sent one, the error chain otherwise.
fn error_message(message: Option<&str>, err: &dyn Error) -> String {
    match message {
        Some(message) => message.to_string(),
        None => format!("unknown error occurred - {}", error_chain(err)),
    }
}

/// Joins the `Display` of every error in the `source()` chain.
fn error_chain(err: &dyn Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(err) = source {
        chain.push_str(": ");
        chain.push_str(&err.to_string());
        source = err.source();
    }
    chain
}

/// Maps a failed `GetSessionToken` onto the token errors users can act on.
fn session_token_error(code: Option<&str>, message: String, serial_number: &str) -> MfaError {
    match code {
        Some(EXPIRED_TOKEN_CODE) => MfaError::TokenExpired,
        Some(INVALID_TOKEN_CODE) => MfaError::InvalidToken,
        _ => MfaError::SessionToken {
            message,
            serial_number: serial_number.to_string(),
        },
    }
}

/// Runs the device lookup, token exchange and identity lookup in order.
pub struct SessionGenerator<A> {
    api: A,
    duration: Option<u32>,
    serial_number: Option<String>,
}

impl<A: SessionApi> SessionGenerator<A> {
    pub fn new(api: A, duration: Option<u32>, serial_number: Option<String>) -> Self {
        Self {
            api,
            duration,
            serial_number,
        }
    }

    /// Exchanges `token` for temporary credentials.
    ///
    /// The device serial comes from the override given to [`SessionGenerator::new`],
    /// otherwise from the first device IAM lists for the caller.
    ///
    /// # Returns
    ///
    /// * `Ok(ExportedCredentials)` - Session keys plus the caller's principal ARN
    /// * `Err(MfaError)` - The first failing step:
    ///   - `NoMfaDevice` / `MfaDeviceLookup` from the device lookup
    ///   - `TokenExpired`, `InvalidToken` or `SessionToken` from `GetSessionToken`
    ///   - `CallerIdentity` from `GetCallerIdentity`
    pub async fn generate(&self, token: &MfaToken) -> Result<ExportedCredentials, MfaError> {
        let serial_number = match &self.serial_number {
            Some(serial) => serial.clone(),
            None => self.api.first_mfa_device().await?,
        };
        info!("Using MFA device {serial_number}");

        let session = self
            .api
            .session_token(&serial_number, token, self.duration)
            .await?;
        let identity = self.api.caller_identity().await?;

        debug!("Caller user id {}", identity.user_id);
        info!(
            "Session for {} in account {} expires at {}",
            identity.arn, identity.account, session.expiration
        );

        Ok(ExportedCredentials {
            session,
            principal_arn: identity.arn,
        })
    }
}
