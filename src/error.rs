//! Errors raised while turning long-term credentials into a shell session.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MfaError {
    /// No home directory to resolve `~/.aws/credentials` against
    #[error("Could not determine home directory")]
    HomeDirectory,

    /// The credentials file is missing or unreadable
    #[error("AWS Credentials file not found at {}", .0.display())]
    CredentialsFileNotFound(PathBuf),

    /// The credentials file could not be parsed or lacks the profile keys
    #[error("AWS Credentials at {} is invalid: {reason}", path.display())]
    InvalidCredentialsFile { path: PathBuf, reason: String },

    /// The MFA code is malformed or was rejected by STS
    #[error("Invalid token code")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("No MFA devices configured for user")]
    NoMfaDevice,

    #[error("Unable to retrieve any MFA devices - {0}")]
    MfaDeviceLookup(String),

    /// `GetSessionToken` failed for a reason other than the token itself
    #[error("{message} For device {serial_number}")]
    SessionToken {
        message: String,
        serial_number: String,
    },

    #[error("Unable to retrieve caller identity - {0}")]
    CallerIdentity(String),

    /// STS answered without the fields a session needs
    #[error("Malformed STS response: {0}")]
    MalformedResponse(String),
}
