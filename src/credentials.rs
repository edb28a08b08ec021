//! Long-term IAM credentials read from the shared credentials file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use aws_sdk_sts::config::Credentials;
use configparser::ini::Ini;
use log::debug;

use crate::error::MfaError;

pub const DEFAULT_PROFILE: &str = "default";

const ACCESS_KEY_ID: &str = "aws_access_key_id";
const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
const SESSION_TOKEN: &str = "aws_session_token";

const PROVIDER_NAME: &str = "aws-mfa-env";
const HEADERLESS_SECTION: &str = "\0";

/// Resolves the credentials file: the given path, or `~/.aws/credentials`.
pub fn credentials_file_path(path: Option<PathBuf>) -> Result<PathBuf, MfaError> {
    path.or_else(|| dirs::home_dir().map(|d| d.join(".aws").join("credentials")))
        .ok_or(MfaError::HomeDirectory)
}

/// The static credentials of one profile, used to sign the IAM and STS calls.
#[derive(Clone, Debug)]
pub struct LongTermCredentials {
    profile: String,
    credentials: Credentials,
}

impl LongTermCredentials {
    /// Loads `profile` from the credentials file at `path`.
    ///
    /// An empty profile name selects `default`. The section must carry both
    /// `aws_access_key_id` and `aws_secret_access_key`.
    pub fn load(path: &Path, profile: &str) -> Result<Self, MfaError> {
        let content = fs::read_to_string(path)
            .map_err(|_| MfaError::CredentialsFileNotFound(path.to_path_buf()))?;
        Self::parse(path, &content, profile)
    }

    fn parse(path: &Path, content: &str, profile: &str) -> Result<Self, MfaError> {
        let profile = if profile.is_empty() { DEFAULT_PROFILE } else { profile };
        let invalid = |reason: String| MfaError::InvalidCredentialsFile {
            path: path.to_path_buf(),
            reason,
        };

        // Profile names are case sensitive for the AWS tooling. Keys above the
        // first header go to a section no profile can be named after.
        let mut ini = Ini::new_cs();
        ini.set_default_section(HEADERLESS_SECTION);
        ini.read(content.to_string()).map_err(invalid)?;

        if !ini.sections().iter().any(|s| s == profile) {
            return Err(invalid(format!("profile [{profile}] not found")));
        }

        let get = |key: &str| {
            ini.get(profile, key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| invalid(format!("profile [{profile}] is missing {key}")))
        };
        let access_key_id = get(ACCESS_KEY_ID)?;
        let secret_access_key = get(SECRET_ACCESS_KEY)?;
        let session_token = ini.get(profile, SESSION_TOKEN).filter(|v| !v.is_empty());

        debug!("Loaded profile [{profile}] from {}", path.display());

        Ok(Self {
            profile: profile.to_string(),
            credentials: Credentials::new(
                access_key_id,
                secret_access_key,
                session_token,
                None,
                PROVIDER_NAME,
            ),
        })
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
