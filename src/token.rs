//! MFA token code validation.

use std::fmt;

use crate::error::MfaError;

/// Codes at or below this length are rejected before reaching STS.
const MIN_TOKEN_LEN: usize = 6;

/// A one-time code from an MFA device that passed shape validation.
#[derive(Clone, PartialEq, Eq)]
pub struct MfaToken(String);

impl MfaToken {
    /// Trims the input and checks it is at least six ASCII digits.
    pub fn parse(input: &str) -> Result<Self, MfaError> {
        let code = input.trim();
        if code.len() < MIN_TOKEN_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(MfaError::InvalidToken);
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// One-time codes stay out of logs.
impl fmt::Debug for MfaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MfaToken(******)")
    }
}
