//! Formatting session credentials as POSIX shell exports.

use std::io::{self, Write};

use crate::session::ExportedCredentials;

const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
const SECURITY_TOKEN: &str = "AWS_SECURITY_TOKEN";
const PRINCIPAL_ARN: &str = "X_PRINCIPAL_ARN";
const EXPIRES: &str = "EXPIRES";

/// One `export NAME=value` line per variable, in a fixed order.
///
/// `AWS_SECURITY_TOKEN` repeats the session token for older SDKs.
pub fn build_env_vars(creds: &ExportedCredentials) -> Vec<String> {
    let session = &creds.session;
    [
        (ACCESS_KEY_ID, session.access_key_id.as_str()),
        (SECRET_ACCESS_KEY, session.secret_access_key.as_str()),
        (SESSION_TOKEN, session.session_token.as_str()),
        (SECURITY_TOKEN, session.session_token.as_str()),
        (PRINCIPAL_ARN, creds.principal_arn.as_str()),
        (EXPIRES, session.expiration.as_str()),
    ]
    .into_iter()
    .map(|(name, value)| format!("export {name}={value}"))
    .collect()
}

pub fn print_vars<W: Write>(out: &mut W, vars: &[String]) -> io::Result<()> {
    for var in vars {
        writeln!(out, "{var}")?;
    }
    out.flush()
}
