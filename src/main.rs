//! AWS MFA session helper
//!
//! Reads the long-term keys of a profile from the shared credentials file,
//! exchanges them plus a one-time MFA code for temporary STS credentials and
//! prints those as shell exports:
//!
//! ```sh
//! eval $(aws-mfa-env shell --profile work --token 123456)
//! ```
//!
//! Only the export lines go to stdout; prompts and logs go to stderr.

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
mod credentials;
mod error;
mod session;
mod shell;
mod token;

use cli::{Args, Command, ShellArgs};
use credentials::LongTermCredentials;
use session::{SdkSessionApi, SessionGenerator};
use token::MfaToken;

#[tokio::main]
async fn main() -> Result<()> {
    // Quiet by default so `eval` users only see failures; RUST_LOG overrides.
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    match Args::parse().command {
        Command::Shell(args) => run_shell(args).await,
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Generates a session for one profile and prints it as shell exports.
///
/// The steps run in a fixed order and stop at the first failure:
/// 1. Resolve and read the credentials file, validating the profile section
/// 2. Obtain the MFA code (flag or stdin prompt) and validate its shape
/// 3. Build IAM and STS clients signed with the profile's long-term keys
/// 4. Look up the MFA device, exchange the code and fetch the caller identity
/// 5. Write the export lines to stdout
///
/// # Arguments
/// * `args` - The parsed `shell` subcommand flags
///
/// # Errors
/// This function will return an error if:
/// * The credentials file is missing or the profile lacks its keys
/// * The MFA code is not at least six digits
/// * IAM or STS reject the request, or the code has expired
/// * Writing to stdout fails
///
/// Nothing is printed to stdout unless every step succeeded.
async fn run_shell(args: ShellArgs) -> Result<()> {
    let ShellArgs {
        profile,
        token,
        credentials_path,
        duration,
        serial_number,
        region,
    } = args;

    let path = credentials::credentials_file_path(credentials_path)?;
    let credentials = LongTermCredentials::load(&path, &profile)?;

    let token = match token {
        Some(token) => token,
        None => prompt_for_token()?,
    };
    let token = MfaToken::parse(&token)?;

    info!("Requesting session for profile [{}]", credentials.profile());
    let api = SdkSessionApi::from_credentials(&credentials, region).await;
    let exported = SessionGenerator::new(api, duration, serial_number)
        .generate(&token)
        .await?;

    shell::print_vars(&mut io::stdout().lock(), &shell::build_env_vars(&exported))?;
    Ok(())
}

/// Reads a code from stdin, prompting on stderr so stdout stays eval-safe.
fn prompt_for_token() -> Result<String> {
    eprint!("Enter AWS MFA code for device: ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
