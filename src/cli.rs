//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::credentials::DEFAULT_PROFILE;

/// AWS MFA session helper.
///
/// Exchanges the long-term keys of a profile plus a one-time MFA code for
/// temporary STS credentials and prints them as shell exports.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print session credentials as exports, use with `eval $(aws-mfa-env shell -t CODE)`
    Shell(ShellArgs),
    /// Display the release version
    Version,
}

#[derive(clap::Args)]
pub struct ShellArgs {
    /// Profile name in the AWS credentials file
    #[arg(short, long, env = "AWS_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Current MFA code; prompted for when omitted
    #[arg(short, long)]
    pub token: Option<String>,

    /// Path to AWS credentials file [default: ~/.aws/credentials]
    #[arg(short, long, env = "AWS_SHARED_CREDENTIALS_FILE")]
    pub credentials_path: Option<PathBuf>,

    /// Session duration in seconds (900-129600) [default: STS default]
    #[arg(
        short,
        long,
        env = "AWS_SESSION_DURATION",
        value_parser = clap::value_parser!(u32).range(900..=129600)
    )]
    pub duration: Option<u32>,

    /// MFA device serial number; skips looking up the user's devices
    #[arg(short, long, env = "AWS_MFA_SERIAL")]
    pub serial_number: Option<String>,

    /// Region for the IAM and STS clients
    #[arg(
        short,
        long,
        env = "AWS_REGION",
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    pub region: Option<String>,
}
