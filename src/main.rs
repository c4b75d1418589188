//! AWS Sessions Switcher
//!
//! Keeps named project/environment role definitions in `~/.aws/sessions_switcher`,
//! assumes those roles through STS (asking for an MFA code when a role needs
//! one), remembers the resulting temporary credentials as sessions until they
//! expire, and switches which session the `[default]` profile of the AWS
//! credentials file holds.
//!
//! Assuming a role performs the following operations:
//! 1. Looks up the role definition for the project and environment
//! 2. Reads the project's long-term keys from `[aws-sessions-switcher-<project>]`
//! 3. Prompts for an MFA token if the role requires one
//! 4. Requests temporary credentials with `sts:AssumeRole`
//! 5. Stores them as a session and copies them into `[default]`

use anyhow::Result;
use clap::Parser;

mod assume;
mod cli;
mod codec;
mod collector;
mod commands;
mod config;
mod credentials;
mod display;
mod error;
mod expiry;
mod projects;
mod prompt;
mod sessions;
mod store;
mod sts;
#[cfg(test)]
mod test_support;

use cli::Args;
use commands::App;
use config::Paths;
use prompt::TerminalPrompter;
use sts::StsProvider;

/// Parses arguments, resolves file locations and runs one command.
///
/// Any error ends the process with exit status 1.
#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        list,
        credentials_path,
        config_filename,
        config_path,
        region,
        verbose,
        command,
    } = Args::parse();

    // INFO by default so progress messages show; --verbose adds STS details.
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let paths = Paths::resolve(config_path, &config_filename, credentials_path)?;
    let provider = StsProvider::new(region);
    let mut prompter = TerminalPrompter::new();
    let command = if list { None } else { command };

    App::new(paths, &provider, &mut prompter).run(command).await
}
