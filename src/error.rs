//! Error types for store, credential and role assumption operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`SwitcherError`].
pub type Result<T> = std::result::Result<T, SwitcherError>;

/// Errors surfaced to the command layer.
///
/// Nothing in the crate retries; every variant is reported once and the
/// process exits with status 1.
#[derive(Debug, Error)]
pub enum SwitcherError {
    /// The project/session store does not exist but the operation needs to read it.
    #[error(
        "could not locate configuration file at \"{}\"; run `aws-sessions-switcher configure` to create one",
        .0.display()
    )]
    ConfigMissing(PathBuf),

    /// A file could not be decoded, or a section is missing required fields.
    #[error("there was a problem parsing \"{}\": {reason}", path.display())]
    MalformedStore {
        /// File that failed to decode
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// No role is configured under `{project}-{environment}`.
    #[error("no role configured for project \"{project}\" in environment \"{environment}\"")]
    ProjectNotFound {
        /// Project name
        project: String,
        /// Environment name
        environment: String,
    },

    /// The environment exists but under a different role name.
    #[error("role \"{role}\" is not configured for {project}/{environment}")]
    RoleNotFound {
        /// Project name
        project: String,
        /// Environment name
        environment: String,
        /// Requested role name
        role: String,
    },

    /// The session does not exist or has just been pruned as expired.
    #[error("session {0} unavailable")]
    SessionNotFound(String),

    /// The `[aws-sessions-switcher-{project}]` profile is absent or incomplete.
    #[error(
        "credentials for profile '[{0}]' are missing; you must add this section to your AWS credentials file"
    )]
    BaseCredentialsMissing(String),

    /// MFA is required but no device ARN was configured.
    #[error("MFA is required for {0} but no mfa_device_arn is configured")]
    MissingMfaDevice(String),

    /// `mfa_device_session_duration` is not a number of seconds.
    #[error("invalid session duration \"{0}\"")]
    InvalidDuration(String),

    /// A project delete was asked for with an empty name, which would match
    /// every section.
    #[error("project name to delete must not be empty")]
    EmptyProjectName,

    /// The remote role assumption call failed.
    #[error("an error occurred while calling assume role: {0}")]
    AssumeRole(String),

    /// The role assumption succeeded but returned no usable credentials.
    #[error("failed to obtain session credentials: {0}")]
    EmptyCredentials(String),

    /// Reading or writing a named file failed.
    #[error("I/O error on \"{}\": {source}", path.display())]
    File {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Local I/O failed outside of a named file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The interactive terminal prompt failed or was closed.
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl SwitcherError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    /// Creates a malformed-store error for `path`.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedStore {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
