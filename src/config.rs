//! File locations and naming constants shared by the stores.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// File name of the project/session store under `~/.aws/`.
pub const DEFAULT_CONFIG_FILENAME: &str = "sessions_switcher";

/// Prefix of the credentials profile holding a project's long-term keys.
pub const BASE_PROFILE_PREFIX: &str = "aws-sessions-switcher-";

/// Prefix distinguishing session sections from project sections on disk.
pub const SESSION_PREFIX: &str = "session-";

/// Credentials profile used by the AWS CLI and SDKs when none is named.
pub const ACTIVE_PROFILE: &str = "default";

/// Session duration requested when a project does not configure one.
pub const DEFAULT_SESSION_DURATION: &str = "3600";

/// Region used for STS calls unless overridden.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Resolved locations of the two files this tool rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Project and session store
    pub config: PathBuf,
    /// Shared AWS credentials file
    pub credentials: PathBuf,
}

impl Paths {
    /// Resolves both paths, falling back to `~/.aws/{config_filename}` and
    /// `~/.aws/credentials`.
    pub fn resolve(
        config_path: Option<PathBuf>,
        config_filename: &str,
        credentials_path: Option<PathBuf>,
    ) -> Result<Self> {
        let aws_dir = || dirs::home_dir().map(|d| d.join(".aws"));

        let config = config_path
            .or_else(|| aws_dir().map(|d| d.join(config_filename)))
            .context("Could not determine home directory")?;
        let credentials = credentials_path
            .or_else(|| aws_dir().map(|d| d.join("credentials")))
            .context("Could not determine home directory")?;

        Ok(Self {
            config,
            credentials,
        })
    }
}

/// Name of the credentials profile holding `project`'s long-term keys.
pub fn base_profile_name(project: &str) -> String {
    format!("{BASE_PROFILE_PREFIX}{project}")
}

/// Store key of the session obtained for `project`/`environment`.
pub fn session_key(project: &str, environment: &str) -> String {
    format!("{SESSION_PREFIX}{project}-{environment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths_win() {
        let paths = Paths::resolve(
            Some(PathBuf::from("/tmp/store")),
            DEFAULT_CONFIG_FILENAME,
            Some(PathBuf::from("/tmp/creds")),
        )
        .unwrap();
        assert_eq!(paths.config, PathBuf::from("/tmp/store"));
        assert_eq!(paths.credentials, PathBuf::from("/tmp/creds"));
    }

    #[test]
    fn test_config_filename_is_placed_under_aws_dir() {
        let Ok(paths) = Paths::resolve(None, "custom_store", None) else {
            return;
        };
        assert!(paths.config.ends_with(".aws/custom_store"));
        assert!(paths.credentials.ends_with(".aws/credentials"));
    }

    #[test]
    fn test_naming_helpers() {
        assert_eq!(base_profile_name("acme"), "aws-sessions-switcher-acme");
        assert_eq!(session_key("acme", "prod"), "session-acme-prod");
    }
}
