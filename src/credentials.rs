//! Shared AWS credentials file.
//!
//! Two kinds of profile matter here:
//! - `[aws-sessions-switcher-{project}]`: the long-term keys used to call
//!   `AssumeRole` for a project. Only ever read.
//! - `[default]`: the credentials currently in effect for the AWS CLI and
//!   SDKs. Replaced wholesale on every switch.
//!
//! All other profiles are carried through rewrites untouched.

use std::path::{Path, PathBuf};

use crate::{
    codec::{self, Section},
    config::{ACTIVE_PROFILE, base_profile_name},
    error::{Result, SwitcherError},
    sessions::SessionRecord,
};

/// Long-term keys for one project.
#[derive(Clone, PartialEq, Eq)]
pub struct BaseCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for BaseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseCredentials")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// Handle on the shared credentials file.
#[derive(Debug, Clone)]
pub struct CredentialsFile {
    path: PathBuf,
}

impl CredentialsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the long-term keys from `[aws-sessions-switcher-{project}]`.
    ///
    /// # Arguments
    ///
    /// * `project` - Project name; the profile read is
    ///   `aws-sessions-switcher-{project}`
    ///
    /// # Errors
    ///
    /// - [`SwitcherError::BaseCredentialsMissing`] if the profile is absent or
    ///   `aws_access_key_id` / `aws_secret_access_key` is missing or empty
    /// - [`SwitcherError::File`] / [`SwitcherError::MalformedStore`] if the
    ///   credentials file cannot be read or decoded
    pub async fn base_credentials(&self, project: &str) -> Result<BaseCredentials> {
        let profile = base_profile_name(project);
        let mut sections = codec::read_sections(&self.path).await?;
        let missing = || SwitcherError::BaseCredentialsMissing(profile.clone());

        let mut section = sections.remove(&profile).ok_or_else(missing)?;
        let mut take = |field: &str| section.remove(field).filter(|v| !v.is_empty());

        Ok(BaseCredentials {
            access_key_id: take("aws_access_key_id").ok_or_else(missing)?,
            secret_access_key: take("aws_secret_access_key").ok_or_else(missing)?,
        })
    }

    /// The `[default]` profile, if present.
    pub async fn active(&self) -> Result<Option<Section>> {
        Ok(codec::read_sections(&self.path).await?.remove(ACTIVE_PROFILE))
    }

    /// Replaces the `[default]` profile with `session`.
    ///
    /// Every other profile is written back unchanged. The file is created if
    /// it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`SwitcherError::File`] or [`SwitcherError::MalformedStore`] if
    /// the credentials file cannot be read, decoded or written.
    pub async fn set_active(&self, session: &SessionRecord) -> Result<()> {
        let mut sections = codec::read_sections(&self.path).await?;
        sections.insert(ACTIVE_PROFILE.to_string(), session.to_section());
        codec::write_sections(&self.path, &sections).await
    }

    /// Whether `[default]` currently holds `session`'s keys and token.
    pub async fn is_active(&self, session: &SessionRecord) -> Result<bool> {
        Ok(self
            .active()
            .await?
            .is_some_and(|section| session.matches(&section)))
    }
}
