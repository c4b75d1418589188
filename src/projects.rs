//! Project/environment role definitions.
//!
//! One record exists per `{project}-{environment}` key. Listing helpers still
//! group roles per environment, but a second role added for the same pair
//! replaces the first.

use std::collections::BTreeMap;

use log::{info, warn};

use crate::{
    codec::Section,
    config::{DEFAULT_SESSION_DURATION, SESSION_PREFIX},
    error::{Result, SwitcherError},
    store::{StoreContents, SwitcherStore},
};

/// Role definitions keyed by `{project}-{environment}`.
pub type Projects = BTreeMap<String, ProjectEnvironmentRecord>;

/// One assumable role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEnvironmentRecord {
    pub project_name: String,
    pub project_environment: String,
    pub role_arn: String,
    pub role_name: String,
    /// Only the stored string `true` (exact case) enables MFA.
    pub mfa_required: bool,
    pub mfa_device_arn: Option<String>,
    /// Seconds, as digits. Absent means [`DEFAULT_SESSION_DURATION`].
    pub mfa_device_session_duration: Option<String>,
}

impl ProjectEnvironmentRecord {
    /// Store key, `{project}-{environment}`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.project_name, self.project_environment)
    }

    /// Requested session length in seconds.
    pub fn duration_seconds(&self) -> Result<i32> {
        let raw = self
            .mfa_device_session_duration
            .as_deref()
            .unwrap_or(DEFAULT_SESSION_DURATION);
        raw.trim()
            .parse()
            .map_err(|_| SwitcherError::InvalidDuration(raw.to_string()))
    }

    /// Builds a record from a decoded section; on failure returns the name of
    /// the missing field.
    pub(crate) fn from_section(section: &Section) -> std::result::Result<Self, &'static str> {
        let required = |field: &'static str| section.get(field).cloned().ok_or(field);
        let optional = |field: &str| section.get(field).filter(|v| !v.is_empty()).cloned();

        Ok(Self {
            project_name: required("project_name")?,
            project_environment: required("project_environment")?,
            role_arn: required("role_arn")?,
            role_name: required("role_name")?,
            mfa_required: section.get("mfa_required").is_some_and(|v| v == "true"),
            mfa_device_arn: optional("mfa_device_arn"),
            mfa_device_session_duration: optional("mfa_device_session_duration"),
        })
    }

    pub(crate) fn to_section(&self) -> Section {
        let mut section = Section::new();
        section.insert("project_name".into(), self.project_name.clone());
        section.insert("project_environment".into(), self.project_environment.clone());
        section.insert("role_arn".into(), self.role_arn.clone());
        section.insert("role_name".into(), self.role_name.clone());
        section.insert("mfa_required".into(), self.mfa_required.to_string());
        if let Some(arn) = &self.mfa_device_arn {
            section.insert("mfa_device_arn".into(), arn.clone());
        }
        if let Some(duration) = &self.mfa_device_session_duration {
            section.insert("mfa_device_session_duration".into(), duration.clone());
        }
        section
    }
}

impl SwitcherStore {
    /// All role definitions.
    ///
    /// # Errors
    ///
    /// Returns [`SwitcherError::MalformedStore`] if the file cannot be decoded
    /// or a project section lacks a required field.
    pub async fn projects(&self) -> Result<Projects> {
        Ok(self.load().await?.projects)
    }

    /// The role definition for `project`/`environment`.
    ///
    /// # Errors
    ///
    /// Returns [`SwitcherError::ProjectNotFound`] when no record is stored
    /// under `{project}-{environment}`, or any error of [`SwitcherStore::load`].
    pub async fn project(&self, project: &str, environment: &str) -> Result<ProjectEnvironmentRecord> {
        self.projects()
            .await?
            .remove(&format!("{project}-{environment}"))
            .ok_or_else(|| SwitcherError::ProjectNotFound {
                project: project.to_string(),
                environment: environment.to_string(),
            })
    }

    /// Inserts `record`, replacing whatever was stored under its key.
    pub async fn upsert_project(
        &self,
        record: ProjectEnvironmentRecord,
    ) -> Result<Option<ProjectEnvironmentRecord>> {
        let mut contents = self.load().await?;
        let key = record.key();
        let replaced = contents.projects.insert(key.clone(), record);
        if let Some(old) = &replaced {
            warn!("Replaced role \"{}\" previously configured for {key}", old.role_name);
        }
        self.persist(&contents).await?;
        Ok(replaced)
    }

    /// Removes every section whose key contains `name` anywhere.
    ///
    /// This is a loose match: deleting `foo` also removes `foobar-dev` and the
    /// matching `session-...` sections.
    ///
    /// # Returns
    ///
    /// The removed keys, projects first.
    ///
    /// # Errors
    ///
    /// Returns [`SwitcherError::EmptyProjectName`] for an empty `name`, since
    /// it would match every section. Nothing is written in that case.
    pub async fn delete_by_project_substring(&self, name: &str) -> Result<Vec<String>> {
        if name.is_empty() {
            return Err(SwitcherError::EmptyProjectName);
        }
        let mut contents = self.load().await?;
        let mut removed = Vec::new();
        contents.projects.retain(|key, _| keep(key, key.contains(name), &mut removed));
        contents.sessions.retain(|key, _| keep(key, key.contains(name), &mut removed));
        self.finish_delete(&contents, name, removed).await
    }

    /// Removes the role definitions whose `project_name` equals `name`, along
    /// with their sessions. Returns the removed keys.
    pub async fn delete_by_project_name(&self, name: &str) -> Result<Vec<String>> {
        let mut contents = self.load().await?;
        let mut removed = Vec::new();
        contents
            .projects
            .retain(|key, record| keep(key, record.project_name == name, &mut removed));
        let session_keys: Vec<String> = removed
            .iter()
            .map(|key| format!("{SESSION_PREFIX}{key}"))
            .collect();
        contents
            .sessions
            .retain(|key, _| keep(key, session_keys.contains(key), &mut removed));
        self.finish_delete(&contents, name, removed).await
    }

    async fn finish_delete(
        &self,
        contents: &StoreContents,
        name: &str,
        removed: Vec<String>,
    ) -> Result<Vec<String>> {
        if removed.is_empty() {
            warn!("Nothing configured matches project \"{name}\"");
        } else {
            info!("Deleted {}", removed.join(", "));
        }
        self.persist(contents).await?;
        Ok(removed)
    }
}

fn keep(key: &str, matches: bool, removed: &mut Vec<String>) -> bool {
    if matches {
        removed.push(key.to_string());
    }
    !matches
}

/// Distinct project names, in key order.
pub fn project_names(projects: &Projects) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in projects.values() {
        if !names.contains(&record.project_name) {
            names.push(record.project_name.clone());
        }
    }
    names
}

/// Environments configured for `project`.
pub fn environments(projects: &Projects, project: &str) -> Vec<String> {
    projects
        .values()
        .filter(|r| r.project_name == project)
        .map(|r| r.project_environment.clone())
        .collect()
}

/// Roles configured for `project`/`environment`.
pub fn roles<'a>(
    projects: &'a Projects,
    project: &str,
    environment: &str,
) -> Vec<&'a ProjectEnvironmentRecord> {
    projects
        .values()
        .filter(|r| r.project_name == project && r.project_environment == environment)
        .collect()
}
