//! Project and session store.
//!
//! Project definitions and session credentials share one file. Sections named
//! `session-...` hold sessions and every other section holds a project
//! definition. That naming rule is applied here, once, when the file is
//! decoded; everything above this module works with the two typed collections
//! in [`StoreContents`].
//!
//! Nothing is cached between operations: each one reloads the file, changes
//! the typed contents and writes the whole file back. Two processes writing
//! concurrently race, and the last writer wins.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use log::{debug, info};
use tokio::fs;

use crate::{
    codec::{self, Sections},
    config::SESSION_PREFIX,
    error::{Result, SwitcherError},
    projects::ProjectEnvironmentRecord,
    sessions::SessionRecord,
};

/// Typed contents of the store file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreContents {
    /// Role definitions keyed by `{project}-{environment}`
    pub projects: BTreeMap<String, ProjectEnvironmentRecord>,
    /// Sessions keyed by `session-{project}-{environment}`
    pub sessions: BTreeMap<String, SessionRecord>,
}

impl StoreContents {
    fn from_sections(sections: Sections) -> std::result::Result<Self, String> {
        let mut contents = Self::default();
        for (name, fields) in sections {
            if name.starts_with(SESSION_PREFIX) {
                contents
                    .sessions
                    .insert(name, SessionRecord::from_section(&fields));
            } else {
                let record = ProjectEnvironmentRecord::from_section(&fields)
                    .map_err(|field| format!("section [{name}] is missing \"{field}\""))?;
                contents.projects.insert(name, record);
            }
        }
        Ok(contents)
    }

    fn to_sections(&self) -> Sections {
        let projects = self
            .projects
            .iter()
            .map(|(key, record)| (key.clone(), record.to_section()));
        let sessions = self
            .sessions
            .iter()
            .map(|(key, record)| (key.clone(), record.to_section()));
        projects.chain(sessions).collect()
    }
}

/// Handle on the project/session store file.
#[derive(Debug, Clone)]
pub struct SwitcherStore {
    path: PathBuf,
}

impl SwitcherStore {
    /// Creates a handle on the store at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Fails with [`SwitcherError::ConfigMissing`] unless the store file exists.
    ///
    /// Read commands call this first; writes create the file on demand.
    pub fn require(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(SwitcherError::ConfigMissing(self.path.clone()))
        }
    }

    /// Loads the store, creating an empty file if there is none.
    ///
    /// Sections are split into projects and sessions by their name. A session
    /// section missing fields still loads, with the missing fields empty.
    ///
    /// # Errors
    ///
    /// - [`SwitcherError::File`] if the file cannot be read, or cannot be
    ///   created when absent
    /// - [`SwitcherError::MalformedStore`] if the text does not decode or a
    ///   project section lacks `project_name`, `project_environment`,
    ///   `role_arn` or `role_name`
    pub async fn load(&self) -> Result<StoreContents> {
        if !self.exists() {
            debug!("Creating empty store at {}", self.path.display());
            codec::write_sections(&self.path, &Sections::new()).await?;
            return Ok(StoreContents::default());
        }

        let sections = codec::read_sections(&self.path).await?;
        StoreContents::from_sections(sections)
            .map_err(|reason| SwitcherError::malformed(&self.path, reason))
    }

    /// Replaces the store file with `contents`.
    ///
    /// # Errors
    ///
    /// Returns [`SwitcherError::File`] if the file or its parent directory
    /// cannot be written.
    pub async fn persist(&self, contents: &StoreContents) -> Result<()> {
        codec::write_sections(&self.path, &contents.to_sections()).await
    }

    /// Deletes the store file. Returns `false` if there was nothing to delete.
    pub async fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("The file \"{}\" is deleted", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SwitcherError::file(&self.path, e)),
        }
    }
}
