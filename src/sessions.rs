//! Temporary credentials obtained by earlier role assumptions.
//!
//! Listing sessions prunes every expired one from the store as a side effect,
//! so a session that has expired is never returned, switched to or displayed.

use std::collections::BTreeMap;

use log::info;

use crate::{
    codec::Section,
    credentials::CredentialsFile,
    error::{Result, SwitcherError},
    expiry,
    store::SwitcherStore,
};

/// One set of temporary credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_session_token: String,
    /// Copy of `aws_session_token` under its legacy name
    pub aws_security_token: String,
    /// Local time in [`expiry::EXPIRATION_FORMAT`]
    pub expiration: String,
}

impl SessionRecord {
    /// Whether the session has passed its expiration (or has none).
    pub fn is_expired(&self) -> bool {
        expiry::is_expired(&self.expiration)
    }

    /// Time left, or `Expired`.
    pub fn remaining_time(&self) -> String {
        expiry::remaining_time(&self.expiration)
    }

    /// Whether the credential fields equal the fields of `section`.
    pub fn matches(&self, section: &Section) -> bool {
        let field = |name: &str| section.get(name).map(String::as_str);
        field("aws_access_key_id") == Some(self.aws_access_key_id.as_str())
            && field("aws_secret_access_key") == Some(self.aws_secret_access_key.as_str())
            && field("aws_session_token") == Some(self.aws_session_token.as_str())
    }

    pub(crate) fn from_section(section: &Section) -> Self {
        let field = |name: &str| section.get(name).cloned().unwrap_or_default();
        let aws_session_token = field("aws_session_token");
        let aws_security_token = section
            .get("aws_security_token")
            .cloned()
            .unwrap_or_else(|| aws_session_token.clone());

        Self {
            aws_access_key_id: field("aws_access_key_id"),
            aws_secret_access_key: field("aws_secret_access_key"),
            aws_session_token,
            aws_security_token,
            expiration: field("expiration"),
        }
    }

    pub(crate) fn to_section(&self) -> Section {
        [
            ("aws_access_key_id", &self.aws_access_key_id),
            ("aws_secret_access_key", &self.aws_secret_access_key),
            ("aws_session_token", &self.aws_session_token),
            ("aws_security_token", &self.aws_security_token),
            ("expiration", &self.expiration),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }
}

/// Result of listing sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSessions {
    /// Live sessions keyed by `session-{project}-{environment}`
    pub sessions: BTreeMap<String, SessionRecord>,
    /// Keys removed from the store because they had expired
    pub pruned: Vec<String>,
}

impl SwitcherStore {
    /// Live sessions. Expired ones are deleted from the store; the file is
    /// only rewritten when something was deleted.
    ///
    /// A session whose `expiration` is missing or unparsable counts as
    /// expired. Calling this twice in a row leaves the file unchanged the
    /// second time.
    ///
    /// # Returns
    ///
    /// The remaining sessions and the keys pruned by this call.
    ///
    /// # Errors
    ///
    /// Any error of [`SwitcherStore::load`], or [`SwitcherError::File`] when
    /// writing the pruned store back fails.
    pub async fn list_active(&self) -> Result<ActiveSessions> {
        let mut contents = self.load().await?;

        let mut pruned = Vec::new();
        contents.sessions.retain(|key, session| {
            let expired = session.is_expired();
            if expired {
                pruned.push(key.clone());
            }
            !expired
        });

        if !pruned.is_empty() {
            for key in &pruned {
                info!("Pruned expired session {key}");
            }
            self.persist(&contents).await?;
        }

        Ok(ActiveSessions {
            sessions: contents.sessions,
            pruned,
        })
    }

    /// Stores `record` under `key`, replacing any previous session there.
    ///
    /// # Errors
    ///
    /// Any error of [`SwitcherStore::load`] or [`SwitcherStore::persist`].
    pub async fn save_session(&self, key: &str, record: SessionRecord) -> Result<()> {
        let mut contents = self.load().await?;
        contents.sessions.insert(key.to_string(), record);
        self.persist(&contents).await
    }

    /// Copies the live session `key` into the `[default]` profile of
    /// `credentials`.
    ///
    /// Expired sessions are pruned first, so an expired `key` is reported the
    /// same way as an unknown one.
    ///
    /// # Arguments
    ///
    /// * `key` - Session name, `session-{project}-{environment}`
    /// * `credentials` - Shared credentials file whose `[default]` is replaced
    ///
    /// # Errors
    ///
    /// - [`SwitcherError::SessionNotFound`] if `key` is absent or expired;
    ///   the credentials file is left untouched
    /// - [`SwitcherError::File`] / [`SwitcherError::MalformedStore`] if either
    ///   file cannot be read or written
    pub async fn activate(&self, key: &str, credentials: &CredentialsFile) -> Result<SessionRecord> {
        let session = self
            .list_active()
            .await?
            .sessions
            .remove(key)
            .ok_or_else(|| SwitcherError::SessionNotFound(key.to_string()))?;

        credentials.set_active(&session).await?;
        info!("Switched to => {key}");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::test_support::{expired_session, live_session, project};

    #[test]
    fn test_security_token_defaults_to_session_token() {
        let mut section = live_session("AK").to_section();
        section.remove("aws_security_token");
        let record = SessionRecord::from_section(&section);
        assert_eq!(record.aws_security_token, record.aws_session_token);
    }

    #[test]
    fn test_missing_expiration_is_expired() {
        let mut section = live_session("AK").to_section();
        section.remove("expiration");
        assert!(SessionRecord::from_section(&section).is_expired());
    }

    #[tokio::test]
    async fn test_list_prunes_expired_sessions() {
        let dir = tempdir().unwrap();
        let store = SwitcherStore::new(dir.path().join("store"));
        store.upsert_project(project("acme", "prod", false)).await.unwrap();
        store.save_session("session-acme-prod", live_session("LIVE")).await.unwrap();
        store.save_session("session-acme-dev", expired_session("OLD")).await.unwrap();

        let active = store.list_active().await.unwrap();

        assert_eq!(active.sessions.keys().collect::<Vec<_>>(), ["session-acme-prod"]);
        assert_eq!(active.pruned, ["session-acme-dev"]);

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert!(!on_disk.contains("session-acme-dev"));
        assert!(on_disk.contains("session-acme-prod"));
        assert!(on_disk.contains("[acme-prod]"));
    }

    #[tokio::test]
    async fn test_listing_twice_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = SwitcherStore::new(dir.path().join("store"));
        store.save_session("session-acme-prod", live_session("A")).await.unwrap();
        store.save_session("session-foo-dev", live_session("B")).await.unwrap();

        let first = store.list_active().await.unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();
        let second = store.list_active().await.unwrap();
        let after = std::fs::read_to_string(store.path()).unwrap();

        assert_eq!(first, second);
        assert!(second.pruned.is_empty());
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_session() {
        let dir = tempdir().unwrap();
        let store = SwitcherStore::new(dir.path().join("store"));
        store.save_session("session-acme-prod", live_session("FIRST")).await.unwrap();
        store.save_session("session-acme-prod", live_session("SECOND")).await.unwrap();

        let active = store.list_active().await.unwrap();
        assert_eq!(active.sessions.len(), 1);
        assert_eq!(active.sessions["session-acme-prod"].aws_access_key_id, "SECOND");
    }

    #[tokio::test]
    async fn test_activate_copies_into_default_profile() {
        let dir = tempdir().unwrap();
        let store = SwitcherStore::new(dir.path().join("store"));
        let credentials = CredentialsFile::new(dir.path().join("credentials"));
        std::fs::write(
            credentials.path(),
            "[default]\naws_access_key_id = OLD\n\n[aws-sessions-switcher-acme]\naws_access_key_id = BASE\naws_secret_access_key = BASESECRET\n",
        )
        .unwrap();
        let session = live_session("NEW");
        store.save_session("session-acme-prod", session.clone()).await.unwrap();

        let activated = store.activate("session-acme-prod", &credentials).await.unwrap();

        assert_eq!(activated, session);
        assert!(credentials.is_active(&session).await.unwrap());
        let base = credentials.base_credentials("acme").await.unwrap();
        assert_eq!(base.access_key_id, "BASE");
    }

    #[tokio::test]
    async fn test_activate_unknown_or_expired_session_fails() {
        let dir = tempdir().unwrap();
        let store = SwitcherStore::new(dir.path().join("store"));
        let credentials = CredentialsFile::new(dir.path().join("credentials"));
        store.save_session("session-acme-dev", expired_session("OLD")).await.unwrap();

        for key in ["session-acme-dev", "session-missing-prod"] {
            let err = store.activate(key, &credentials).await.unwrap_err();
            assert!(matches!(err, SwitcherError::SessionNotFound(_)));
        }
        assert!(!credentials.path().exists());
    }
}
