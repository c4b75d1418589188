//! Role assumption workflow.
//!
//! Assuming a role runs one linear sequence:
//! 1. Look up the role definition for the project and environment
//! 2. Read the project's long-term keys from `[aws-sessions-switcher-{project}]`
//! 3. Ask for an MFA code when the role requires one
//! 4. Call `AssumeRole` with session name `session-{project}-{environment}`
//! 5. Store the temporary credentials as that session and copy them into
//!    the `[default]` profile
//!
//! Nothing is written unless step 4 returns complete credentials.

use log::info;

use crate::{
    config::session_key,
    credentials::CredentialsFile,
    error::{Result, SwitcherError},
    expiry,
    prompt::{self, Prompter},
    sessions::SessionRecord,
    store::SwitcherStore,
    sts::{AssumeRoleRequest, CredentialProvider, MfaToken},
};

/// Runs role assumptions against one store, credentials file and provider.
pub struct RoleAssumer<'a> {
    store: &'a SwitcherStore,
    credentials: &'a CredentialsFile,
    provider: &'a dyn CredentialProvider,
}

impl<'a> RoleAssumer<'a> {
    pub fn new(
        store: &'a SwitcherStore,
        credentials: &'a CredentialsFile,
        provider: &'a dyn CredentialProvider,
    ) -> Self {
        Self {
            store,
            credentials,
            provider,
        }
    }

    /// Assumes the role configured for `project`/`environment` and makes the
    /// resulting session the active one.
    ///
    /// When `role` is given it must match the configured role name.
    ///
    /// # Errors
    ///
    /// - [`SwitcherError::ProjectNotFound`] / [`SwitcherError::RoleNotFound`]
    ///   when nothing matches
    /// - [`SwitcherError::BaseCredentialsMissing`] when the project's
    ///   long-term keys are not in the credentials file
    /// - [`SwitcherError::AssumeRole`] / [`SwitcherError::EmptyCredentials`]
    ///   when the remote call fails; nothing is written in that case
    pub async fn assume(
        &self,
        prompter: &mut dyn Prompter,
        project: &str,
        environment: &str,
        role: Option<&str>,
    ) -> Result<(String, SessionRecord)> {
        let record = self.store.project(project, environment).await?;
        if let Some(role) = role.filter(|r| *r != record.role_name) {
            return Err(SwitcherError::RoleNotFound {
                project: project.to_string(),
                environment: environment.to_string(),
                role: role.to_string(),
            });
        }

        info!(
            "Attempting to assume role: \"{}\" using ARN: \"{}\" on project: {project}",
            record.role_name, record.role_arn
        );

        let duration_seconds = record.duration_seconds()?;
        let base = self.credentials.base_credentials(project).await?;

        let mfa = if record.mfa_required {
            let serial_number = record
                .mfa_device_arn
                .clone()
                .ok_or_else(|| SwitcherError::MissingMfaDevice(record.key()))?;
            let token_code = prompter.ask_text(
                &format!("MFA TOKEN for device {serial_number}:"),
                None,
                prompt::numbers_only,
            )?;
            Some(MfaToken {
                serial_number,
                token_code,
            })
        } else {
            None
        };

        let key = session_key(project, environment);
        let request = AssumeRoleRequest {
            base,
            role_arn: record.role_arn.clone(),
            session_name: key.clone(),
            duration_seconds,
            mfa,
        };
        let temporary = self.provider.assume_role(&request).await?;

        if [
            &temporary.access_key_id,
            &temporary.secret_access_key,
            &temporary.session_token,
        ]
        .iter()
        .any(|field| field.is_empty())
        {
            return Err(SwitcherError::EmptyCredentials(format!(
                "response for {key} lacks credential fields"
            )));
        }

        let session = SessionRecord {
            aws_access_key_id: temporary.access_key_id,
            aws_secret_access_key: temporary.secret_access_key,
            aws_security_token: temporary.session_token.clone(),
            aws_session_token: temporary.session_token,
            expiration: expiry::format_expiration(temporary.expiration),
        };

        self.store.save_session(&key, session.clone()).await?;
        self.store.activate(&key, self.credentials).await?;
        info!("Success! Credentials expire at: {}", session.expiration);

        Ok((key, session))
    }
}
