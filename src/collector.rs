//! Interactive collection of a new role definition.

use crate::{
    config::DEFAULT_SESSION_DURATION,
    error::Result,
    projects::ProjectEnvironmentRecord,
    prompt::{self, Prompter},
};

/// Asks for every field of a [`ProjectEnvironmentRecord`].
///
/// The MFA device and session duration are only asked for when MFA is required.
pub fn collect(prompter: &mut dyn Prompter) -> Result<ProjectEnvironmentRecord> {
    let project_name = prompter.ask_text("What's the project name?", None, prompt::not_empty)?;
    let project_environment =
        prompter.ask_text("Type the environment identifier?", None, prompt::not_empty)?;
    let role_arn = prompter.ask_text(
        "Type the ARN of the AWS Role, you want to assume?",
        None,
        prompt::any,
    )?;
    let role_name = prompter.ask_text("Give a name to this role:", None, prompt::not_empty)?;
    let mfa_required = prompter.ask_confirm("Is MFA Required?", false)?;

    let (mfa_device_arn, mfa_device_session_duration) = if mfa_required {
        let arn = prompter.ask_text("Type the ARN of the MFA device?", None, prompt::not_empty)?;
        let duration = prompter.ask_text(
            "Session duration in seconds?",
            Some(DEFAULT_SESSION_DURATION),
            prompt::numbers_only,
        )?;
        (Some(arn), Some(duration))
    } else {
        (None, None)
    };

    Ok(ProjectEnvironmentRecord {
        project_name,
        project_environment,
        role_arn,
        role_name,
        mfa_required,
        mfa_device_arn,
        mfa_device_session_duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Answer, ScriptedPrompter};

    #[test]
    fn test_collect_without_mfa() {
        let mut prompter = ScriptedPrompter::new([
            Answer::text("acme"),
            Answer::text("prod"),
            Answer::text("arn:aws:iam::123:role/X"),
            Answer::text("admin"),
            Answer::Confirm(false),
        ]);

        let record = collect(&mut prompter).unwrap();

        assert_eq!(record.key(), "acme-prod");
        assert_eq!(record.role_arn, "arn:aws:iam::123:role/X");
        assert!(!record.mfa_required);
        assert_eq!(record.mfa_device_arn, None);
        assert!(prompter.is_exhausted());
    }

    #[test]
    fn test_collect_with_mfa() {
        let mut prompter = ScriptedPrompter::new([
            Answer::text("acme"),
            Answer::text("prod"),
            Answer::text("arn:aws:iam::123:role/X"),
            Answer::text("admin"),
            Answer::Confirm(true),
            Answer::text("arn:aws:iam::123:mfa/me"),
            Answer::text("7200"),
        ]);

        let record = collect(&mut prompter).unwrap();

        assert!(record.mfa_required);
        assert_eq!(record.mfa_device_arn.as_deref(), Some("arn:aws:iam::123:mfa/me"));
        assert_eq!(record.duration_seconds().unwrap(), 7200);
        assert_eq!(record.to_section()["mfa_required"], "true");
    }
}
