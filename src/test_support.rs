//! Fixtures and test doubles shared by unit tests.

use std::{collections::VecDeque, io, sync::Mutex};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};

use crate::{
    error::{Result, SwitcherError},
    projects::ProjectEnvironmentRecord,
    prompt::{Prompter, Validator},
    sessions::SessionRecord,
    sts::{AssumeRoleRequest, CredentialProvider, TemporaryCredentials},
};

pub fn project(name: &str, environment: &str, mfa_required: bool) -> ProjectEnvironmentRecord {
    ProjectEnvironmentRecord {
        project_name: name.to_string(),
        project_environment: environment.to_string(),
        role_arn: format!("arn:aws:iam::123456789012:role/{name}-{environment}"),
        role_name: "admin".to_string(),
        mfa_required,
        mfa_device_arn: mfa_required.then(|| "arn:aws:iam::123456789012:mfa/me".to_string()),
        mfa_device_session_duration: None,
    }
}

fn session(access_key_id: &str, expiration: &str) -> SessionRecord {
    SessionRecord {
        aws_access_key_id: access_key_id.to_string(),
        aws_secret_access_key: format!("{access_key_id}-secret"),
        aws_session_token: format!("{access_key_id}-token"),
        aws_security_token: format!("{access_key_id}-token"),
        expiration: expiration.to_string(),
    }
}

pub fn live_session(access_key_id: &str) -> SessionRecord {
    session(access_key_id, "2999-01-01 00:00:00")
}

pub fn expired_session(access_key_id: &str) -> SessionRecord {
    session(access_key_id, "2001-01-01 00:00:00")
}

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Answer {
    Text(String),
    Confirm(bool),
    Select(Option<String>),
}

impl Answer {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// [`Prompter`] replaying a fixed list of answers and recording each prompt.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, format!("no answer scripted for {prompt}"))
                .into()
        })
    }
}

fn unexpected(prompt: &str, answer: Answer) -> SwitcherError {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("scripted {answer:?} does not fit {prompt}"),
    )
    .into()
}

impl Prompter for ScriptedPrompter {
    fn ask_text(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validator: Validator,
    ) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(text) => {
                let text = match (text.is_empty(), default) {
                    (true, Some(default)) => default.to_string(),
                    _ => text,
                };
                if let Err(message) = validator(&text) {
                    return Err(io::Error::new(io::ErrorKind::InvalidInput, message).into());
                }
                Ok(text)
            }
            other => Err(unexpected(prompt, other)),
        }
    }

    fn ask_confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Confirm(value) => Ok(value),
            other => Err(unexpected(prompt, other)),
        }
    }

    fn ask_select(&mut self, prompt: &str, _choices: &[String]) -> Result<Option<String>> {
        match self.next(prompt)? {
            Answer::Select(value) => Ok(value),
            other => Err(unexpected(prompt, other)),
        }
    }
}

/// In-memory [`CredentialProvider`] that records every request.
#[derive(Debug)]
pub struct MockProvider {
    pub requests: Mutex<Vec<AssumeRoleRequest>>,
    /// Credentials returned on success
    pub credentials: TemporaryCredentials,
    /// Error message to fail with instead
    pub error: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            credentials: TemporaryCredentials {
                access_key_id: "ASIAMOCK".to_string(),
                secret_access_key: "mock-secret".to_string(),
                session_token: "mock-token".to_string(),
                expiration: Utc::now() + TimeDelta::hours(1),
            },
            error: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn requests(&self) -> Vec<AssumeRoleRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialProvider for MockProvider {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<TemporaryCredentials> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.error {
            Some(message) => Err(SwitcherError::AssumeRole(message.clone())),
            None => Ok(self.credentials.clone()),
        }
    }
}
