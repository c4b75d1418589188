//! Dispatch of parsed command-line arguments onto the stores.

use anyhow::{Result, bail};
use log::{info, warn};

use crate::{
    assume::RoleAssumer,
    cli::{Command, ProjectsAction, SessionsAction},
    collector,
    config::{Paths, base_profile_name, session_key},
    credentials::CredentialsFile,
    display::{self, SessionRow},
    projects,
    prompt::Prompter,
    store::SwitcherStore,
    sts::CredentialProvider,
};

/// Everything one invocation works against.
pub struct App<'a> {
    store: SwitcherStore,
    credentials: CredentialsFile,
    provider: &'a dyn CredentialProvider,
    prompter: &'a mut dyn Prompter,
}

impl<'a> App<'a> {
    pub fn new(
        paths: Paths,
        provider: &'a dyn CredentialProvider,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            store: SwitcherStore::new(paths.config),
            credentials: CredentialsFile::new(paths.credentials),
            provider,
            prompter,
        }
    }

    pub async fn run(&mut self, command: Option<Command>) -> Result<()> {
        match command {
            None => self.list_assumptions().await,
            Some(Command::Configure) => self.configure().await,
            Some(Command::Projects { action }) => match action {
                None | Some(ProjectsAction::List) => self.list_projects().await,
                Some(ProjectsAction::Add) => {
                    self.store.require()?;
                    self.add_project().await
                }
                Some(ProjectsAction::Delete {
                    project_name,
                    exact,
                    yes,
                }) => self.delete_project(&project_name, exact, yes).await,
            },
            Some(Command::Env { project_name }) => self.list_environments(project_name.as_deref()).await,
            Some(Command::Sessions {
                project_name,
                action,
            }) => match action {
                None => self.list_sessions(project_name.as_deref()).await,
                Some(SessionsAction::Switch { session_name }) => self.switch(session_name).await,
            },
            Some(Command::Reset) => self.reset().await,
            Some(Command::Assume(path)) => self.assume_path(&path).await,
        }
    }

    async fn list_assumptions(&self) -> Result<()> {
        self.store.require()?;
        let projects = self.store.projects().await?;
        if projects.is_empty() {
            warn!("No AWS role assumptions configured. Run `aws-sessions-switcher configure` to set up.");
        } else {
            println!("{}", display::assumptions_table(&projects));
        }
        Ok(())
    }

    async fn configure(&mut self) -> Result<()> {
        if self.store.exists() {
            bail!(
                "File already exists. Run `aws-sessions-switcher projects add` if you want to add a new project configuration"
            );
        }
        self.add_project().await
    }

    async fn add_project(&mut self) -> Result<()> {
        let record = collector::collect(&mut *self.prompter)?;
        let project = record.project_name.clone();
        self.store.upsert_project(record).await?;
        info!(
            "Note: Make sure to put your security credentials under \"{}\" section of your AWS Credentials",
            base_profile_name(&project)
        );
        Ok(())
    }

    async fn list_projects(&self) -> Result<()> {
        self.store.require()?;
        for name in projects::project_names(&self.store.projects().await?) {
            println!("- {name}");
        }
        Ok(())
    }

    async fn delete_project(&mut self, name: &str, exact: bool, yes: bool) -> Result<()> {
        self.store.require()?;
        let question = format!("Are you sure you want to delete project: [{name}]?");
        if !yes && !self.prompter.ask_confirm(&question, false)? {
            return Ok(());
        }
        if exact {
            self.store.delete_by_project_name(name).await?;
        } else {
            self.store.delete_by_project_substring(name).await?;
        }
        Ok(())
    }

    async fn list_environments(&self, project: Option<&str>) -> Result<()> {
        self.store.require()?;
        let all = self.store.projects().await?;
        match project {
            Some(project) => {
                for environment in projects::environments(&all, project) {
                    println!("- {environment}");
                }
            }
            None => {
                for key in all.keys() {
                    println!("- {key}");
                }
            }
        }
        Ok(())
    }

    /// Rows for the live sessions, limited to `project` when given.
    ///
    /// A project filter keeps only the session keys of that project's own
    /// environments, so `acme` does not pick up sessions of `acme-x`.
    async fn session_rows(&self, project: Option<&str>) -> Result<Vec<SessionRow>> {
        let wanted: Option<Vec<String>> = match project {
            Some(project) => Some(
                projects::environments(&self.store.projects().await?, project)
                    .iter()
                    .map(|environment| session_key(project, environment))
                    .collect(),
            ),
            None => None,
        };

        let mut rows = Vec::new();
        for (name, session) in self.store.list_active().await?.sessions {
            if wanted.as_ref().is_some_and(|keys| !keys.contains(&name)) {
                continue;
            }
            rows.push(SessionRow {
                remaining_time: session.remaining_time(),
                active: self.credentials.is_active(&session).await?,
                name,
            });
        }
        Ok(rows)
    }

    async fn list_sessions(&self, project: Option<&str>) -> Result<()> {
        self.store.require()?;
        let rows = self.session_rows(project).await?;

        if rows.is_empty() {
            warn!(
                "No active sessions present. Run `aws-sessions-switcher -l` to see all possible role assumptions you can make"
            );
            return Ok(());
        }

        println!("{}", display::sessions_table(&rows));
        println!(
            "Note: If `configured_to_be_used_with_aws_command` is No,\nrun `aws-sessions-switcher sessions switch` and select this session to activate it"
        );
        Ok(())
    }

    async fn switch(&mut self, session_name: Option<String>) -> Result<()> {
        self.store.require()?;
        let session_name = match session_name {
            Some(name) => name,
            None => {
                let choices: Vec<String> = self.store.list_active().await?.sessions.into_keys().collect();
                if choices.is_empty() {
                    warn!("No active sessions present");
                    return Ok(());
                }
                match self.prompter.ask_select("Select a session to switch to", &choices)? {
                    Some(name) => name,
                    None => bail!("No session name provided"),
                }
            }
        };
        self.store.activate(&session_name, &self.credentials).await?;
        Ok(())
    }

    async fn reset(&mut self) -> Result<()> {
        if !self.store.exists() {
            bail!("The file \"{}\" does not exist", self.store.path().display());
        }
        let question = format!(
            "This file => \"{}\" will be deleted. Are you sure you want to perform a reset?",
            self.store.path().display()
        );
        if self.prompter.ask_confirm(&question, false)? {
            self.store.remove().await?;
        }
        Ok(())
    }

    async fn assume_path(&mut self, path: &[String]) -> Result<()> {
        self.store.require()?;
        let all = self.store.projects().await?;

        match path {
            [project] => {
                let environments = projects::environments(&all, project);
                if environments.is_empty() {
                    bail!("Unknown project or command \"{project}\"");
                }
                for environment in environments {
                    println!("- {environment}");
                }
            }
            [project, environment] => {
                let roles = projects::roles(&all, project, environment);
                if roles.is_empty() {
                    bail!("No roles configured for {project}/{environment}");
                }
                for record in roles {
                    info!("{} => {}", record.role_name, record.role_arn);
                }
            }
            [project, environment, role] => {
                let assumer = RoleAssumer::new(&self.store, &self.credentials, self.provider);
                assumer
                    .assume(&mut *self.prompter, project, environment, Some(role.as_str()))
                    .await?;
                println!("- SUCCESS!");
            }
            _ => bail!("Expected <project> [<environment> [<role>]], got {}", path.join(" ")),
        }
        Ok(())
    }
}
