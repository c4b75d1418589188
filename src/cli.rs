//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, builder::NonEmptyStringValueParser};

use crate::config::{DEFAULT_CONFIG_FILENAME, DEFAULT_REGION};

/// Switch between multiple AWS environments.
///
/// Role definitions live in `~/.aws/sessions_switcher`. Assuming a role stores
/// the temporary credentials there as a session and copies them into the
/// `[default]` profile of the AWS credentials file. Long-term keys for a
/// project are read from the `[aws-sessions-switcher-<project>]` profile.
///
/// Run `aws-sessions-switcher <project> <environment> <role>` to assume a role.
#[derive(Parser)]
#[command(name = "aws-sessions-switcher", author, version, about)]
pub struct Args {
    /// Lists all the role assumptions that you can make
    #[arg(short, long)]
    pub list: bool,

    /// Path to AWS credentials file [default: ~/.aws/credentials]
    #[arg(short, long, global = true, env = "AWS_SHARED_CREDENTIALS_FILE")]
    pub credentials_path: Option<PathBuf>,

    /// File name of the project/session store under ~/.aws
    #[arg(
        long,
        global = true,
        env = "AWS_SESSIONS_SWITCHER_CONFIG_FILENAME",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    pub config_filename: String,

    /// Full path of the project/session store (overrides --config-filename)
    #[arg(long, global = true, env = "AWS_SESSIONS_SWITCHER_CONFIG_PATH")]
    pub config_path: Option<PathBuf>,

    /// Region used for STS calls
    #[arg(long, global = true, env = "AWS_SESSIONS_SWITCHER_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Configure aws-sessions-switcher for initial run
    Configure,

    /// Manage project configurations
    Projects {
        #[command(subcommand)]
        action: Option<ProjectsAction>,
    },

    /// List environments of one project, or of all projects
    #[command(visible_alias = "environments")]
    Env {
        /// Name of the project
        #[arg(short = 'n', long)]
        project_name: Option<String>,
    },

    /// List active sessions, or switch between them
    Sessions {
        /// Only show sessions of this project
        #[arg(short = 'n', long)]
        project_name: Option<String>,

        #[command(subcommand)]
        action: Option<SessionsAction>,
    },

    /// Delete the project/session store
    Reset,

    // <project> [<environment> [<role>]]
    #[command(external_subcommand)]
    Assume(Vec<String>),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ProjectsAction {
    /// List all configured projects
    #[command(name = "ls", visible_alias = "list")]
    List,

    /// Add a new project configuration
    Add,

    /// Delete a project configuration
    Delete {
        /// Name of the project to be deleted
        #[arg(short = 'n', long, value_parser = NonEmptyStringValueParser::new())]
        project_name: String,

        /// Only delete sections whose project name equals the given name,
        /// instead of every section containing it
        #[arg(long)]
        exact: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionsAction {
    /// Make a session the `[default]` credentials
    Switch {
        /// Session to switch to; prompts with a menu when omitted
        session_name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("aws-sessions-switcher").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_path_is_an_assumption() {
        let args = parse(&["acme", "prod", "admin"]);
        assert_eq!(
            args.command,
            Some(Command::Assume(vec!["acme".into(), "prod".into(), "admin".into()]))
        );
    }

    #[test]
    fn test_projects_delete() {
        let args = parse(&["projects", "delete", "-n", "acme", "--exact"]);
        assert_eq!(
            args.command,
            Some(Command::Projects {
                action: Some(ProjectsAction::Delete {
                    project_name: "acme".into(),
                    exact: true,
                    yes: false,
                })
            })
        );
    }

    #[test]
    fn test_projects_delete_rejects_empty_name() {
        let parsed = Args::try_parse_from(["aws-sessions-switcher", "projects", "delete", "-n", ""]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_environments_alias_and_sessions_switch() {
        let args = parse(&["environments", "-n", "acme"]);
        assert_eq!(
            args.command,
            Some(Command::Env {
                project_name: Some("acme".into())
            })
        );

        let args = parse(&["sessions", "switch", "session-acme-prod"]);
        assert_eq!(
            args.command,
            Some(Command::Sessions {
                project_name: None,
                action: Some(SessionsAction::Switch {
                    session_name: Some("session-acme-prod".into())
                }),
            })
        );
    }

    #[test]
    fn test_no_arguments_lists() {
        let args = parse(&[]);
        assert!(args.command.is_none());
        assert!(!args.list);
        assert!(parse(&["-l"]).list);
    }
}
