//! Tables printed by the listing commands.

use tabled::{
    Table,
    builder::Builder,
    settings::{Color, Style, object::Rows},
};

use crate::projects::Projects;

/// One row of the sessions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub name: String,
    pub remaining_time: String,
    pub active: bool,
}

fn finish(builder: Builder) -> Table {
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table
}

/// Every configured assumption with the command that performs it.
pub fn assumptions_table(projects: &Projects) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["assumptions", "command_to_run"]);
    for record in projects.values() {
        builder.push_record([
            format!(
                "{}/{}/{}",
                record.project_name, record.project_environment, record.role_name
            ),
            format!(
                "aws-sessions-switcher {} {} {}",
                record.project_name, record.project_environment, record.role_name
            ),
        ]);
    }
    finish(builder)
}

/// Live sessions with their remaining time and whether they are in effect.
pub fn sessions_table(rows: &[SessionRow]) -> Table {
    let mut builder = Builder::default();
    builder.push_record([
        "session_name",
        "remaining_time",
        "configured_to_be_used_with_aws_command",
    ]);
    for row in rows {
        builder.push_record([
            row.name.clone(),
            row.remaining_time.clone(),
            if row.active { "Yes" } else { "No" }.to_string(),
        ]);
    }
    finish(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::project;

    #[test]
    fn test_assumptions_table_lists_commands() {
        let mut projects = Projects::new();
        let record = project("acme", "prod", false);
        projects.insert(record.key(), record);

        let rendered = assumptions_table(&projects).to_string();
        assert!(rendered.contains("acme/prod/admin"));
        assert!(rendered.contains("aws-sessions-switcher acme prod admin"));
    }

    #[test]
    fn test_sessions_table_marks_active_row() {
        let rows = [
            SessionRow {
                name: "session-acme-prod".into(),
                remaining_time: "0h 59m 59s".into(),
                active: true,
            },
            SessionRow {
                name: "session-acme-dev".into(),
                remaining_time: "0h 10m 0s".into(),
                active: false,
            },
        ];

        let rendered = sessions_table(&rows).to_string();
        assert!(rendered.contains("session-acme-prod"));
        assert!(rendered.contains("0h 59m 59s"));
        assert!(rendered.contains("Yes"));
        assert!(rendered.contains("No"));
    }
}
