//! Export of the current memberships as an input file
//!
//! Every (user, role, project) triple becomes one row whose pattern matches
//! exactly that project name, so feeding the file back reproduces the
//! current state. Auto-set roles are left out.

use crate::error::ConfigError;
use crate::ptai::types::User;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 3] = ["username", "role", "pattern"];

/// Matches any project name
const ALL_PROJECTS_PATTERN: &str = "^.*$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub username: String,
    pub role: String,
    pub pattern: String,
}

/// Pattern matching exactly `project_name`
pub fn exact_pattern(project_name: &str) -> String {
    format!("^{}$", regex::escape(project_name))
}

pub fn export_rows(users: &[User]) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for user in users {
        for role in user.roles.iter().filter(|r| !r.auto_set) {
            if role.all_projects {
                rows.push(ExportRow {
                    username: user.name.clone(),
                    role: role.name.clone(),
                    pattern: ALL_PROJECTS_PATTERN.to_string(),
                });
                continue;
            }
            for project in &role.projects {
                rows.push(ExportRow {
                    username: user.name.clone(),
                    role: role.name.clone(),
                    pattern: exact_pattern(&project.name),
                });
            }
        }
    }
    rows
}

pub fn write_rows<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ConfigError> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for row in rows {
        csv.write_record([&row.username, &row.role, &row.pattern])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the export to `path`, returning the number of data rows
pub fn export_to_path(users: &[User], path: impl AsRef<Path>) -> Result<usize, ConfigError> {
    let rows = export_rows(users);
    write_rows(&rows, File::create(path.as_ref())?)?;
    Ok(rows.len())
}
