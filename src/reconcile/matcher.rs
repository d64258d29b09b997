//! Project name matching
//!
//! Patterns are anchored at the start of the project name only, so `^Foo`
//! and `Foo` both match `Foobar`. Callers that want an exact match must end
//! the pattern with `$`.

use crate::desired::DesiredRow;
use crate::error::PatternError;
use crate::ptai::types::{Project, ProjectRef};
use regex::Regex;

/// Compiled start-anchored project name pattern
#[derive(Debug, Clone)]
pub struct ProjectMatcher {
    source: String,
    regex: Regex,
}

impl ProjectMatcher {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|e| PatternError {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Pattern as written in the input file
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, project_name: &str) -> bool {
        self.regex.is_match(project_name)
    }

    /// Matching projects, in server order
    pub fn matching_projects(&self, projects: &[Project]) -> Vec<ProjectRef> {
        projects
            .iter()
            .filter(|p| self.matches(&p.name))
            .map(ProjectRef::from)
            .collect()
    }
}

/// Projects matched by one input row, for `--regcheck`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternReport {
    pub pattern: String,
    pub projects: Vec<String>,
}

/// Evaluate every row's pattern against the project list, in file order
pub fn check_patterns(
    rows: &[DesiredRow],
    projects: &[Project],
) -> Result<Vec<PatternReport>, PatternError> {
    rows.iter()
        .map(|row| {
            let matcher = ProjectMatcher::new(&row.pattern)?;
            Ok(PatternReport {
                pattern: row.pattern.clone(),
                projects: matcher
                    .matching_projects(projects)
                    .into_iter()
                    .map(|p| p.name)
                    .collect(),
            })
        })
        .collect()
}
