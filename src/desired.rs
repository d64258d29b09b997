//! Desired-state CSV parser
//!
//! The input file has a header row followed by `username, role, pattern`
//! rows. Fields are trimmed. Rows accumulate per user; a repeated
//! `(username, pattern)` pair keeps its first position but takes the role of
//! the last row.

use crate::error::ConfigError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const FIELDS_PER_ROW: usize = 3;

/// One data row of the input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRow {
    /// 1-based line number in the file
    pub line: u64,
    pub username: String,
    pub role: String,
    pub pattern: String,
}

/// A pattern and the role granted on every project it matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pub pattern: String,
    pub role: String,
}

/// All rules for one user, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRules {
    pub username: String,
    pub rules: Vec<PatternRule>,
}

/// `username -> pattern -> role`, iterated in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    users: Vec<UserRules>,
}

impl DesiredState {
    pub fn from_rows(rows: &[DesiredRow]) -> Self {
        let mut state = Self::default();
        for row in rows {
            state.insert(&row.username, &row.pattern, &row.role);
        }
        state
    }

    /// Record that `username` gets `role` on projects matching `pattern`
    pub fn insert(&mut self, username: &str, pattern: &str, role: &str) {
        let index = match self.users.iter().position(|u| u.username == username) {
            Some(index) => index,
            None => {
                self.users.push(UserRules {
                    username: username.to_string(),
                    rules: Vec::new(),
                });
                self.users.len() - 1
            }
        };
        let rules = &mut self.users[index].rules;

        match rules.iter_mut().find(|r| r.pattern == pattern) {
            Some(rule) => rule.role = role.to_string(),
            None => rules.push(PatternRule {
                pattern: pattern.to_string(),
                role: role.to_string(),
            }),
        }
    }

    pub fn users(&self) -> impl Iterator<Item = &UserRules> {
        self.users.iter()
    }

    pub fn get(&self, username: &str) -> Option<&UserRules> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Read every data row of the CSV file at `path`
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<DesiredRow>, ConfigError> {
    let file = File::open(path.as_ref())?;
    parse_rows(file)
}

/// Parse rows from any reader; the first record is treated as the header
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<DesiredRow>, ConfigError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != FIELDS_PER_ROW {
            return Err(ConfigError::MalformedRow {
                line,
                found: record.len(),
            });
        }

        rows.push(DesiredRow {
            line,
            username: record[0].to_string(),
            role: record[1].to_string(),
            pattern: record[2].to_string(),
        });
    }

    Ok(rows)
}
