//! PT AI API request and response types
//!
//! Only the fields this tool reads are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Project as returned by `GET api/projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

/// Project reference inside a role assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: i64,
    pub name: String,
}

impl From<&Project> for ProjectRef {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
        }
    }
}

/// Entry of the role catalog (`GET api/auth/roles`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
}

/// A role held by a user on a set of projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    #[serde(alias = "roleName")]
    pub name: String,

    /// Granted by the server itself; never emitted by this tool
    #[serde(default)]
    pub auto_set: bool,

    #[serde(default)]
    pub all_projects: bool,

    #[serde(default)]
    pub projects: Vec<ProjectRef>,
}

impl RoleAssignment {
    /// Empty, tool-managed assignment for `name`
    pub fn managed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto_set: false,
            all_projects: false,
            projects: Vec::new(),
        }
    }
}

/// User membership as returned by `GET api/auth/membership`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "userId")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<RoleAssignment>,
}

/// Server state read once at the start of a run and never refreshed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    pub projects: Vec<Project>,
    pub users: Vec<User>,
    pub roles: Vec<Role>,
}

/// Body of `PUT api/auth/membership`.
///
/// Replaces the user's whole role set; any role not listed is revoked by the
/// server, except auto-set ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipUpdate {
    pub user_id: i64,
    pub roles: Vec<RoleAssignment>,
}

/// Body of `POST api/auth/userLogin`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub login: &'a str,
    pub password: &'a str,
    pub remember_me: bool,
}

/// Token pair returned by both login endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expired_at: Option<String>,
}
