//! Reconciliation results

use crate::ptai::types::MembershipUpdate;
use std::fmt;

/// Recoverable problem found while reconciling; the entry is left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Username in the file has no account on the server
    UnknownUser { user: String },
    /// Role in the file is not in the server's role catalog
    UnknownRole { user: String, role: String },
    /// Every row for the user was dropped; the update clears all their roles
    NoValidRoles { user: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::UnknownUser { user } => write!(f, "user {} not found", user),
            ValidationWarning::UnknownRole { user, role } => {
                write!(f, "user {} has unknown role {}", user, role)
            }
            ValidationWarning::NoValidRoles { user } => {
                write!(f, "user {} has no valid roles", user)
            }
        }
    }
}

/// Project-level change of a role the user already holds and keeps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDelta {
    pub role: String,
    /// Project names the role gains
    pub granted: Vec<String>,
    /// Project names the role loses
    pub revoked: Vec<String>,
    /// The role currently covers all projects and will not after the update
    pub all_projects_revoked: bool,
}

impl RoleDelta {
    pub fn is_unchanged(&self) -> bool {
        self.granted.is_empty() && self.revoked.is_empty() && !self.all_projects_revoked
    }
}

/// Replacement membership computed for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledUser {
    pub user_name: String,
    pub update: MembershipUpdate,
    /// The user holds no roles besides auto-set ones yet
    pub is_new: bool,
    /// Roles the user holds now (not auto-set) that the update drops
    pub revoked: Vec<String>,
    /// Changes to kept roles, in update order
    pub deltas: Vec<RoleDelta>,
}

impl ReconciledUser {
    /// The update would leave the user without any tool-managed role
    pub fn clears_all_roles(&self) -> bool {
        self.update.roles.is_empty()
    }

    /// Something the user holds today goes away
    pub fn revokes_anything(&self) -> bool {
        !self.revoked.is_empty()
            || self
                .deltas
                .iter()
                .any(|d| !d.revoked.is_empty() || d.all_projects_revoked)
    }
}

/// Output of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// One entry per affected user, in input order
    pub users: Vec<ReconciledUser>,
    pub warnings: Vec<ValidationWarning>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn find(&self, user_name: &str) -> Option<&ReconciledUser> {
        self.users.iter().find(|u| u.user_name == user_name)
    }
}
