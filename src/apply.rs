//! Remote writer
//!
//! Sends one membership update per user, strictly in order. A failed update
//! is recorded and the next user is processed. Administrators, whose roles
//! the server refuses to change, are reported separately from failures.

use crate::error::WriteError;
use crate::ptai::Session;
use crate::reconcile::ReconciledUser;
use tracing::{debug, info};

/// Outcome of the write phase
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<WriteError>,
    /// Users the server refused to change because they are administrators
    pub administrators: Vec<String>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub async fn apply(session: &Session, users: &[ReconciledUser]) -> ApplyReport {
    let mut report = ApplyReport::default();

    for user in users {
        match session.update_membership(&user.update).await {
            Ok(()) => {
                info!(user = %user.user_name, roles = user.update.roles.len(), "Membership updated");
                report.succeeded.push(user.user_name.clone());
            }
            Err(source) if source.is_administrator_refusal() => {
                info!(user = %user.user_name, "Skipped administrator");
                report.administrators.push(user.user_name.clone());
            }
            Err(source) => {
                debug!(user = %user.user_name, error = %source, "Membership update failed");
                report.failed.push(WriteError {
                    user: user.user_name.clone(),
                    source,
                });
            }
        }
    }

    report
}
