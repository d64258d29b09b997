//! Human-readable rendering of a reconciliation and of the write results

use crate::apply::ApplyReport;
use crate::reconcile::{PatternReport, Reconciliation, ValidationWarning};
use std::fmt::Write;

/// `WARN:` lines for every validation warning, in the order found
pub fn render_warnings(warnings: &[ValidationWarning]) -> String {
    let mut out = String::new();
    for warning in warnings {
        let _ = writeln!(out, "WARN: {}", warning);
    }
    out
}

/// Per-user listing of the role sets about to be written
pub fn render_changes(reconciliation: &Reconciliation) -> String {
    let mut out = String::from("====== Project roles to apply ======\n");

    for user in &reconciliation.users {
        if user.is_new {
            let _ = writeln!(out, "## {} (new)", user.user_name);
        } else {
            let _ = writeln!(out, "## {}", user.user_name);
        }

        if user.clears_all_roles() {
            let _ = writeln!(
                out,
                "!! {}: all non-auto-set roles will be REMOVED",
                user.user_name
            );
        }

        for role in &user.update.roles {
            if role.projects.is_empty() {
                let _ = writeln!(out, "{}: (no matching projects)", role.name);
            } else {
                let names: Vec<&str> = role.projects.iter().map(|p| p.name.as_str()).collect();
                let _ = writeln!(out, "{}: {}", role.name, names.join(", "));
            }
        }

        for delta in &user.deltas {
            for project in &delta.granted {
                let _ = writeln!(out, "+ {}: {} will be granted", delta.role, project);
            }
            for project in &delta.revoked {
                let _ = writeln!(out, "- {}: {} will be revoked", delta.role, project);
            }
            if delta.all_projects_revoked {
                let _ = writeln!(
                    out,
                    "- {}: access to all projects will be revoked",
                    delta.role
                );
            }
        }
        for role in &user.revoked {
            let _ = writeln!(out, "- {}: will be revoked", role);
        }
        out.push('\n');
    }

    out
}

/// `--regcheck` output: one line per input row
pub fn render_pattern_reports(reports: &[PatternReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let _ = writeln!(out, "{}: {}", report.pattern, report.projects.join(", "));
    }
    out
}

/// `WARN:` line per administrator, `ERR:` line per failed user, then a
/// summary line
pub fn render_report(report: &ApplyReport) -> String {
    let mut out = String::new();
    for user in &report.administrators {
        let _ = writeln!(out, "WARN: cannot assign roles to administrator {}", user);
    }
    for failure in &report.failed {
        let _ = writeln!(out, "ERR: {}", failure);
    }
    let _ = write!(
        out,
        "Done: {} updated, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    if !report.administrators.is_empty() {
        let _ = write!(out, ", {} skipped", report.administrators.len());
    }
    out.push('\n');
    out
}
