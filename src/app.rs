//! Run orchestration
//!
//! Strictly sequential: snapshot, parse, reconcile, review, confirm, write.
//! Operator-facing text goes to the supplied writer so the whole flow can be
//! exercised against a mock server.

use crate::apply::{ApplyReport, apply};
use crate::auth::create_authenticator;
use crate::config::AppConfig;
use crate::desired::{DesiredState, read_rows};
use crate::error::Result;
use crate::export::export_to_path;
use crate::prompt::Prompter;
use crate::ptai::Session;
use crate::reconcile::{check_patterns, reconcile};
use crate::review::{
    confirm, render_changes, render_pattern_reports, render_report, render_warnings,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a sync run should do
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub csv_path: PathBuf,
    /// Only report which projects each pattern matches
    pub regcheck: bool,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
}

/// How a sync run ended. All variants are successful exits.
#[derive(Debug)]
pub enum Outcome {
    PatternsChecked(usize),
    NothingToApply,
    Declined,
    Applied(ApplyReport),
}

/// Check connectivity, then authenticate, prompting for missing credentials
pub async fn open_session(config: &AppConfig, prompter: &dyn Prompter) -> Result<Session> {
    let mut session = Session::new(&config.server)?;
    session.connect().await?;

    let authenticator = create_authenticator(&config.credentials, prompter)?;
    session.authenticate(authenticator.as_ref()).await?;
    Ok(session)
}

pub async fn sync_roles(
    session: &Session,
    options: &RunOptions,
    prompter: &dyn Prompter,
    out: &mut dyn Write,
) -> Result<Outcome> {
    if options.regcheck {
        let projects = session.list_projects().await?;
        let rows = read_rows(&options.csv_path)?;
        let reports = check_patterns(&rows, &projects)?;
        write!(out, "{}", render_pattern_reports(&reports))?;
        return Ok(Outcome::PatternsChecked(reports.len()));
    }

    let directory = session.fetch_directory().await?;
    let rows = read_rows(&options.csv_path)?;
    let desired = DesiredState::from_rows(&rows);
    info!(rows = rows.len(), users = desired.len(), "Parsed desired state");

    let reconciliation = reconcile(&desired, &directory)?;
    write!(out, "{}", render_warnings(&reconciliation.warnings))?;

    if reconciliation.is_empty() {
        writeln!(out, "Nothing to apply")?;
        return Ok(Outcome::NothingToApply);
    }

    write!(out, "{}", render_changes(&reconciliation))?;
    out.flush()?;

    if !options.assume_yes && !confirm(prompter, out) {
        writeln!(out, "Operation cancelled, no changes were applied")?;
        return Ok(Outcome::Declined);
    }

    let report = apply(session, &reconciliation.users).await;
    write!(out, "{}", render_report(&report))?;
    Ok(Outcome::Applied(report))
}

/// Write the current memberships to `path` as an input file
pub async fn export_memberships(
    session: &Session,
    path: &Path,
    out: &mut dyn Write,
) -> Result<usize> {
    let users = session.list_users().await?;
    let count = export_to_path(&users, path)?;
    writeln!(out, "====== Saved {} rows to {} ======", count, path.display())?;
    Ok(count)
}
