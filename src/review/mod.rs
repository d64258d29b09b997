//! Change review
//!
//! Renders the computed role sets for the operator and gates the write
//! phase behind an explicit confirmation.

pub mod confirm;
pub mod presenter;

pub use confirm::{AFFIRMATIVE_ANSWERS, confirm, is_affirmative};
pub use presenter::{render_changes, render_pattern_reports, render_report, render_warnings};
