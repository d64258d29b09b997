//! Reconciliation
//!
//! Turns `username -> pattern -> role` rules into full replacement role sets
//! per user, using a one-off snapshot of the server's projects, users and
//! role catalog.

pub mod engine;
pub mod matcher;
pub mod types;

pub use engine::reconcile;
pub use matcher::{PatternReport, ProjectMatcher, check_patterns};
pub use types::{ReconciledUser, Reconciliation, RoleDelta, ValidationWarning};
