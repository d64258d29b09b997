//! Regex Role Changer
//!
//! Bulk-assigns PT AI project roles from a CSV file of
//! `username, role, pattern` rows.
//!
//! ## How it works
//!
//! ```text
//! CSV → desired state ─┐
//!                      ├→ reconcile → review → confirm → PUT per user
//! server snapshot ─────┘
//! ```
//!
//! Each pattern is a regular expression anchored at the start of the project
//! name. For every user in the file the tool computes the complete set of
//! roles and projects and sends it as a replacement of the user's membership.
//! Roles the user holds that the file does not produce are revoked, except
//! auto-set roles which the server manages itself.
//!
//! ## Example input
//!
//! ```text
//! username,role,pattern
//! alice,Auditor,^Foo.*$
//! alice,Developer,^Bar.*$
//! ```

pub mod app;
pub mod apply;
pub mod auth;
pub mod config;
pub mod desired;
pub mod error;
pub mod export;
pub mod prompt;
pub mod ptai;
pub mod reconcile;
pub mod review;
pub mod util;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use ptai::Session;
