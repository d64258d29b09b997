//! PT AI API module
//!
//! Session handling and the wire types of the endpoints this tool uses.

pub mod client;
pub mod types;

pub use client::Session;
pub use types::*;
