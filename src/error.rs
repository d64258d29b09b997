//! Error types for regex-role-changer
//!
//! Fatal errors abort the run with a non-zero exit code. Per-user write
//! failures and validation warnings are recoverable and are collected
//! rather than propagated.

use serde::Deserialize;
use thiserror::Error;

/// Server error code for role assignments on administrator accounts
pub const ADMINISTRATOR_ERROR_CODE: &str = "CANNOT_ASSIGN_PROJECT_ROLE_TO_ADMINISTRATOR";

/// Top-level application error. Every variant is fatal.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Connection error: {0}")]
    Connectivity(#[from] ConnectivityError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("PT AI API error: {0}")]
    Api(#[from] ApiError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Configuration and input file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Row {line}: expected 3 fields (username, role, pattern), got {found}")]
    MalformedRow { line: u64, found: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The server could not be reached at all
#[derive(Error, Debug)]
pub enum ConnectivityError {
    #[error("cannot resolve server address, check the URL and your network or VPN: {0}")]
    NameResolution(String),

    #[error("cannot connect to the server, check the URL and your network or VPN: {0}")]
    Unreachable(String),
}

impl ConnectivityError {
    /// Classify a transport-level failure of the health probe
    pub fn from_request(err: &reqwest::Error) -> Self {
        let chain = error_chain(err);
        if chain.contains("dns error") || chain.contains("failed to lookup address") {
            ConnectivityError::NameResolution(chain)
        } else {
            ConnectivityError::Unreachable(chain)
        }
    }
}

/// Credential exchange errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid login or password")]
    InvalidCredentials,

    #[error("malformed login request, server said: {detail}")]
    BadRequest { detail: String },

    #[error("unexpected server response (HTTP {status}): {detail}")]
    Unexpected { status: u16, detail: String },

    #[error("server response did not contain an access token")]
    MissingToken,

    #[error("failed to read credentials: {0}")]
    Prompt(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A CSV pattern is not a valid regular expression
#[derive(Error, Debug)]
#[error("invalid regex pattern '{pattern}': {reason}")]
pub struct PatternError {
    pub pattern: String,
    pub reason: String,
}

/// PT AI API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("not authenticated")]
    NotAuthenticated,
}

impl ApiError {
    /// Build an error from a non-success status and the response body
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            body: if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body.to_string()
            },
        }
    }

    /// `errorCode` of a JSON error body, if the server sent one
    pub fn error_code(&self) -> Option<String> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ErrorBody {
            error_code: Option<String>,
        }

        match self {
            ApiError::Status { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.error_code),
            _ => None,
        }
    }

    /// The server refused because the target user is an administrator
    pub fn is_administrator_refusal(&self) -> bool {
        self.error_code().as_deref() == Some(ADMINISTRATOR_ERROR_CODE)
    }
}

/// A single user's membership update failed. Never aborts the run.
#[derive(Error, Debug)]
#[error("failed to update {user}: {source}")]
pub struct WriteError {
    pub user: String,
    #[source]
    pub source: ApiError,
}

/// Flatten an error and its sources into one line
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for PT AI API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;
