//! Authenticator trait
//!
//! PT AI hands out short-lived bearer tokens in exchange for either a
//! login/password pair or a long-lived access token.

use crate::error::AuthError;
use crate::ptai::types::TokenResponse;
use crate::util::SecretString;
// async_trait required for dyn-compatibility with Box<dyn Authenticator>
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

/// Exchanges configured credentials for a bearer token
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Perform the credential exchange against `base_url` (ends with `/`)
    async fn authenticate(&self, http: &Client, base_url: &str)
    -> Result<SecretString, AuthError>;

    /// Get a description of the auth method (for logging)
    fn auth_type(&self) -> &'static str;
}

/// Box type alias for authenticators
pub type BoxedAuthenticator = Box<dyn Authenticator>;

/// Map a login endpoint response onto a bearer token or an [`AuthError`]
pub(crate) async fn token_from_response(response: Response) -> Result<SecretString, AuthError> {
    let status = response.status();
    if status == StatusCode::OK {
        let body: TokenResponse = response.json().await.map_err(|_| AuthError::MissingToken)?;
        if body.access_token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        return Ok(SecretString::new(body.access_token));
    }

    let detail = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::BAD_REQUEST => AuthError::BadRequest { detail },
        StatusCode::UNAUTHORIZED => AuthError::InvalidCredentials,
        other => AuthError::Unexpected {
            status: other.as_u16(),
            detail,
        },
    })
}
