//! Access token authentication (`scopeType=AccessToken`)
//!
//! Access tokens are created in the PT AI web UI settings and traded for a
//! bearer token on every run.

use crate::auth::provider::{Authenticator, token_from_response};
use crate::error::AuthError;
use crate::util::SecretString;
use async_trait::async_trait;
use reqwest::Client;

const SIGNIN_ENDPOINT: &str = "api/auth/signin?scopeType=AccessToken";

/// Authenticates with a long-lived PT AI access token
#[derive(Debug, Clone)]
pub struct AccessTokenAuthenticator {
    token: SecretString,
}

impl AccessTokenAuthenticator {
    pub fn new(token: SecretString) -> Result<Self, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(Self { token })
    }
}

#[async_trait]
impl Authenticator for AccessTokenAuthenticator {
    async fn authenticate(
        &self,
        http: &Client,
        base_url: &str,
    ) -> Result<SecretString, AuthError> {
        let response = http
            .get(format!("{}{}", base_url, SIGNIN_ENDPOINT))
            .header("Access-Token", self.token.expose_secret())
            .send()
            .await?;

        token_from_response(response).await
    }

    fn auth_type(&self) -> &'static str {
        "Access token"
    }
}
