//! Login/password authentication (`scopeType=Web`)

use crate::auth::provider::{Authenticator, token_from_response};
use crate::error::AuthError;
use crate::ptai::types::LoginRequest;
use crate::util::SecretString;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

const LOGIN_ENDPOINT: &str = "api/auth/userLogin?scopeType=Web";

/// Authenticates with a PT AI user's login and password
#[derive(Debug, Clone)]
pub struct PasswordAuthenticator {
    login: String,
    password: SecretString,
}

impl PasswordAuthenticator {
    pub fn new(login: impl Into<String>, password: SecretString) -> Result<Self, AuthError> {
        let login = login.into();
        if login.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Self { login, password })
    }
}

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    async fn authenticate(
        &self,
        http: &Client,
        base_url: &str,
    ) -> Result<SecretString, AuthError> {
        debug!(login = %self.login, "Requesting bearer token");

        let body = LoginRequest {
            login: &self.login,
            password: self.password.expose_secret(),
            remember_me: false,
        };
        let response = http
            .post(format!("{}{}", base_url, LOGIN_ENDPOINT))
            .header(CONTENT_TYPE, "application/json-patch+json")
            .json(&body)
            .send()
            .await?;

        token_from_response(response).await
    }

    fn auth_type(&self) -> &'static str {
        "Login/password"
    }
}
