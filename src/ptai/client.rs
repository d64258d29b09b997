//! PT AI API session
//!
//! A [`Session`] owns the HTTP client and, once authenticated, the bearer
//! token. It is created once per run and passed by reference to everything
//! that talks to the server.

use crate::auth::Authenticator;
use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult, AuthError, ConnectivityError};
use crate::ptai::types::{Directory, MembershipUpdate, Project, Role, User};
use crate::util::SecretString;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, info, instrument};

const HEALTH_ENDPOINT: &str = "health/summary";
const PROJECTS_ENDPOINT: &str = "api/projects";
const MEMBERSHIP_ENDPOINT: &str = "api/auth/membership";
const ROLES_ENDPOINT: &str = "api/auth/roles";

/// Authenticated connection to a PT AI server
pub struct Session {
    http: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl Session {
    /// Create an unauthenticated session from configuration
    pub fn new(config: &ServerConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .user_agent(format!("regex-role-changer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            token: None,
        })
    }

    /// Build a URL for an API endpoint
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Probe the server. Any HTTP status counts as reachable.
    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn connect(&self) -> Result<(), ConnectivityError> {
        match self.http.get(self.url(HEALTH_ENDPOINT)).send().await {
            Ok(response) => {
                debug!(status = %response.status(), "Server is reachable");
                Ok(())
            }
            Err(e) => Err(ConnectivityError::from_request(&e)),
        }
    }

    /// Obtain a bearer token and attach it to all subsequent calls
    pub async fn authenticate(&mut self, auth: &dyn Authenticator) -> Result<(), AuthError> {
        let token = auth.authenticate(&self.http, &self.base_url).await?;
        info!(method = auth.auth_type(), "Authenticated");
        self.token = Some(token);
        Ok(())
    }

    /// Add the bearer token to a request
    fn bearer(&self, request: RequestBuilder) -> ApiResult<RequestBuilder> {
        let token = self.token.as_ref().ok_or(ApiError::NotAuthenticated)?;
        Ok(request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret())))
    }

    /// Turn non-success statuses into errors carrying the server's body
    async fn handle_response(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }

    /// Make a GET request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let request = self.bearer(self.http.get(self.url(endpoint)))?;
        let response = self.handle_response(request.send().await?).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Make a PUT request, ignoring any response body
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn put_no_content<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<()> {
        let request = self.bearer(self.http.put(self.url(endpoint)).json(body))?;
        self.handle_response(request.send().await?).await?;
        Ok(())
    }

    /// All projects known to the server
    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.get(PROJECTS_ENDPOINT).await
    }

    /// All users together with their current role memberships
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.get(MEMBERSHIP_ENDPOINT).await
    }

    /// The role catalog
    pub async fn list_roles(&self) -> ApiResult<Vec<Role>> {
        self.get(ROLES_ENDPOINT).await
    }

    /// Fetch projects, users and roles in one go
    pub async fn fetch_directory(&self) -> ApiResult<Directory> {
        let projects = self.list_projects().await?;
        let users = self.list_users().await?;
        let roles = self.list_roles().await?;
        debug!(
            projects = projects.len(),
            users = users.len(),
            roles = roles.len(),
            "Fetched server snapshot"
        );
        Ok(Directory {
            projects,
            users,
            roles,
        })
    }

    /// Replace one user's complete role membership
    pub async fn update_membership(&self, update: &MembershipUpdate) -> ApiResult<()> {
        self.put_no_content(MEMBERSHIP_ENDPOINT, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(url: &str) -> Session {
        let config = ServerConfig {
            url: url.to_string(),
            ..Default::default()
        };
        Session::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_base_and_endpoint() {
        let session = session("https://ptai.example.com");
        assert_eq!(
            session.url(PROJECTS_ENDPOINT),
            "https://ptai.example.com/api/projects"
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_calls_fail_without_network() {
        let session = session("http://127.0.0.1:9");
        assert!(!session.is_authenticated());
        let result = session.list_projects().await;
        assert!(matches!(result, Err(ApiError::NotAuthenticated)));
    }
}
