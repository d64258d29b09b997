//! Shared fixtures for integration tests

#![allow(dead_code)]

use regex_role_changer::config::ServerConfig;
use regex_role_changer::ptai::Session;
use regex_role_changer::auth::PasswordAuthenticator;
use regex_role_changer::util::SecretString;
use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "bearer-token";

pub fn server_config(mock_server: &MockServer) -> ServerConfig {
    ServerConfig {
        url: mock_server.uri(),
        timeout_secs: 5,
        verify_ssl: true,
    }
}

pub fn projects() -> Value {
    json!([
        {"id": 1, "name": "Foobar"},
        {"id": 2, "name": "Barcelona"},
        {"id": 3, "name": "Baz"}
    ])
}

pub fn users() -> Value {
    json!([
        {"id": 10, "name": "alice", "roles": []},
        {"id": 11, "name": "carol", "roles": [
            {"name": "Auditor", "autoSet": false, "allProjects": false,
             "projects": [{"id": 3, "name": "Baz"}]}
        ]}
    ])
}

pub fn roles(names: &[&str]) -> Value {
    Value::Array(names.iter().map(|n| json!({"name": n})).collect())
}

/// Mount the login endpoint answering with [`TOKEN`]
pub async fn mount_login(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/userLogin"))
        .and(query_param("scopeType", "Web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": TOKEN,
            "refreshToken": "refresh"
        })))
        .mount(mock_server)
        .await;
}

/// Mount the three read endpoints
pub async fn mount_directory(mock_server: &MockServer, projects: Value, users: Value, roles: Value) {
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects))
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/membership"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users))
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roles))
        .mount(mock_server)
        .await;
}

/// Session already authenticated against the mock login endpoint
pub async fn authenticated_session(mock_server: &MockServer) -> Session {
    mount_login(mock_server).await;
    let mut session = Session::new(&server_config(mock_server)).unwrap();
    let auth = PasswordAuthenticator::new("admin", SecretString::new("pw")).unwrap();
    session.authenticate(&auth).await.unwrap();
    session
}

pub fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}
