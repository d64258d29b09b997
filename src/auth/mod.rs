//! Authentication module
//!
//! Obtains the bearer token every other API call carries. Login/password is
//! the default; a configured access token takes precedence.

pub mod password;
pub mod provider;
pub mod token;

pub use password::PasswordAuthenticator;
pub use provider::{Authenticator, BoxedAuthenticator};
pub use token::AccessTokenAuthenticator;

use crate::config::CredentialsConfig;
use crate::error::AuthError;
use crate::prompt::Prompter;
use crate::util::SecretString;

/// Create an authenticator from configuration, prompting for whatever is missing
pub fn create_authenticator(
    config: &CredentialsConfig,
    prompter: &dyn Prompter,
) -> Result<BoxedAuthenticator, AuthError> {
    if let Some(token) = config.access_token.as_ref().filter(|t| !t.is_empty()) {
        return Ok(Box::new(AccessTokenAuthenticator::new(token.clone())?));
    }

    let login = match config.login.as_deref().filter(|l| !l.is_empty()) {
        Some(login) => login.to_string(),
        None => prompter
            .input("Login")
            .map_err(|e| AuthError::Prompt(e.to_string()))?
            .trim()
            .to_string(),
    };

    let password = match config.password.as_ref().filter(|p| !p.is_empty()) {
        Some(password) => password.clone(),
        None => SecretString::new(
            prompter
                .password("Password")
                .map_err(|e| AuthError::Prompt(e.to_string()))?,
        ),
    };

    Ok(Box::new(PasswordAuthenticator::new(login, password)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;

    #[test]
    fn test_configured_credentials_skip_prompt() {
        let config = CredentialsConfig {
            login: Some("admin".into()),
            password: Some(SecretString::new("pw")),
            access_token: None,
        };
        let prompter = ScriptedPrompter::default();

        let auth = create_authenticator(&config, &prompter).unwrap();
        assert_eq!(auth.auth_type(), "Login/password");
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_missing_credentials_are_prompted() {
        let prompter = ScriptedPrompter::new([" admin ", "pw"]);

        let auth = create_authenticator(&CredentialsConfig::default(), &prompter).unwrap();
        assert_eq!(auth.auth_type(), "Login/password");
        assert_eq!(prompter.asked(), vec!["Login", "Password"]);
    }

    #[test]
    fn test_access_token_takes_precedence() {
        let config = CredentialsConfig {
            login: Some("admin".into()),
            password: None,
            access_token: Some(SecretString::new("tok")),
        };
        let prompter = ScriptedPrompter::default();

        let auth = create_authenticator(&config, &prompter).unwrap();
        assert_eq!(auth.auth_type(), "Access token");
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_closed_stdin_is_auth_error() {
        let prompter = ScriptedPrompter::default();
        let result = create_authenticator(&CredentialsConfig::default(), &prompter);
        assert!(matches!(result, Err(AuthError::Prompt(_))));
    }
}
