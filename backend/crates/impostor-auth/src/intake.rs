//! Credential intake: the validation step in front of the backends.
//!
//! A login form missing either field is a malformed request and never
//! reaches authentication. This is the only failure surfaced to the caller
//! as something other than "denied".

use serde::Deserialize;
use std::fmt;

use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};

/// Default maximum username length in characters.
///
/// Wide enough for two usernames joined by " as ".
pub const DEFAULT_MAX_USERNAME_LENGTH: usize = 70;

/// Limits applied by [`LoginForm::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeSettings {
    pub max_username_length: usize,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            max_username_length: DEFAULT_MAX_USERNAME_LENGTH,
        }
    }
}

/// Raw login submission, e.g. a JSON body `{"username": ..., "password": ...}`.
#[derive(Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Parse a JSON login body.
    pub fn from_json(body: &str) -> AuthResult<Self> {
        serde_json::from_str(body)
            .map_err(|e| AuthError::MalformedRequest(format!("Invalid login body: {}", e)))
    }

    /// Validate required fields and return the cleaned credentials.
    ///
    /// The username must be present, non-blank and at most
    /// `max_username_length` characters. The password must be present;
    /// its content is not constrained here.
    pub fn validate(&self, settings: &IntakeSettings) -> AuthResult<Credentials> {
        let username = match self.username.as_deref() {
            Some(username) if !username.trim().is_empty() => username,
            _ => return Err(AuthError::MalformedRequest("username is required".to_string())),
        };

        let length = username.chars().count();
        if length > settings.max_username_length {
            return Err(AuthError::MalformedRequest(format!(
                "username must be at most {} characters (got {})",
                settings.max_username_length, length
            )));
        }

        let password = self
            .password
            .as_deref()
            .ok_or_else(|| AuthError::MalformedRequest("password is required".to_string()))?;

        Ok(Credentials::new(username, password))
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
