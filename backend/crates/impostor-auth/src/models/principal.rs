use serde::{Deserialize, Serialize};

use super::UserName;
use crate::password;

/// Identity record supplied by the identity store.
///
/// The authentication layer only reads principals: it looks them up by
/// username, checks a candidate password and inspects the privilege flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: UserName,
    /// Bcrypt hash; empty means the principal cannot log in with a password
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
}

impl Principal {
    /// Create an active principal with no privileges.
    pub fn new(username: impl Into<UserName>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            email: None,
            is_superuser: false,
            is_staff: false,
            is_active: true,
        }
    }

    pub fn with_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = is_superuser;
        self
    }

    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Check a candidate password against the stored hash.
    ///
    /// A missing hash or a hash bcrypt cannot parse never verifies.
    pub async fn verify_password(&self, candidate: &str) -> bool {
        if self.password_hash.is_empty() {
            return false;
        }

        match password::verify_password(candidate, &self.password_hash).await {
            Ok(verified) => verified,
            Err(e) => {
                log::warn!("Password verification failed for '{}': {}", self.username, e);
                false
            },
        }
    }
}
