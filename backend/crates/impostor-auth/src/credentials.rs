//! Credential parsing.
//!
//! A username field may carry two identities: `"<actor> as <target>"`. The
//! actor is the account whose password is checked, the target is the account
//! the actor wants to log in as.

use std::fmt;

use crate::models::UserName;

/// Literal separator between actor and target. Case-sensitive.
pub const IMPERSONATION_SEPARATOR: &str = " as ";

/// Split a raw username into actor and optional target.
///
/// Splits on the first separator only, so `"a as b as c"` yields actor `"a"`
/// and target `"b as c"`. Both sides are trimmed and must be non-empty;
/// otherwise the whole input is returned as the actor.
pub fn parse_username(raw_username: &str) -> (&str, Option<&str>) {
    if let Some((actor, target)) = raw_username.split_once(IMPERSONATION_SEPARATOR) {
        let actor = actor.trim();
        let target = target.trim();
        if !actor.is_empty() && !target.is_empty() {
            return (actor, Some(target));
        }
    }

    (raw_username, None)
}

/// Username/password pair that passed intake validation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parsed form of a login attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct ImpersonationRequest {
    pub actor: UserName,
    pub target: Option<UserName>,
    pub password: String,
}

impl ImpersonationRequest {
    pub fn parse(raw_username: &str, password: &str) -> Self {
        let (actor, target) = parse_username(raw_username);
        Self {
            actor: UserName::from(actor),
            target: target.map(UserName::from),
            password: password.to_string(),
        }
    }

    /// The target, unless it is absent or names the actor itself.
    pub fn impersonated(&self) -> Option<&UserName> {
        self.target.as_ref().filter(|target| **target != self.actor)
    }
}

impl From<&Credentials> for ImpersonationRequest {
    fn from(credentials: &Credentials) -> Self {
        Self::parse(&credentials.username, &credentials.password)
    }
}

impl fmt::Debug for ImpersonationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImpersonationRequest")
            .field("actor", &self.actor)
            .field("target", &self.target)
            .field("password", &"<redacted>")
            .finish()
    }
}
