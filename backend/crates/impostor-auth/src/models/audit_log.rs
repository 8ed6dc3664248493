//! Audit log entry recorded for every successful impersonation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

use super::{Principal, UserName};

/// Random bytes per token (192 bits, 32 base64 characters).
const TOKEN_BYTES: usize = 24;

/// Unguessable handle identifying one impersonation session.
///
/// Used downstream to revert or audit the session, so it is drawn from the
/// thread-local CSPRNG rather than derived from a counter or clock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImpostorToken(String);

impl ImpostorToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap an existing token value, e.g. one presented by a client.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ImpostorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ImpostorToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Who impersonated whom, from where and when.
///
/// Append-only: once written, only `logged_out` is ever filled in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub token: ImpostorToken,
    pub impostor: UserName,
    pub imposted_as: UserName,
    pub impostor_ip: Option<IpAddr>,
    pub logged_in: DateTime<Utc>,
    pub logged_out: Option<DateTime<Utc>>,
}

impl AuditLogEntry {
    /// Build an entry stamped with the current time and a fresh token.
    pub fn new(impostor: &Principal, imposted_as: &Principal, impostor_ip: Option<IpAddr>) -> Self {
        Self {
            token: ImpostorToken::generate(),
            impostor: impostor.username.clone(),
            imposted_as: imposted_as.username.clone(),
            impostor_ip,
            logged_in: Utc::now(),
            logged_out: None,
        }
    }

    /// Whether the impersonation session is still open.
    pub fn is_active(&self) -> bool {
        self.logged_out.is_none()
    }
}
