// Authentication error types

use thiserror::Error;

/// Errors raised by the authentication layer.
///
/// A denied login is not an error: backends return `Ok(None)` for unknown
/// users, wrong passwords and refused impersonation alike. The variants here
/// cover malformed input rejected before any backend runs and failures of
/// the collaborating stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Identity store error: {0}")]
    Repository(String),

    #[error("Audit log error: {0}")]
    AuditLog(String),

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Unknown authentication backend: {0}")]
    UnknownBackend(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
