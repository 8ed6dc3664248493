use chrono::{DateTime, Utc};

use crate::error::AuthResult;
use crate::models::{AuditLogEntry, ImpostorToken};

/// Append-only persistence for impersonation audit entries.
///
/// `append` must be atomic per entry: after it returns `Ok` the entry is
/// durable and complete, after `Err` nothing of it is visible.
#[async_trait::async_trait]
pub trait AuditLogStore: Send + Sync {
    async fn append(&self, entry: &AuditLogEntry) -> AuthResult<()>;

    async fn find_by_token(&self, token: &ImpostorToken) -> AuthResult<Option<AuditLogEntry>>;

    /// Record the end of an impersonation session.
    ///
    /// Returns `false` if the token is unknown or the session already ended.
    async fn mark_logged_out(&self, token: &ImpostorToken, at: DateTime<Utc>) -> AuthResult<bool>;
}
