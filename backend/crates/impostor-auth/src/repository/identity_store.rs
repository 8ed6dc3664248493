use crate::error::AuthResult;
use crate::models::{Principal, UserName};

/// Abstraction over the identity store that owns principals.
///
/// Implementations are provided by the host; `Ok(None)` means the username
/// is unknown, `Err` means the store itself failed.
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Principal>>;
}
