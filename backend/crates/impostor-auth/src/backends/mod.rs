//! Pluggable authentication backends.
//!
//! The host tries backends in order (see [`crate::pipeline::AuthPipeline`]);
//! the first one returning a principal wins. A backend returns `Ok(None)`
//! when it does not authenticate the credentials, whatever the cause.

mod impostor;
mod password;

pub use impostor::{DenialReason, ImpostorBackend, IMPOSTOR_BACKEND};
pub use password::{PasswordBackend, PASSWORD_BACKEND};

use crate::credentials::Credentials;
use crate::error::AuthResult;
use crate::models::{ConnectionInfo, Principal, UserName};

#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Stable name recorded with the authentication result
    fn name(&self) -> &'static str;

    async fn authenticate(
        &self,
        credentials: &Credentials,
        connection: &ConnectionInfo,
    ) -> AuthResult<Option<Principal>>;

    /// Reload a principal previously authenticated by this backend.
    async fn get_principal(&self, username: &UserName) -> AuthResult<Option<Principal>>;
}
