use std::sync::Arc;

use tracing::Instrument;

use super::AuthBackend;
use crate::credentials::{parse_username, Credentials};
use crate::error::AuthResult;
use crate::models::{ConnectionInfo, Principal, UserName};
use crate::password::PasswordVerifier;
use crate::repository::IdentityStore;

pub const PASSWORD_BACKEND: &str = "password";

/// Plain username/password authentication against the identity store.
///
/// Composite "<actor> as <target>" usernames are declined without touching
/// the store and left to the impersonation backend.
pub struct PasswordBackend {
    identity: Arc<dyn IdentityStore>,
    verifier: Arc<PasswordVerifier>,
}

impl PasswordBackend {
    pub fn new(identity: Arc<dyn IdentityStore>) -> Self {
        Self {
            identity,
            verifier: Arc::new(PasswordVerifier::default()),
        }
    }

    /// Share a verifier whose decoy cost matches the stored hashes.
    pub fn with_verifier(mut self, verifier: Arc<PasswordVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}

#[async_trait::async_trait]
impl AuthBackend for PasswordBackend {
    fn name(&self) -> &'static str {
        PASSWORD_BACKEND
    }

    async fn authenticate(
        &self,
        credentials: &Credentials,
        _connection: &ConnectionInfo,
    ) -> AuthResult<Option<Principal>> {
        let span = tracing::debug_span!("auth.password", username = credentials.username.as_str());
        async move {
            if parse_username(&credentials.username).1.is_some() {
                return Ok(None);
            }

            let username = UserName::from(credentials.username.as_str());
            let principal = self.identity.find_by_username(&username).await?;
            let verified = self.verifier.check(principal.as_ref(), &credentials.password).await;

            match principal {
                Some(principal) if verified && principal.is_active => {
                    tracing::debug!(username = %principal.username, "Password authentication succeeded");
                    Ok(Some(principal))
                },
                _ => Ok(None),
            }
        }
        .instrument(span)
        .await
    }

    async fn get_principal(&self, username: &UserName) -> AuthResult<Option<Principal>> {
        Ok(self.identity.find_by_username(username).await?.filter(|p| p.is_active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::password::hash_password;
    use crate::repository::InMemoryIdentityStore;

    /// Identity store that refuses usernames containing whitespace.
    struct StrictIdentityStore(InMemoryIdentityStore);

    #[async_trait::async_trait]
    impl IdentityStore for StrictIdentityStore {
        async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Principal>> {
            if username.as_str().contains(char::is_whitespace) {
                return Err(AuthError::Repository("invalid username".to_string()));
            }
            self.0.find_by_username(username).await
        }
    }

    async fn backend() -> (PasswordBackend, Arc<PasswordVerifier>) {
        let store = InMemoryIdentityStore::new();
        let hash = hash_password("alice_pass", Some(4)).await.unwrap();
        store.insert(Principal::new("alice", hash.clone()));
        store.insert(Principal::new("retired", hash).with_active(false));

        let verifier = Arc::new(PasswordVerifier::new(4));
        let backend = PasswordBackend::new(Arc::new(StrictIdentityStore(store)))
            .with_verifier(verifier.clone());
        (backend, verifier)
    }

    async fn login(backend: &PasswordBackend, username: &str, password: &str) -> AuthResult<Option<Principal>> {
        backend
            .authenticate(&Credentials::new(username, password), &ConnectionInfo::default())
            .await
    }

    #[tokio::test]
    async fn test_plain_login() {
        let (backend, _) = backend().await;
        let alice = login(&backend, "alice", "alice_pass").await.unwrap().unwrap();
        assert_eq!(alice.username, "alice");
        assert!(login(&backend, "alice", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_composite_username_declined_before_lookup() {
        let (backend, verifier) = backend().await;
        assert_eq!(login(&backend, "alice as bob", "alice_pass").await, Ok(None));
        assert_eq!(verifier.checks(), 0);
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_pay_for_verification() {
        let (backend, verifier) = backend().await;
        assert!(login(&backend, "nobody", "alice_pass").await.unwrap().is_none());
        assert_eq!(verifier.checks(), 1);

        assert!(login(&backend, "retired", "alice_pass").await.unwrap().is_none());
        assert_eq!(verifier.checks(), 2);
    }
}
