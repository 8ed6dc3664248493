//! Host-side authentication pipeline.
//!
//! ```text
//! LoginForm ──validate──▶ Credentials ──▶ backend[0] ──None──▶ backend[1] ──None──▶ … ──▶ None
//!     │                                      │                    │
//!     └─ MalformedRequest                    └─ Some(principal) ──┴─▶ AuthenticationResult
//! ```

use std::sync::Arc;

use crate::backends::AuthBackend;
use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::intake::{IntakeSettings, LoginForm};
use crate::models::{ConnectionInfo, Principal, UserName};

/// Result of authentication including the backend that accepted it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// The principal the caller is now logged in as
    pub principal: Principal,
    /// Name of the backend that authenticated the request
    pub backend: &'static str,
}

/// Ordered list of authentication backends.
pub struct AuthPipeline {
    intake: IntakeSettings,
    backends: Vec<Arc<dyn AuthBackend>>,
}

impl AuthPipeline {
    pub fn new(intake: IntakeSettings) -> Self {
        Self {
            intake,
            backends: Vec::new(),
        }
    }

    /// Append a backend; backends are tried in the order they are added.
    pub fn with_backend(mut self, backend: Arc<dyn AuthBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|backend| backend.name()).collect()
    }

    pub fn intake(&self) -> &IntakeSettings {
        &self.intake
    }

    /// Validate a login form and authenticate it.
    ///
    /// # Returns
    /// * `Ok(Some(result))` - a backend authenticated the credentials
    /// * `Ok(None)` - every backend declined
    /// * `Err(AuthError::MalformedRequest)` - the form is missing a field
    /// * `Err(_)` - a backend's store failed
    pub async fn authenticate(
        &self,
        form: &LoginForm,
        connection: &ConnectionInfo,
    ) -> AuthResult<Option<AuthenticationResult>> {
        let credentials = form.validate(&self.intake)?;
        self.authenticate_credentials(&credentials, connection).await
    }

    /// Try each backend in order with already validated credentials.
    pub async fn authenticate_credentials(
        &self,
        credentials: &Credentials,
        connection: &ConnectionInfo,
    ) -> AuthResult<Option<AuthenticationResult>> {
        for backend in &self.backends {
            if let Some(principal) = backend.authenticate(credentials, connection).await? {
                tracing::debug!(
                    backend = backend.name(),
                    username = %principal.username,
                    "Authenticated"
                );
                return Ok(Some(AuthenticationResult {
                    principal,
                    backend: backend.name(),
                }));
            }
        }

        tracing::debug!(backends = self.backends.len(), "No backend authenticated the request");
        Ok(None)
    }

    /// Reload a principal through the backend that authenticated it.
    pub async fn get_principal(
        &self,
        backend_name: &str,
        username: &UserName,
    ) -> AuthResult<Option<Principal>> {
        let backend = self
            .backends
            .iter()
            .find(|backend| backend.name() == backend_name)
            .ok_or_else(|| AuthError::UnknownBackend(backend_name.to_string()))?;

        backend.get_principal(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{ImpostorBackend, PasswordBackend, IMPOSTOR_BACKEND, PASSWORD_BACKEND};
    use crate::password::{hash_password, PasswordVerifier};
    use crate::policy::ImpersonationPrivilege;
    use crate::repository::{IdentityStore, InMemoryAuditLog, InMemoryIdentityStore};

    struct DenyAll;

    #[async_trait::async_trait]
    impl AuthBackend for DenyAll {
        fn name(&self) -> &'static str {
            "deny_all"
        }

        async fn authenticate(
            &self,
            _credentials: &Credentials,
            _connection: &ConnectionInfo,
        ) -> AuthResult<Option<Principal>> {
            Ok(None)
        }

        async fn get_principal(&self, _username: &UserName) -> AuthResult<Option<Principal>> {
            Ok(None)
        }
    }

    /// Store that errors on usernames it considers malformed, as a database
    /// with a username column constraint would.
    struct StrictIdentityStore(InMemoryIdentityStore);

    #[async_trait::async_trait]
    impl IdentityStore for StrictIdentityStore {
        async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Principal>> {
            if username.as_str().contains(' ') {
                return Err(AuthError::Repository("invalid username".to_string()));
            }
            self.0.find_by_username(username).await
        }
    }

    async fn seeded_store() -> InMemoryIdentityStore {
        let identity = InMemoryIdentityStore::new();
        identity.insert(
            Principal::new("root", hash_password("root_pass", Some(4)).await.unwrap())
                .with_superuser(true),
        );
        identity.insert(Principal::new(
            "alice",
            hash_password("alice_pass", Some(4)).await.unwrap(),
        ));
        identity
    }

    fn default_backends(
        pipeline: AuthPipeline,
        identity: Arc<dyn IdentityStore>,
        audit: Arc<InMemoryAuditLog>,
    ) -> AuthPipeline {
        let verifier = Arc::new(PasswordVerifier::new(4));
        pipeline
            .with_backend(Arc::new(
                PasswordBackend::new(identity.clone()).with_verifier(verifier.clone()),
            ))
            .with_backend(Arc::new(
                ImpostorBackend::new(identity, audit, ImpersonationPrivilege::Superuser)
                    .with_verifier(verifier),
            ))
    }

    async fn pipeline() -> (AuthPipeline, Arc<InMemoryAuditLog>) {
        let identity = Arc::new(seeded_store().await);
        let audit = Arc::new(InMemoryAuditLog::new());
        let pipeline = AuthPipeline::new(IntakeSettings::default()).with_backend(Arc::new(DenyAll));
        (default_backends(pipeline, identity, audit.clone()), audit)
    }

    #[tokio::test]
    async fn test_backends_tried_in_order() {
        let (pipeline, audit) = pipeline().await;
        assert_eq!(pipeline.backend_names(), vec!["deny_all", PASSWORD_BACKEND, IMPOSTOR_BACKEND]);

        let result = pipeline
            .authenticate(&LoginForm::new("alice", "alice_pass"), &ConnectionInfo::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.principal.username.as_str(), "alice");
        assert_eq!(result.backend, PASSWORD_BACKEND);
        assert!(audit.is_empty());
    }

    #[tokio::test]
    async fn test_impersonation_falls_through_to_impostor() {
        let (pipeline, audit) = pipeline().await;
        let result = pipeline
            .authenticate(&LoginForm::new("root as alice", "root_pass"), &ConnectionInfo::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.principal.username.as_str(), "alice");
        assert_eq!(result.backend, IMPOSTOR_BACKEND);
        assert_eq!(audit.len(), 1);
    }

    #[tokio::test]
    async fn test_strict_store_still_reaches_impostor() {
        let identity = Arc::new(StrictIdentityStore(seeded_store().await));
        let audit = Arc::new(InMemoryAuditLog::new());
        let pipeline = default_backends(
            AuthPipeline::new(IntakeSettings::default()),
            identity,
            audit.clone(),
        );

        let result = pipeline
            .authenticate(&LoginForm::new("root as alice", "root_pass"), &ConnectionInfo::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.principal.username, "alice");
        assert_eq!(result.backend, IMPOSTOR_BACKEND);
        assert_eq!(audit.len(), 1);

        // A malformed plain username still reaches the store and fails loudly
        let result = pipeline
            .authenticate(&LoginForm::new("root  ", "root_pass"), &ConnectionInfo::default())
            .await;
        assert!(matches!(result, Err(AuthError::Repository(_))));
    }

    #[tokio::test]
    async fn test_denied_by_every_backend() {
        let (pipeline, audit) = pipeline().await;
        let result = pipeline
            .authenticate(&LoginForm::new("alice as root", "alice_pass"), &ConnectionInfo::default())
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(audit.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_request_never_reaches_backends() {
        let (pipeline, audit) = pipeline().await;
        let form = LoginForm {
            username: Some("root as alice".to_string()),
            password: None,
        };
        let result = pipeline.authenticate(&form, &ConnectionInfo::default()).await;
        assert!(matches!(result, Err(AuthError::MalformedRequest(_))));
        assert!(audit.is_empty());
    }

    #[tokio::test]
    async fn test_get_principal() {
        let (pipeline, _) = pipeline().await;
        let alice = pipeline
            .get_principal(IMPOSTOR_BACKEND, &UserName::from("alice"))
            .await
            .unwrap();
        assert!(alice.is_some());

        let unknown = pipeline.get_principal("ldap", &UserName::from("alice")).await;
        assert_eq!(unknown, Err(AuthError::UnknownBackend("ldap".to_string())));
    }
}
