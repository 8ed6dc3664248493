//! Authentication bootstrap helpers.
//!
//! Turns an [`ImpostorConfig`] plus the host's identity and audit stores
//! into a ready-to-use [`AuthPipeline`].

use std::sync::Arc;

use anyhow::Result;
use impostor_auth::password::hash_password;
use impostor_auth::{
    AuditLogStore, AuthPipeline, IdentityStore, ImpersonationPrivilege, ImpostorBackend,
    IntakeSettings, PasswordBackend, PasswordVerifier, Principal,
};
use impostor_configs::ImpostorConfig;
use log::info;

/// Components shared by the host's request handlers.
pub struct AuthComponents {
    pub pipeline: Arc<AuthPipeline>,
    /// Direct handle for ending impersonation sessions by token
    pub impostor: Arc<ImpostorBackend>,
    pub identity: Arc<dyn IdentityStore>,
    pub audit: Arc<dyn AuditLogStore>,
}

/// Intake limits derived from the `[auth]` section.
pub fn intake_settings(config: &ImpostorConfig) -> IntakeSettings {
    IntakeSettings {
        max_username_length: config.auth.max_username_length,
    }
}

/// Build the default pipeline: plain password login first, then impersonation.
pub fn build_auth(
    config: &ImpostorConfig,
    identity: Arc<dyn IdentityStore>,
    audit: Arc<dyn AuditLogStore>,
) -> Result<AuthComponents> {
    let privilege: ImpersonationPrivilege = config
        .auth
        .required_privilege
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    // Decoy verifications must cost the same as checks against stored hashes
    let verifier = Arc::new(PasswordVerifier::new(config.auth.bcrypt_cost));
    let impostor = Arc::new(
        ImpostorBackend::new(identity.clone(), audit.clone(), privilege)
            .with_verifier(verifier.clone()),
    );
    let pipeline = AuthPipeline::new(intake_settings(config))
        .with_backend(Arc::new(PasswordBackend::new(identity.clone()).with_verifier(verifier)))
        .with_backend(impostor.clone());

    info!(
        "Authentication pipeline ready: backends={:?}, impersonation privilege={}, max username length={}",
        pipeline.backend_names(),
        privilege,
        config.auth.max_username_length
    );

    Ok(AuthComponents {
        pipeline: Arc::new(pipeline),
        impostor,
        identity,
        audit,
    })
}

/// Build the default pipeline when only the pipeline itself is needed.
pub fn build_pipeline(
    config: &ImpostorConfig,
    identity: Arc<dyn IdentityStore>,
    audit: Arc<dyn AuditLogStore>,
) -> Result<Arc<AuthPipeline>> {
    Ok(build_auth(config, identity, audit)?.pipeline)
}

/// Create an active principal whose password is hashed with the configured cost.
pub async fn create_principal(
    config: &ImpostorConfig,
    username: &str,
    password: &str,
) -> Result<Principal> {
    let hash = hash_password(password, Some(config.auth.bcrypt_cost)).await?;
    Ok(Principal::new(username, hash))
}
