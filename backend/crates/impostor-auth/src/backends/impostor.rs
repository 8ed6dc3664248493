//! Impersonation backend.
//!
//! Authenticates `"<actor> as <target>"` logins: the actor's password is
//! checked, the actor must hold the configured privilege, and on success the
//! *target* principal is returned after an audit entry has been written.
//!
//! ```text
//! parse ─▶ find actor ─▶ verify password ─┬─▶ no target / self ─▶ Some(actor)
//!                                          └─▶ privileged? ─┬─ no ─▶ None
//!                                                           └─ yes ─▶ find target ─┬─ missing ─▶ None
//!                                                                                  └─ append log ─▶ Some(target)
//! ```
//!
//! Every denial looks the same to the caller. The cause is only visible in
//! debug-level tracing.

use chrono::Utc;
use std::sync::Arc;
use tracing::Instrument;

use super::AuthBackend;
use crate::credentials::{Credentials, ImpersonationRequest};
use crate::error::AuthResult;
use crate::models::{AuditLogEntry, ConnectionInfo, ImpostorToken, Principal, UserName};
use crate::password::PasswordVerifier;
use crate::policy::{can_impersonate, ImpersonationPrivilege};
use crate::repository::{AuditLogStore, IdentityStore};

pub const IMPOSTOR_BACKEND: &str = "impostor";

/// Why a login was refused. Never returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    UnknownActor,
    InactiveActor,
    WrongPassword,
    NotPrivileged,
    UnknownTarget,
}

impl DenialReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenialReason::UnknownActor => "unknown_actor",
            DenialReason::InactiveActor => "inactive_actor",
            DenialReason::WrongPassword => "wrong_password",
            DenialReason::NotPrivileged => "not_privileged",
            DenialReason::UnknownTarget => "unknown_target",
        }
    }
}

enum Resolution {
    Actor(Principal),
    Impersonation { actor: Principal, target: Principal },
    Denied(DenialReason),
}

pub struct ImpostorBackend {
    identity: Arc<dyn IdentityStore>,
    audit: Arc<dyn AuditLogStore>,
    privilege: ImpersonationPrivilege,
    verifier: Arc<PasswordVerifier>,
}

impl ImpostorBackend {
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        audit: Arc<dyn AuditLogStore>,
        privilege: ImpersonationPrivilege,
    ) -> Self {
        Self {
            identity,
            audit,
            privilege,
            verifier: Arc::new(PasswordVerifier::default()),
        }
    }

    /// Share a verifier whose decoy cost matches the stored hashes.
    pub fn with_verifier(mut self, verifier: Arc<PasswordVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn privilege(&self) -> ImpersonationPrivilege {
        self.privilege
    }

    /// Authenticate a raw, possibly composite, username and a password.
    ///
    /// Returns the actor for ordinary logins (including `"a as a"`), the
    /// target for an authorized impersonation, and `None` for any denial.
    /// An impersonation is only reported once its audit entry is stored; a
    /// failing audit store surfaces as `Err` and no principal.
    pub async fn authenticate_username_password(
        &self,
        raw_username: &str,
        password: &str,
        connection: &ConnectionInfo,
    ) -> AuthResult<Option<Principal>> {
        let request = ImpersonationRequest::parse(raw_username, password);
        let span = tracing::info_span!(
            "auth.impostor",
            actor_name = request.actor.as_str(),
            target_name = request.target.as_ref().map(UserName::as_str),
            outcome = tracing::field::Empty
        );

        async move {
            match self.resolve(&request).await? {
                Resolution::Actor(actor) => {
                    tracing::Span::current().record("outcome", "actor");
                    Ok(Some(actor))
                },
                Resolution::Impersonation { actor, target } => {
                    let entry = AuditLogEntry::new(&actor, &target, connection.ip_address());
                    if let Err(e) = self.audit.append(&entry).await {
                        tracing::Span::current().record("outcome", "audit_failed");
                        log::error!(
                            "Refusing impersonation of '{}' by '{}': audit log write failed: {}",
                            target.username,
                            actor.username,
                            e
                        );
                        return Err(e);
                    }

                    tracing::Span::current().record("outcome", "impersonated");
                    tracing::info!(
                        impostor = %actor.username,
                        imposted_as = %target.username,
                        impostor_ip = ?entry.impostor_ip,
                        "Impersonation granted"
                    );
                    Ok(Some(target))
                },
                Resolution::Denied(reason) => {
                    tracing::Span::current().record("outcome", "denied");
                    tracing::debug!(reason = reason.as_str(), "Authentication denied");
                    Ok(None)
                },
            }
        }
        .instrument(span)
        .await
    }

    /// Close the impersonation session identified by `token`.
    ///
    /// Returns `false` if the token is unknown or already closed.
    pub async fn end_impersonation(&self, token: &ImpostorToken) -> AuthResult<bool> {
        let closed = self.audit.mark_logged_out(token, Utc::now()).await?;
        if closed {
            tracing::info!("Impersonation session ended");
        }
        Ok(closed)
    }

    async fn resolve(&self, request: &ImpersonationRequest) -> AuthResult<Resolution> {
        // One bcrypt verification happens whatever the actor lookup returned,
        // so the denial cause does not show in response time.
        let actor = self.identity.find_by_username(&request.actor).await?;
        let verified = self.verifier.check(actor.as_ref(), &request.password).await;

        let Some(actor) = actor else {
            return Ok(Resolution::Denied(DenialReason::UnknownActor));
        };

        if !verified {
            return Ok(Resolution::Denied(DenialReason::WrongPassword));
        }

        if !actor.is_active {
            return Ok(Resolution::Denied(DenialReason::InactiveActor));
        }

        let Some(target_name) = request.impersonated() else {
            return Ok(Resolution::Actor(actor));
        };

        // The target is not looked up for unprivileged actors so a refusal
        // says nothing about whether it exists.
        if !can_impersonate(&actor, self.privilege) {
            return Ok(Resolution::Denied(DenialReason::NotPrivileged));
        }

        match self.identity.find_by_username(target_name).await? {
            Some(target) if target.is_active => Ok(Resolution::Impersonation { actor, target }),
            _ => Ok(Resolution::Denied(DenialReason::UnknownTarget)),
        }
    }
}

#[async_trait::async_trait]
impl AuthBackend for ImpostorBackend {
    fn name(&self) -> &'static str {
        IMPOSTOR_BACKEND
    }

    async fn authenticate(
        &self,
        credentials: &Credentials,
        connection: &ConnectionInfo,
    ) -> AuthResult<Option<Principal>> {
        self.authenticate_username_password(&credentials.username, &credentials.password, connection)
            .await
    }

    async fn get_principal(&self, username: &UserName) -> AuthResult<Option<Principal>> {
        Ok(self.identity.find_by_username(username).await?.filter(|p| p.is_active))
    }
}
