//! In-memory implementations of the store traits.
//!
//! Used by tests and by hosts that keep users in process.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{AuditLogStore, IdentityStore};
use crate::error::{AuthError, AuthResult};
use crate::models::{AuditLogEntry, ImpostorToken, Principal, UserName};

/// Identity store backed by a `HashMap` keyed by username.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    users: RwLock<HashMap<UserName, Principal>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a principal.
    pub fn insert(&self, principal: Principal) {
        self.users.write().insert(principal.username.clone(), principal);
    }

    pub fn remove(&self, username: &UserName) -> Option<Principal> {
        self.users.write().remove(username)
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait::async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Principal>> {
        Ok(self.users.read().get(username).cloned())
    }
}

/// Audit log kept in insertion order.
///
/// Entries and the token index share one lock, so the duplicate-token check
/// and the push happen atomically and readers never see a partial entry.
#[derive(Default)]
pub struct InMemoryAuditLog {
    state: RwLock<AuditLogState>,
}

#[derive(Default)]
struct AuditLogState {
    entries: Vec<AuditLogEntry>,
    by_token: HashMap<ImpostorToken, usize>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in write order.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.state.read().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }
}

#[async_trait::async_trait]
impl AuditLogStore for InMemoryAuditLog {
    async fn append(&self, entry: &AuditLogEntry) -> AuthResult<()> {
        if entry.token.as_str().trim().is_empty() {
            return Err(AuthError::AuditLog("audit token cannot be empty".to_string()));
        }

        let mut state = self.state.write();
        if state.by_token.contains_key(&entry.token) {
            return Err(AuthError::AuditLog(format!(
                "audit token already recorded for {}",
                entry.impostor
            )));
        }

        let position = state.entries.len();
        state.by_token.insert(entry.token.clone(), position);
        state.entries.push(entry.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &ImpostorToken) -> AuthResult<Option<AuditLogEntry>> {
        let state = self.state.read();
        Ok(state.by_token.get(token).map(|&position| state.entries[position].clone()))
    }

    async fn mark_logged_out(&self, token: &ImpostorToken, at: DateTime<Utc>) -> AuthResult<bool> {
        let mut state = self.state.write();
        let Some(&position) = state.by_token.get(token) else {
            return Ok(false);
        };

        let entry = &mut state.entries[position];
        if entry.logged_out.is_some() {
            return Ok(false);
        }
        entry.logged_out = Some(at);
        Ok(true)
    }
}
