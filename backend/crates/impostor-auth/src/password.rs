//! Bcrypt hashing for stored principal passwords.
//!
//! Bcrypt is deliberately slow, so both operations run on tokio's blocking
//! pool instead of the async worker threads.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::OnceCell;

use crate::error::{AuthError, AuthResult};
use crate::models::Principal;

/// Cost used when the caller does not pick one.
pub const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

async fn run_blocking<T, F>(job: F) -> AuthResult<T>
where
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result.map_err(|e| AuthError::HashingError(e.to_string())),
        Err(e) => Err(AuthError::HashingError(format!("bcrypt task failed: {}", e))),
    }
}

/// Hash `password` with the given cost, or [`BCRYPT_COST`] when `None`.
pub async fn hash_password(password: &str, cost: Option<u32>) -> AuthResult<String> {
    let password = password.to_owned();
    let cost = cost.unwrap_or(BCRYPT_COST);
    run_blocking(move || bcrypt::hash(password, cost)).await
}

/// Check `password` against a stored bcrypt hash.
///
/// A mismatch is `Ok(false)`. A hash that is not valid bcrypt is an error.
pub async fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    run_blocking(move || bcrypt::verify(password, &hash)).await
}

/// Password check that costs one bcrypt verification on every path.
///
/// When the principal is unknown or has no usable hash, the candidate is
/// verified against a decoy hash of the same cost and rejected, so a denial
/// takes as long as a wrong password for a real account.
pub struct PasswordVerifier {
    decoy_cost: u32,
    decoy_hash: OnceCell<String>,
    checks: AtomicU64,
}

impl PasswordVerifier {
    /// `decoy_cost` should match the cost stored principals are hashed with.
    pub fn new(decoy_cost: u32) -> Self {
        Self {
            decoy_cost,
            decoy_hash: OnceCell::new(),
            checks: AtomicU64::new(0),
        }
    }

    /// Verify `candidate` for `principal`, or burn a decoy verification if
    /// there is no principal to check.
    pub async fn check(&self, principal: Option<&Principal>, candidate: &str) -> bool {
        self.checks.fetch_add(1, Ordering::Relaxed);
        match principal {
            Some(principal) if !principal.password_hash.is_empty() => {
                principal.verify_password(candidate).await
            },
            _ => {
                self.verify_decoy(candidate).await;
                false
            },
        }
    }

    /// Number of checks performed, decoys included.
    pub fn checks(&self) -> u64 {
        self.checks.load(Ordering::Relaxed)
    }

    async fn verify_decoy(&self, candidate: &str) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| hash_password("impostor-decoy-password", Some(self.decoy_cost)))
            .await;

        match decoy {
            Ok(hash) => {
                let _ = verify_password(candidate, hash).await;
            },
            Err(e) => log::warn!("Could not prepare decoy password hash: {}", e),
        }
    }
}

impl Default for PasswordVerifier {
    fn default() -> Self {
        Self::new(BCRYPT_COST)
    }
}
