//! Impersonation permission checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Principal;

/// Principal flag an actor must hold to log in as another account.
///
/// Passed to the impostor backend at construction instead of being read from
/// global settings. Staff status is deliberately not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpersonationPrivilege {
    #[default]
    Superuser,
}

impl ImpersonationPrivilege {
    /// Whether `principal` carries this privilege.
    #[inline]
    pub fn is_held_by(self, principal: &Principal) -> bool {
        match self {
            ImpersonationPrivilege::Superuser => principal.is_superuser,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImpersonationPrivilege::Superuser => "superuser",
        }
    }
}

impl fmt::Display for ImpersonationPrivilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpersonationPrivilege {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "superuser" => Ok(ImpersonationPrivilege::Superuser),
            other => Err(format!("Unknown impersonation privilege '{}'", other)),
        }
    }
}

/// Check whether `actor` may log in as another account.
///
/// Inactive principals never may, whatever their flags.
#[inline]
pub fn can_impersonate(actor: &Principal, privilege: ImpersonationPrivilege) -> bool {
    actor.is_active && privilege.is_held_by(actor)
}
