// Impostor Authentication Library
// Lets a privileged account log in as another one with "<actor> as <target>"
// and records every such login in an audit log.

pub mod backends;
pub mod credentials;
pub mod error;
pub mod intake;
pub mod models;
pub mod password;
pub mod pipeline;
pub mod policy;
pub mod repository;

// Re-export commonly used types
pub use backends::{AuthBackend, ImpostorBackend, PasswordBackend};
pub use credentials::{parse_username, Credentials, ImpersonationRequest};
pub use error::{AuthError, AuthResult};
pub use intake::{IntakeSettings, LoginForm};
pub use models::{AuditLogEntry, ConnectionInfo, ImpostorToken, Principal, UserName};
pub use password::PasswordVerifier;
pub use pipeline::{AuthPipeline, AuthenticationResult};
pub use policy::ImpersonationPrivilege;
pub use repository::{AuditLogStore, IdentityStore, InMemoryAuditLog, InMemoryIdentityStore};
