mod audit_log;
mod connection;
mod principal;
mod user_name;

pub use audit_log::{AuditLogEntry, ImpostorToken};
pub use connection::ConnectionInfo;
pub use principal::Principal;
pub use user_name::UserName;
