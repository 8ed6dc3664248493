pub mod audit_store;
pub mod identity_store;
pub mod memory;

pub use audit_store::AuditLogStore;
pub use identity_store::IdentityStore;
pub use memory::{InMemoryAuditLog, InMemoryIdentityStore};
