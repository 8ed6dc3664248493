//! Impostor bootstrap library
//!
//! Wires configuration, logging and the authentication pipeline together
//! for a host application.

pub mod lifecycle;
pub mod logging;

pub use lifecycle::{build_auth, build_pipeline, AuthComponents};
pub use logging::init_logging;
