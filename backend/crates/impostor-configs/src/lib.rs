//! impostor-configs
//!
//! Configuration types and loader for the impostor authentication layer.

pub mod config;

pub use config::*;
pub use config::defaults;
