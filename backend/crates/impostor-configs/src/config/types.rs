use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration for the impostor authentication layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpostorConfig {
    #[serde(default, alias = "authentication")]
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Authentication and impersonation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Principal flag an actor must hold to log in as someone else.
    /// Only "superuser" is recognised; staff status alone never qualifies.
    #[serde(default = "default_required_privilege")]
    pub required_privilege: String,

    /// Maximum accepted length of the username field, in characters.
    /// Must fit the composite "<actor> as <target>" form.
    #[serde(default = "default_max_username_length")]
    pub max_username_length: usize,

    /// Bcrypt cost used when hashing passwords for the bundled identity store
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            required_privilege: default_required_privilege(),
            max_username_length: default_max_username_length(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files (default: "./logs")
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    /// File name of the main log inside `logs_path`
    #[serde(default = "default_log_file_name")]
    pub file_name: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides
    /// Configure via a TOML table:
    /// [logging.targets]
    /// impostor_auth = "debug"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            file_name: default_log_file_name(),
            log_to_console: true,
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

impl LoggingSettings {
    /// Full path of the main log file.
    pub fn file_path(&self) -> String {
        std::path::Path::new(&self.logs_path)
            .join(&self.file_name)
            .to_string_lossy()
            .into_owned()
    }
}
