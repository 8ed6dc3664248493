// Default value functions

pub fn default_true() -> bool {
    true
}

pub fn default_required_privilege() -> String {
    "superuser".to_string()
}

/// Two 30-character usernames joined by " as " need 64 characters; 70 leaves
/// some headroom without accepting unbounded input.
pub fn default_max_username_length() -> usize {
    70
}

pub fn default_bcrypt_cost() -> u32 {
    12
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

pub fn default_log_file_name() -> String {
    "impostor.log".to_string()
}
