use super::types::ImpostorConfig;
use std::fs;
use std::path::Path;

/// Separator length plus two classic 30-character usernames.
const MIN_COMPOSITE_USERNAME_LENGTH: usize = 64;

const VALID_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn read_config(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))
}

fn parse(content: &str) -> anyhow::Result<ImpostorConfig> {
    toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
}

impl ImpostorConfig {
    /// Load configuration from a TOML file
    ///
    /// Only the file contents are used. Call [`ImpostorConfig::load`] to also
    /// honour `IMPOSTOR_*` environment variables.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Self::from_toml_str(&read_config(path.as_ref())?)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let mut config = parse(content)?;
        config.finalize()?;
        Ok(config)
    }

    /// Load a TOML file, then apply environment overrides, then validate.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut config = parse(&read_config(path.as_ref())?)?;
        config.apply_env_overrides()?;
        config.finalize()?;
        Ok(config)
    }

    /// [`ImpostorConfig::load`] with overrides taken from `lookup`.
    pub fn load_with<P, F>(path: P, lookup: F) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = parse(&read_config(path.as_ref())?)?;
        config.apply_overrides(lookup)?;
        config.finalize()?;
        Ok(config)
    }

    /// Apply `IMPOSTOR_*` overrides from the process environment.
    ///
    /// Supported variables:
    /// - IMPOSTOR_LOG_LEVEL: logging.level
    /// - IMPOSTOR_LOGS_PATH: logging.logs_path
    /// - IMPOSTOR_MAX_USERNAME_LENGTH: auth.max_username_length
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("IMPOSTOR_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(path) = lookup("IMPOSTOR_LOGS_PATH") {
            self.logging.logs_path = path;
        }

        if let Some(len) = lookup("IMPOSTOR_MAX_USERNAME_LENGTH") {
            self.auth.max_username_length = len
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid IMPOSTOR_MAX_USERNAME_LENGTH value: {}", len))?;
        }

        Ok(())
    }

    /// Normalize values and validate configuration.
    pub fn finalize(&mut self) -> anyhow::Result<()> {
        self.logging.level = self.logging.level.to_lowercase();
        self.logging.format = self.logging.format.to_lowercase();
        self.auth.required_privilege = self.auth.required_privilege.trim().to_lowercase();

        self.validate()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            ));
        }

        let valid_formats = ["compact", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    VALID_LEVELS.join(", ")
                ));
            }
        }

        if self.auth.required_privilege != "superuser" {
            return Err(anyhow::anyhow!(
                "Invalid required_privilege '{}'. Must be: superuser",
                self.auth.required_privilege
            ));
        }

        if self.auth.max_username_length < MIN_COMPOSITE_USERNAME_LENGTH {
            return Err(anyhow::anyhow!(
                "max_username_length ({}) must be at least {} to fit '<actor> as <target>'",
                self.auth.max_username_length,
                MIN_COMPOSITE_USERNAME_LENGTH
            ));
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(anyhow::anyhow!(
                "bcrypt_cost ({}) must be between 4 and 31",
                self.auth.bcrypt_cost
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ImpostorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.max_username_length, 70);
        assert_eq!(config.auth.required_privilege, "superuser");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ImpostorConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_target_level() {
        let mut config = ImpostorConfig::default();
        config.logging.targets.insert("impostor_auth".to_string(), "loud".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_staff_privilege_rejected() {
        let mut config = ImpostorConfig::default();
        config.auth.required_privilege = "staff".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_username_field_must_fit_composite() {
        let mut config = ImpostorConfig::default();
        config.auth.max_username_length = 30;
        assert!(config.validate().is_err());

        config.auth.max_username_length = 64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let mut config = ImpostorConfig::default();
        config.auth.bcrypt_cost = 3;
        assert!(config.validate().is_err());
        config.auth.bcrypt_cost = 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ImpostorConfig::from_toml_str("").unwrap();
        assert_eq!(config.logging.format, "compact");
        assert!(config.logging.log_to_console);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[auth]
required_privilege = "Superuser"
max_username_length = 100

[logging]
level = "DEBUG"
format = "json"

[logging.targets]
impostor_auth = "trace"
"#
        )
        .unwrap();

        let config = ImpostorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.auth.required_privilege, "superuser");
        assert_eq!(config.auth.max_username_length, 100);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.targets.get("impostor_auth").map(String::as_str), Some("trace"));
    }

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = ImpostorConfig::from_toml_str("[auth]\nmax_username_length = 100\n").unwrap();
        let vars = [
            ("IMPOSTOR_LOG_LEVEL", "TRACE"),
            ("IMPOSTOR_LOGS_PATH", "/var/log/impostor"),
            ("IMPOSTOR_MAX_USERNAME_LENGTH", "128"),
        ];
        config.apply_overrides(lookup_from(&vars)).unwrap();
        config.finalize().unwrap();

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.logs_path, "/var/log/impostor");
        assert_eq!(config.auth.max_username_length, 128);
    }

    #[test]
    fn test_absent_overrides_keep_file_values() {
        let mut config = ImpostorConfig::from_toml_str("[auth]\nmax_username_length = 100\n").unwrap();
        config.apply_overrides(|_| None).unwrap();
        assert_eq!(config.auth.max_username_length, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_length_override_rejected() {
        let mut config = ImpostorConfig::default();
        let vars = [("IMPOSTOR_MAX_USERNAME_LENGTH", "seventy")];
        assert!(config.apply_overrides(lookup_from(&vars)).is_err());

        // Overrides go through the same validation as file values
        let vars = [("IMPOSTOR_MAX_USERNAME_LENGTH", "20")];
        config.apply_overrides(lookup_from(&vars)).unwrap();
        assert!(config.finalize().is_err());
    }

    #[test]
    fn test_load_with_applies_overrides_after_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nformat = \"JSON\"\nlevel = \"warn\"").unwrap();

        let vars = [("IMPOSTOR_LOG_LEVEL", "debug")];
        let config = ImpostorConfig::load_with(file.path(), lookup_from(&vars)).unwrap();
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "debug");

        let config = ImpostorConfig::load_with(file.path(), |_| None).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = ImpostorConfig::from_file("/definitely/not/here/impostor.toml");
        assert!(result.is_err());
    }
}
