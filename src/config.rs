use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error opening configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub postgres: String,
    /// Compared verbatim, case included, against the caller's email.
    pub admin_email: String,
    pub jwt_secret: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_full_configuration() {
        let config = Config::from_json(
            r#"{
                "port": 8080,
                "postgres": "postgres://music@localhost/music",
                "admin_email": "Admin@Example.com",
                "jwt_secret": "s3cret",
                "max_connections": 12
            }"#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.admin_email, "Admin@Example.com");
        assert_eq!(config.max_connections, 12);
    }

    #[test]
    fn pool_size_defaults_to_five() {
        let config = Config::from_json(
            r#"{
                "port": 3000,
                "postgres": "postgres://x",
                "admin_email": "a@b.c",
                "jwt_secret": "k"
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn missing_admin_email_is_malformed() {
        let err =
            Config::from_json(r#"{"port": 3000, "postgres": "postgres://x", "jwt_secret": "k"}"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn unreadable_file_is_reported() {
        let err = Config::load(Path::new("/nonexistent/soundshare.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
