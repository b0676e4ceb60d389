//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup. A `.env` file is honored for local
//! development.

use std::env;

/// Default IANA zone used to interpret routine wall-clock times.
pub const DEFAULT_TIME_ZONE: &str = "Europe/Paris";

/// Which sorted-store adapter backs the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid("STORE_BACKEND")),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// The single account allowed to log in
    pub app_username: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Storage adapter selection
    pub store_backend: StoreBackend,
    /// Reference zone for routine materialization
    pub time_zone: chrono_tz::Tz,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,

    // --- Secrets ---
    /// Argon2 PHC string for the account password
    pub app_password_hash: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Config for tests only.
    ///
    /// The password hash is left empty; tests that exercise login build
    /// their own hash.
    pub fn test_default() -> Self {
        Self {
            app_username: "athlete".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            store_backend: StoreBackend::Memory,
            time_zone: chrono_tz::Europe::Paris,
            secure_cookies: false,
            app_password_hash: String::new(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let time_zone = env::var("JOURNAL_TIME_ZONE")
            .unwrap_or_else(|_| DEFAULT_TIME_ZONE.to_string())
            .parse::<chrono_tz::Tz>()
            .map_err(|_| ConfigError::Invalid("JOURNAL_TIME_ZONE"))?;

        let store_backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .parse()?;

        Ok(Self {
            app_username: env::var("APP_USERNAME")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("APP_USERNAME"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            store_backend,
            time_zone,
            secure_cookies: env::var("SECURE_COOKIES")
                .map(|v| matches!(v.trim(), "1" | "true"))
                .unwrap_or(false),

            app_password_hash: env::var("APP_PASSWORD_HASH")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("APP_PASSWORD_HASH"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("APP_USERNAME", " athlete ");
        env::set_var("APP_PASSWORD_HASH", "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("STORE_BACKEND", "memory");
        env::remove_var("JOURNAL_TIME_ZONE");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.app_username, "athlete");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.time_zone, chrono_tz::Europe::Paris);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(
            "Firestore".parse::<StoreBackend>().unwrap(),
            StoreBackend::Firestore
        );
        assert!("redis".parse::<StoreBackend>().is_err());
    }
}
