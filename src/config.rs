use std::env;

use thiserror::Error;

use crate::auth::password::{CredentialManager, DEFAULT_COST};
use crate::auth::token::TokenSettings;
use crate::cors::CorsSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// When absent the service runs on the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub tokens: TokenSettings,
    pub credentials: CredentialManager,
    pub cors: CorsSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let server_port = match get("SERVER_PORT") {
            Some(port) => port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "SERVER_PORT",
                reason: format!("'{}' is not a port number", port),
            })?,
            None => 8080,
        };

        let secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let expiry = get("JWT_EXPIRY").unwrap_or_else(|| "24h".to_string());
        let tokens = TokenSettings::new(secret, &expiry).map_err(|e| ConfigError::Invalid {
            key: "JWT_EXPIRY",
            reason: e.to_string(),
        })?;

        let cost = match get("BCRYPT_COST") {
            Some(cost) => cost.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: format!("'{}' is not a number", cost),
            })?,
            None => DEFAULT_COST,
        };
        let credentials = CredentialManager::new(cost).map_err(|e| ConfigError::Invalid {
            key: "BCRYPT_COST",
            reason: e.to_string(),
        })?;

        let cors = CorsSettings {
            allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|raw| CorsSettings::parse_origins(&raw))
                .unwrap_or_default(),
            development: get("APP_ENV").is_some_and(|env| env == "development"),
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            server_port,
            server_host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            tokens,
            credentials,
            cors,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
