//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SWEETS_API_BASE_URL` - Root URL of the sweets API (default: http://127.0.0.1:3000)
//! - `SWEETS_API_TOKEN` - Bearer token attached to every request
//! - `SWEETS_API_USERNAME` / `SWEETS_API_PASSWORD` - Login used to obtain or
//!   refresh the token when it is missing or expired (set both or neither)
//! - `STOREFRONT_CURRENCY` - Symbol prefixed to prices (default: ₹)
//!
//! At least one of `SWEETS_API_TOKEN` or the username/password pair is
//! required.

use std::time::UNIX_EPOCH;

use secrecy::{ExposeSecret, SecretString};
use sweets_core::{Credential, LoginRequest};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_CURRENCY: &str = "₹";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No credential configured: set SWEETS_API_TOKEN or SWEETS_API_USERNAME/SWEETS_API_PASSWORD")]
    MissingCredential,
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Root URL all API calls are issued against
    pub api_base_url: String,
    /// Static bearer token, if one was supplied
    pub token: Option<SecretString>,
    /// Login used to obtain a fresh token
    pub login: Option<LoginConfig>,
    /// Currency symbol prefixed to prices
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct LoginConfig {
    pub username: String,
    pub password: SecretString,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = get("SWEETS_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar(
                "SWEETS_API_BASE_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }

        let token = get("SWEETS_API_TOKEN").map(SecretString::from);

        let login = match (get("SWEETS_API_USERNAME"), get("SWEETS_API_PASSWORD")) {
            (Some(username), Some(password)) => Some(LoginConfig {
                username,
                password: SecretString::from(password),
            }),
            (Some(_), None) => return Err(ConfigError::MissingEnvVar("SWEETS_API_PASSWORD".to_string())),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("SWEETS_API_USERNAME".to_string())),
            (None, None) => None,
        };

        if token.is_none() && login.is_none() {
            return Err(ConfigError::MissingCredential);
        }

        Ok(Self {
            api_base_url,
            token,
            login,
            currency: get("STOREFRONT_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        })
    }

    /// Credential to start with. Without a configured token this is an
    /// already-expired placeholder, so the first action logs in.
    pub fn initial_credential(&self) -> Credential {
        match &self.token {
            Some(token) => Credential::bearer(token.expose_secret()),
            None => Credential::bearer("").with_expiry(Some(UNIX_EPOCH)),
        }
    }

    pub fn login_request(&self) -> Option<LoginRequest> {
        self.login.as_ref().map(|login| LoginRequest {
            username: login.username.clone(),
            password: login.password.expose_secret().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::SystemTime;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn token_only_uses_defaults() {
        let config = load(&[("SWEETS_API_TOKEN", "abc")]).unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:3000");
        assert_eq!(config.currency, "₹");
        assert!(config.login.is_none());
        assert!(!config.initial_credential().is_expired_at(SystemTime::now()));
    }

    #[test]
    fn missing_credential_is_rejected() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::MissingCredential);
        assert_eq!(
            load(&[("SWEETS_API_TOKEN", "  ")]).unwrap_err(),
            ConfigError::MissingCredential
        );
    }

    #[test]
    fn login_requires_both_halves() {
        assert_eq!(
            load(&[("SWEETS_API_USERNAME", "demo")]).unwrap_err(),
            ConfigError::MissingEnvVar("SWEETS_API_PASSWORD".to_string())
        );
        assert_eq!(
            load(&[("SWEETS_API_PASSWORD", "demo")]).unwrap_err(),
            ConfigError::MissingEnvVar("SWEETS_API_USERNAME".to_string())
        );
    }

    #[test]
    fn login_without_token_starts_expired() {
        let config = load(&[("SWEETS_API_USERNAME", "demo"), ("SWEETS_API_PASSWORD", "pw")]).unwrap();
        assert!(config.initial_credential().is_expired_at(SystemTime::now()));
        let login = config.login_request().unwrap();
        assert_eq!(login.username, "demo");
        assert_eq!(login.password, "pw");
    }

    #[test]
    fn base_url_must_be_http() {
        let err = load(&[("SWEETS_API_TOKEN", "t"), ("SWEETS_API_BASE_URL", "ftp://shop")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SWEETS_API_BASE_URL"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("SWEETS_API_TOKEN", "t"),
            ("SWEETS_API_BASE_URL", "https://sweet-shop.example"),
            ("STOREFRONT_CURRENCY", "$"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url, "https://sweet-shop.example");
        assert_eq!(config.currency, "$");
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = load(&[
            ("SWEETS_API_TOKEN", "tok-123"),
            ("SWEETS_API_USERNAME", "demo"),
            ("SWEETS_API_PASSWORD", "pw-456"),
        ])
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("tok-123"));
        assert!(!debug.contains("pw-456"));
    }
}
