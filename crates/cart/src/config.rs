//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GARVAL_ORIGIN` - Public storefront URL; its origin absolutizes image paths
//!
//! ## Optional
//! - `GARVAL_API_BASE` - Storefront API method prefix
//!   (default: `{origin}/api/method/garval_store.api`)
//! - `GARVAL_CART_DIR` - Directory holding the persisted cart (default: `.garval`)
//! - `GARVAL_CURRENCY` - ISO currency code used when formatting totals (default: EUR)
//! - `GARVAL_LANG` - Message language, `es` or `en` (default: es)
//! - `GARVAL_HTTP_TIMEOUT_SECS` - Checkout request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use garval_core::CurrencyCode;
use thiserror::Error;
use url::Url;

use crate::events::Locale;
use crate::image::StoreOrigin;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Storefront origin used for image URLs
    pub origin: StoreOrigin,
    /// Storefront API method prefix, without trailing slash
    pub api_base: Url,
    /// Directory of the file storage backend
    pub cart_dir: PathBuf,
    /// Currency used when formatting amounts
    pub currency: CurrencyCode,
    /// Language for user-facing messages
    pub locale: Locale,
    /// Timeout for the checkout request
    pub http_timeout: Duration,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let origin_raw = env.required("GARVAL_ORIGIN")?;
        let origin = StoreOrigin::parse(&origin_raw)
            .map_err(|e| ConfigError::InvalidEnvVar("GARVAL_ORIGIN".to_string(), e.to_string()))?;

        let api_base_raw = env.or_default(
            "GARVAL_API_BASE",
            &format!("{origin}/api/method/garval_store.api"),
        );
        let api_base = Url::parse(api_base_raw.trim_end_matches('/')).map_err(|e| {
            ConfigError::InvalidEnvVar("GARVAL_API_BASE".to_string(), e.to_string())
        })?;

        let cart_dir = PathBuf::from(env.or_default("GARVAL_CART_DIR", ".garval"));

        let currency = env
            .or_default("GARVAL_CURRENCY", "EUR")
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GARVAL_CURRENCY".to_string(), e.to_string())
            })?;

        let locale = env
            .or_default("GARVAL_LANG", "es")
            .parse::<Locale>()
            .map_err(|e| ConfigError::InvalidEnvVar("GARVAL_LANG".to_string(), e.to_string()))?;

        let timeout_secs = env
            .or_default("GARVAL_HTTP_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GARVAL_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            origin,
            api_base,
            cart_dir,
            currency,
            locale,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get a required variable; blank values count as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("GARVAL_ORIGIN", "https://garval.es/")]).unwrap();

        assert_eq!(config.origin.as_str(), "https://garval.es");
        assert_eq!(
            config.api_base.as_str(),
            "https://garval.es/api/method/garval_store.api"
        );
        assert_eq!(config.cart_dir, PathBuf::from(".garval"));
        assert_eq!(config.currency, CurrencyCode::EUR);
        assert_eq!(config.locale, Locale::Es);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GARVAL_ORIGIN", "http://localhost:8000"),
            ("GARVAL_API_BASE", "http://api.local/api/method/garval_store.api/"),
            ("GARVAL_CART_DIR", "/tmp/cart"),
            ("GARVAL_CURRENCY", "usd"),
            ("GARVAL_LANG", "en"),
            ("GARVAL_HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(
            config.api_base.as_str(),
            "http://api.local/api/method/garval_store.api"
        );
        assert_eq!(config.cart_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(config.currency, CurrencyCode::USD);
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_origin() {
        assert!(matches!(
            load(&[]),
            Err(ConfigError::MissingEnvVar(key)) if key == "GARVAL_ORIGIN"
        ));
        assert!(matches!(
            load(&[("GARVAL_ORIGIN", "  ")]),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("GARVAL_CURRENCY", "JPY"),
            ("GARVAL_LANG", "fr"),
            ("GARVAL_HTTP_TIMEOUT_SECS", "soon"),
            ("GARVAL_API_BASE", "not a url"),
        ] {
            let result = load(&[("GARVAL_ORIGIN", "https://garval.es"), (key, value)]);
            assert!(
                matches!(&result, Err(ConfigError::InvalidEnvVar(k, _)) if k == key),
                "expected {key} to be rejected"
            );
        }
    }
}
