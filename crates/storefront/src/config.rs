//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TESTMART_DATA_DIR` - Directory for file-backed storage (default: .testmart)
//! - `TESTMART_BASE_URL` - Storefront URL used by generated scripts (default: <http://localhost:8080>)
//! - `TESTMART_ALERT_INTERVAL_SECS` - Price alert evaluation interval (default: 30)
//! - `TESTMART_ALERT_PROBABILITY` - Chance per alert per tick of a simulated drop (default: 0.1)
//! - `TESTMART_RNG_SEED` - Seed for every random policy, for reproducible runs

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".testmart";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_ALERT_INTERVAL_SECS: u64 = 30;
const DEFAULT_ALERT_PROBABILITY: f64 = 0.1;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Directory holding one JSON file per storage key
    pub data_dir: PathBuf,
    /// Base URL that generated automation scripts navigate to
    pub base_url: Url,
    /// How often the price alert monitor evaluates alerts
    pub alert_interval: Duration,
    /// Probability in `[0, 1]` that an alert sees a simulated drop on a tick
    pub alert_probability: f64,
    /// Seed for random policies; entropy-seeded when absent
    pub rng_seed: Option<u64>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// `from_lookup(|_| None)` yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparseable or out-of-range
    /// values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup("TESTMART_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let base_url = lookup("TESTMART_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("TESTMART_BASE_URL".to_string(), e.to_string())
        })?;

        let alert_interval = match lookup("TESTMART_ALERT_INTERVAL_SECS") {
            Some(raw) => parse_interval(&raw)?,
            None => Duration::from_secs(DEFAULT_ALERT_INTERVAL_SECS),
        };

        let alert_probability = match lookup("TESTMART_ALERT_PROBABILITY") {
            Some(raw) => parse_probability(&raw)?,
            None => DEFAULT_ALERT_PROBABILITY,
        };

        let rng_seed = lookup("TESTMART_RNG_SEED")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("TESTMART_RNG_SEED".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            data_dir,
            base_url,
            alert_interval,
            alert_probability,
            rng_seed,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("TESTMART_ALERT_INTERVAL_SECS".to_string(), e.to_string())
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "TESTMART_ALERT_INTERVAL_SECS".to_string(),
            "must be at least 1 second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_probability(raw: &str) -> Result<f64, ConfigError> {
    let p = raw.trim().parse::<f64>().map_err(|e| {
        ConfigError::InvalidEnvVar("TESTMART_ALERT_PROBABILITY".to_string(), e.to_string())
    })?;
    if !(0.0..=1.0).contains(&p) {
        return Err(ConfigError::InvalidEnvVar(
            "TESTMART_ALERT_PROBABILITY".to_string(),
            format!("must be between 0 and 1 (got {p})"),
        ));
    }
    Ok(p)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".testmart"));
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.alert_interval, Duration::from_secs(30));
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("TESTMART_DATA_DIR", "/tmp/tm"),
            ("TESTMART_BASE_URL", "https://shop.example.test"),
            ("TESTMART_ALERT_INTERVAL_SECS", "5"),
            ("TESTMART_ALERT_PROBABILITY", "1"),
            ("TESTMART_RNG_SEED", "42"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/tm"));
        assert_eq!(config.base_url.host_str(), Some("shop.example.test"));
        assert_eq!(config.alert_interval, Duration::from_secs(5));
        assert!((config.alert_probability - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    fn test_invalid_base_url() {
        let err =
            StorefrontConfig::from_lookup(lookup_from(&[("TESTMART_BASE_URL", "not a url")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "TESTMART_BASE_URL"));
    }

    #[test]
    fn test_probability_out_of_range() {
        let result =
            StorefrontConfig::from_lookup(lookup_from(&[("TESTMART_ALERT_PROBABILITY", "1.5")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result =
            StorefrontConfig::from_lookup(lookup_from(&[("TESTMART_ALERT_INTERVAL_SECS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_seed() {
        let result = StorefrontConfig::from_lookup(lookup_from(&[("TESTMART_RNG_SEED", "-3")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
