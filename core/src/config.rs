//! Client configuration, read from the environment or built by hand.

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.fitbit.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// OAuth 2.0 access token obtained out of band, sent as a bearer token.
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read `FITBIT_API_BASE_URL`, `FITBIT_ACCESS_TOKEN` and
    /// `FITBIT_TIMEOUT_SECS`, falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let defaults = Self::default();
        let base_url = lookup("FITBIT_API_BASE_URL").unwrap_or(defaults.base_url);
        let access_token = lookup("FITBIT_ACCESS_TOKEN").filter(|t| !t.is_empty());
        let timeout = match lookup("FITBIT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ApiError::Config(format!("FITBIT_TIMEOUT_SECS must be a whole number, got {raw:?}"))
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.timeout,
        };
        Ok(Self {
            base_url,
            access_token,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "https://api.fitbit.com");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("FITBIT_API_BASE_URL", "http://127.0.0.1:3000"),
            ("FITBIT_ACCESS_TOKEN", "secret"),
            ("FITBIT_TIMEOUT_SECS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn empty_token_counts_as_unset() {
        let config = ClientConfig::from_lookup(lookup(&[("FITBIT_ACCESS_TOKEN", "")])).unwrap();
        assert!(config.access_token.is_none());
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("FITBIT_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
