//! Client configuration, read from the environment or built explicitly.

use std::time::Duration;
use thiserror::Error;

/// Default TMDB API root
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default response language
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing {0} environment variable")]
    MissingVar(&'static str),

    /// A variable is set but cannot be parsed
    #[error("Invalid value for {var}: {value:?}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Raw value found
        value: String,
    },
}

/// How requests authenticate against TMDB.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// v4 read-access token, sent as `Authorization: Bearer`
    Bearer(String),
    /// v3 API key, sent as the `api_key` query parameter
    ApiKey(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Credentials::Bearer(<redacted>)"),
            Self::ApiKey(_) => f.write_str("Credentials::ApiKey(<redacted>)"),
        }
    }
}

/// TMDB client configuration.
///
/// # Example
///
/// ```
/// use movie_search_tmdb::{Credentials, TmdbConfig};
/// use std::time::Duration;
///
/// let config = TmdbConfig::new(Credentials::ApiKey("key".into()))
///     .with_language("fr-FR")
///     .with_timeout(Duration::from_secs(3));
/// assert_eq!(config.language, "fr-FR");
/// ```
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// Authentication mode
    pub credentials: Credentials,
    /// API root, without trailing slash
    pub base_url: String,
    /// Response language (`language` query parameter)
    pub language: String,
    /// Whether adult titles are included in results
    pub include_adult: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl TmdbConfig {
    /// Configuration with defaults for everything but credentials
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            include_adult: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read configuration from the process environment
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `TMDB_API_TOKEN` or `TMDB_API_KEY` | required (token wins) |
    /// | `TMDB_BASE_URL` | `https://api.themoviedb.org/3` |
    /// | `TMDB_LANGUAGE` | `en-US` |
    /// | `TMDB_INCLUDE_ADULT` | `false` |
    /// | `TMDB_TIMEOUT_SECS` | `10` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when no credentials are set and
    /// [`ConfigError::Invalid`] for unparsable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read configuration through a variable lookup function
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`TmdbConfig::from_env`].
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let credentials = match (get("TMDB_API_TOKEN"), get("TMDB_API_KEY")) {
            (Some(token), _) => Credentials::Bearer(token),
            (None, Some(key)) => Credentials::ApiKey(key),
            (None, None) => return Err(ConfigError::MissingVar("TMDB_API_TOKEN")),
        };

        let mut config = Self::new(credentials);

        if let Some(base_url) = get("TMDB_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(language) = get("TMDB_LANGUAGE") {
            config.language = language;
        }
        if let Some(value) = get("TMDB_INCLUDE_ADULT") {
            config.include_adult = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "TMDB_INCLUDE_ADULT",
                        value,
                    });
                },
            };
        }
        if let Some(value) = get("TMDB_TIMEOUT_SECS") {
            let secs = value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "TMDB_TIMEOUT_SECS",
                value: value.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the API root (a trailing slash is stripped)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the response language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Include or exclude adult titles
    #[must_use]
    pub const fn with_include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_token_wins_over_key() {
        let config = TmdbConfig::from_vars(vars(&[("TMDB_API_TOKEN", "tok"), ("TMDB_API_KEY", "key")]));
        assert_eq!(config.map(|c| c.credentials), Ok(Credentials::Bearer("tok".into())));
    }

    #[test]
    fn test_defaults_with_api_key() {
        let Ok(config) = TmdbConfig::from_vars(vars(&[("TMDB_API_KEY", "key")])) else {
            unreachable!("api key is set");
        };

        assert_eq!(config.credentials, Credentials::ApiKey("key".into()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.language, DEFAULT_LANGUAGE);
        assert!(!config.include_adult);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_missing_credentials() {
        let result = TmdbConfig::from_vars(vars(&[("TMDB_API_KEY", "  ")]));
        assert_eq!(result.err(), Some(ConfigError::MissingVar("TMDB_API_TOKEN")));
    }

    #[test]
    fn test_overrides() {
        let Ok(config) = TmdbConfig::from_vars(vars(&[
            ("TMDB_API_KEY", "key"),
            ("TMDB_BASE_URL", "http://localhost:8080/3/"),
            ("TMDB_LANGUAGE", "de-DE"),
            ("TMDB_INCLUDE_ADULT", "yes"),
            ("TMDB_TIMEOUT_SECS", "3"),
        ])) else {
            unreachable!("all values are valid");
        };

        assert_eq!(config.base_url, "http://localhost:8080/3");
        assert_eq!(config.language, "de-DE");
        assert!(config.include_adult);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values() {
        let result = TmdbConfig::from_vars(vars(&[("TMDB_API_KEY", "key"), ("TMDB_TIMEOUT_SECS", "soon")]));
        assert_eq!(
            result.err(),
            Some(ConfigError::Invalid {
                var: "TMDB_TIMEOUT_SECS",
                value: "soon".into()
            })
        );

        let result = TmdbConfig::from_vars(vars(&[("TMDB_API_KEY", "key"), ("TMDB_INCLUDE_ADULT", "maybe")]));
        assert!(matches!(result, Err(ConfigError::Invalid { var: "TMDB_INCLUDE_ADULT", .. })));
    }

    #[test]
    fn test_credentials_are_redacted() {
        let debug = format!("{:?}", Credentials::Bearer("secret".into()));
        assert!(!debug.contains("secret"));
    }
}
