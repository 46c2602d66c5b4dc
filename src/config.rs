//! Runtime configuration from `.env` and the process environment.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Default model when QUILL_MODEL is not set.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default API base URL when QUILL_OPENAI_BASE_URL is not set.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default HTTP timeout for OpenAI requests (60 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable to override the request timeout.
const TIMEOUT_ENV_VAR: &str = "QUILL_OPENAI_TIMEOUT";

/// Resolved configuration for a quill run.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from `.env` and the environment.
    ///
    /// `.env` loading is best-effort; a missing file is fine. Only
    /// OPENAI_API_KEY is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let api_key = match env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => return Err(ConfigError::MissingApiKey),
        };

        let model = env::var("QUILL_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = env::var("QUILL_OPENAI_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: get_timeout(),
        })
    }
}

/// Get the configured request timeout.
///
/// Reads from QUILL_OPENAI_TIMEOUT if set, otherwise uses the default of
/// 60 seconds. Logs a warning if the variable is set but not a number.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_requires_api_key() {
        temp_env::with_var_unset("OPENAI_API_KEY", || {
            let result = Config::from_env();
            assert!(matches!(result, Err(ConfigError::MissingApiKey)));
        });
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_blank_api_key() {
        temp_env::with_var("OPENAI_API_KEY", Some("   "), || {
            let result = Config::from_env();
            assert!(matches!(result, Err(ConfigError::MissingApiKey)));
        });
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-test")),
                ("QUILL_MODEL", None),
                ("QUILL_OPENAI_BASE_URL", None),
                (TIMEOUT_ENV_VAR, None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.api_key, "sk-test");
                assert_eq!(config.model, DEFAULT_MODEL);
                assert_eq!(config.base_url, DEFAULT_BASE_URL);
                assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
            },
        );
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-test")),
                ("QUILL_MODEL", Some("gpt-4o")),
                ("QUILL_OPENAI_BASE_URL", Some("http://localhost:8080/v1/")),
                (TIMEOUT_ENV_VAR, Some("10")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.model, "gpt-4o");
                // Trailing slash is stripped so URL joining stays predictable
                assert_eq!(config.base_url, "http://localhost:8080/v1");
                assert_eq!(config.timeout, Duration::from_secs(10));
            },
        );
    }

    #[test]
    #[serial]
    fn test_get_timeout_invalid_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("not_a_number"), || {
            let timeout = get_timeout();
            assert_eq!(timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }
}
