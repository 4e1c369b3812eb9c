use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables, optionally
/// overridden by command-line flags.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub http_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("PORTAL_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .context("PORTAL_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_base: normalize_base(
                &std::env::var("PORTAL_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            ),
            http_timeout: Duration::from_secs(timeout_secs),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Applies the `--api-base` flag, which wins over the environment.
    pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
        if let Some(base) = api_base {
            self.api_base = normalize_base(&base);
        }
        self
    }
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_strips_trailing_slashes() {
        assert_eq!(normalize_base("http://localhost:5000//"), "http://localhost:5000");
        assert_eq!(normalize_base(" http://api.local "), "http://api.local");
    }

    #[test]
    fn test_flag_overrides_base() {
        let config = Config {
            api_base: DEFAULT_API_BASE.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rust_log: "info".to_string(),
        }
        .with_api_base(Some("http://10.0.0.5:8000/".to_string()));
        assert_eq!(config.api_base, "http://10.0.0.5:8000");
    }

    #[test]
    fn test_missing_flag_keeps_env_base() {
        let config = Config {
            api_base: "http://from-env".to_string(),
            http_timeout: Duration::from_secs(5),
            rust_log: "debug".to_string(),
        }
        .with_api_base(None);
        assert_eq!(config.api_base, "http://from-env");
    }
}
