//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for api-probe, supporting:
//! - Environment variables for all configurable values
//! - Defaults that work against the public demo service
//! - Builder-style overrides on the types that consume them
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `API_PROBE_TIMEOUT` | Per-request timeout in seconds; invalid or zero falls back | `10` |
//! | `API_PROBE_BASE_URL` | Base URL used by the demo run | `https://jsonplaceholder.typicode.com` |
//! | `API_PROBE_TOKEN` | Bearer token used by the binary when `--token` is absent | unset |
//! | `API_PROBE_LOG` | `tracing` filter directive for the binary | `warn` |
//! | `NO_COLOR` | Disable colored console output when set | unset |
//!
//! # Example
//!
//! ```bash
//! export API_PROBE_BASE_URL="http://localhost:3000"
//! export API_PROBE_TIMEOUT=3
//! export API_PROBE_LOG=api_probe=debug
//! ```

use std::env;
use std::sync::OnceLock;
use std::time::Duration;

// ============================================================================
// Default Values
// ============================================================================

/// Default per-request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default base URL for the demo run
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Default `tracing` filter directive
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the request timeout
pub const ENV_TIMEOUT: &str = "API_PROBE_TIMEOUT";

/// Environment variable for the demo base URL
pub const ENV_BASE_URL: &str = "API_PROBE_BASE_URL";

/// Environment variable for the bearer token
pub const ENV_TOKEN: &str = "API_PROBE_TOKEN";

/// Environment variable for the log filter
pub const ENV_LOG: &str = "API_PROBE_LOG";

/// Conventional switch for turning colors off (https://no-color.org)
pub const ENV_NO_COLOR: &str = "NO_COLOR";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for api-probe
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP client configuration
    pub http: HttpSettings,
    /// Console output configuration
    pub output: OutputSettings,
    /// Demo run configuration
    pub demo: DemoSettings,
}

/// HTTP-related settings
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
    /// Bearer token the binary attaches when `--token` is absent
    pub bearer_token: Option<String>,
}

/// Console output settings
#[derive(Debug, Clone)]
pub struct OutputSettings {
    /// Whether ANSI colors are emitted
    pub color: bool,
    /// `tracing` filter directive
    pub log_filter: String,
}

/// Demo-related settings
#[derive(Debug, Clone)]
pub struct DemoSettings {
    /// Base URL of the users/posts service, used when `--base-url` is absent
    pub base_url: String,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            http: HttpSettings::from_env(),
            output: OutputSettings::from_env(),
            demo: DemoSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            http: HttpSettings::defaults(),
            output: OutputSettings::defaults(),
            demo: DemoSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl HttpSettings {
    /// Create HTTP settings from environment variables
    pub fn from_env() -> Self {
        Self {
            timeout_secs: env::var(ENV_TIMEOUT)
                .ok()
                .and_then(|s| parse_timeout(&s))
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            bearer_token: env::var(ENV_TOKEN).ok().filter(|s| !s.trim().is_empty()),
        }
    }

    /// Create HTTP settings with defaults
    pub fn defaults() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            bearer_token: None,
        }
    }

    /// Timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl OutputSettings {
    /// Create output settings from environment variables
    pub fn from_env() -> Self {
        Self {
            color: color_enabled(env::var(ENV_NO_COLOR).ok().as_deref()),
            log_filter: env::var(ENV_LOG).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Create output settings with defaults
    pub fn defaults() -> Self {
        Self {
            color: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl DemoSettings {
    /// Create demo settings from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: env::var(ENV_BASE_URL)
                .map(|s| normalize_base_url(&s))
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Create demo settings with defaults
    pub fn defaults() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a timeout in whole seconds. Zero is rejected.
fn parse_timeout(value: &str) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(secs) => Some(secs),
    }
}

/// `NO_COLOR` disables colors when present and non-empty.
fn color_enabled(no_color: Option<&str>) -> bool {
    !matches!(no_color, Some(v) if !v.is_empty())
}

/// Strip trailing slashes so paths can be appended with `format!("{base}/...")`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Get the default request timeout (convenience function)
pub fn request_timeout() -> Duration {
    get().http.timeout()
}

/// Get the demo base URL (convenience function)
pub fn base_url() -> String {
    get().demo.base_url.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("10"), Some(10));
        assert_eq!(parse_timeout(" 3 "), Some(3));
        assert_eq!(parse_timeout("0"), None);
        assert_eq!(parse_timeout("ten"), None);
        assert_eq!(parse_timeout("-1"), None);
    }

    #[test]
    fn test_color_enabled() {
        assert!(color_enabled(None));
        assert!(color_enabled(Some("")));
        assert!(!color_enabled(Some("1")));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://localhost:3000/"), "http://localhost:3000");
        assert_eq!(normalize_base_url(" https://x.test// "), "https://x.test");
        assert_eq!(normalize_base_url("https://x.test/api"), "https://x.test/api");
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert_eq!(config.http.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.http.timeout(), Duration::from_secs(10));
        assert!(config.http.bearer_token.is_none());
        assert!(config.output.color);
        assert_eq!(config.demo.base_url, DEFAULT_BASE_URL);
    }
}
