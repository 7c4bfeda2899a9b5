//! Configuration management for the weather agent.
//!
//! Configuration can be set via environment variables (a `.env` file in the
//! working directory is loaded first, see [`load_dotenv`]):
//! - `XAI_API_KEY` - Required. Your xAI API key (https://console.x.ai/).
//! - `XAI_MODEL` - Optional. The model to use. Defaults to `grok-3-mini`.
//! - `XAI_BASE_URL` - Optional. OpenAI-compatible endpoint. Defaults to `https://api.x.ai/v1`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `10`.
//! - `AGENT_LOG_FILE` - Optional. Log file path. Defaults to `agent.log`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. HTTP request timeout. Defaults to `60`.

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "grok-3-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// xAI API key
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Base URL of the OpenAI-compatible API, without trailing slash
    pub base_url: String,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,

    /// File the log output is appended to
    pub log_file: PathBuf,

    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `XAI_API_KEY` is not set or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = api_key_from(&lookup)
            .ok_or_else(|| ConfigError::MissingEnvVar("XAI_API_KEY".to_string()))?;

        let model = lookup("XAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup("XAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let max_iterations = parse_var(&lookup, "MAX_ITERATIONS", 10usize)?;
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let log_file = log_file_from(&lookup);

        let request_timeout_secs = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 60u64)?;

        Ok(Self {
            api_key,
            model,
            base_url,
            max_iterations,
            log_file,
            request_timeout_secs,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_iterations: 10,
            log_file: PathBuf::from("agent.log"),
            request_timeout_secs: 60,
        }
    }
}

impl ConfigError {
    /// Extra guidance printed when startup fails on this error.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            Self::MissingEnvVar(_) => &[
                "XAI_API_KEY not found in environment variables or .env file.",
                "Please check your .env file or set the environment variable.",
                "You can get an API key from: https://console.x.ai/",
            ],
            Self::InvalidValue(..) => &[],
        }
    }
}

/// The API key from the environment. Blank values count as unset.
pub fn api_key_from_env() -> Option<String> {
    api_key_from(&|name: &str| std::env::var(name).ok())
}

/// Log file path from `AGENT_LOG_FILE`, available before the rest of the config.
pub fn log_file_from_env() -> PathBuf {
    log_file_from(&|name: &str| std::env::var(name).ok())
}

fn api_key_from<F>(lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("XAI_API_KEY").filter(|key| !key.trim().is_empty())
}

fn log_file_from<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("AGENT_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("agent.log"))
}

/// Shorten a secret to its first 10 characters followed by `...`.
pub fn key_preview(key: &str) -> String {
    let prefix: String = key.chars().take(10).collect();
    format!("{}...", prefix)
}

/// Load variables from a `.env` file in the working directory, if one exists.
///
/// Returns the path that was loaded, or `None` when there is no file.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenv::Error> {
    match dotenv::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "XAI_API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[("XAI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("XAI_API_KEY", "xai-test")]))
            .expect("config");
        assert_eq!(config.api_key, "xai-test");
        assert_eq!(config.model, "grok-3-mini");
        assert_eq!(config.base_url, "https://api.x.ai/v1");
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.log_file, PathBuf::from("agent.log"));
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            ("XAI_API_KEY", "k"),
            ("XAI_BASE_URL", "http://localhost:8080/v1/"),
        ]))
        .expect("config");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn invalid_number_reports_variable_name() {
        let err = Config::from_lookup(lookup_from(&[
            ("XAI_API_KEY", "k"),
            ("MAX_ITERATIONS", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "MAX_ITERATIONS"));
    }

    #[test]
    fn invalid_number_with_key_set_carries_no_key_hints() {
        let err = Config::from_lookup(lookup_from(&[
            ("XAI_API_KEY", "xai-test"),
            ("REQUEST_TIMEOUT_SECS", "x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "REQUEST_TIMEOUT_SECS"));
        assert!(err.hints().is_empty());
    }

    #[test]
    fn missing_key_hints_point_at_console() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err.hints().len(), 3);
        assert!(err.hints()[0].starts_with("XAI_API_KEY not found"));
    }

    #[test]
    fn key_lookup_ignores_blank_values() {
        assert_eq!(api_key_from(&lookup_from(&[("XAI_API_KEY", "  ")])), None);
        assert_eq!(api_key_from(&lookup_from(&[])), None);
        assert_eq!(
            api_key_from(&lookup_from(&[("XAI_API_KEY", "xai-1")])).as_deref(),
            Some("xai-1")
        );
    }

    #[test]
    fn log_file_override() {
        assert_eq!(
            log_file_from(&lookup_from(&[("AGENT_LOG_FILE", "/tmp/w.log")])),
            PathBuf::from("/tmp/w.log")
        );
        assert_eq!(log_file_from(&lookup_from(&[])), PathBuf::from("agent.log"));
    }

    #[test]
    fn zero_iterations_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("XAI_API_KEY", "k"),
            ("MAX_ITERATIONS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_, _)));
    }

    #[test]
    fn preview_keeps_ten_chars() {
        assert_eq!(key_preview("xai-abcdefghijklmnop"), "xai-abcdef...");
        assert_eq!(key_preview("short"), "short...");
    }
}
