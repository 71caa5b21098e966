use analytics_api_caller::config::AnalyticsApiConfig;
use serde::{Deserialize, Deserializer, de::Error};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::query_cache::QueryCacheConfig;

/// Overrides `api_base_url` from the config file when set
pub const API_BASE_URL_ENV_VAR: &str = "CAMDASH_API_BASE_URL";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_CACHE_STALE_TIME: Duration = Duration::ZERO;
const DEFAULT_REQUEST_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_PAGE_SIZE: u32 = 100;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Config file doesn't exist in the provided (or default) path: {0}")]
    ConfigFileDoesNotExist(PathBuf),
    #[error("File exists but it could not be read to a string for parsing: {0}")]
    FileExistsButCannotBeReadToString(std::io::Error),
    #[error("Could not parse file to config; either invalid yaml or missing config: {0}")]
    FileFormatCouldNotBeParsed(serde_yml::Error),
    #[error("Env var error: {0}")]
    EnvVar(#[from] logging::GetFromEnvError),
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    api_base_url: String,
    api_proxy: Option<String>,

    #[serde(default, deserialize_with = "optional_duration_from_str")]
    request_timeout: Option<Duration>,

    #[serde(default, deserialize_with = "optional_page_size")]
    default_page_size: Option<u32>,

    #[serde(default, deserialize_with = "optional_duration_from_str")]
    cache_stale_time: Option<Duration>,
    request_retries: Option<u32>,
    #[serde(default, deserialize_with = "optional_duration_from_str")]
    retry_delay: Option<Duration>,
}

impl DashboardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DashboardConfig, ConfigError> {
        if !path.as_ref().exists() {
            return Err(ConfigError::ConfigFileDoesNotExist(
                path.as_ref().to_path_buf(),
            ));
        }

        let config_file_data = std::fs::read_to_string(path)
            .map_err(ConfigError::FileExistsButCannotBeReadToString)?;

        Self::from_yaml_str(&config_file_data)
    }

    pub fn from_yaml_str(data: &str) -> Result<DashboardConfig, ConfigError> {
        let config: DashboardConfig =
            serde_yml::from_str(data).map_err(ConfigError::FileFormatCouldNotBeParsed)?;

        Ok(config)
    }

    /// Applies overrides from the environment, see [`API_BASE_URL_ENV_VAR`]
    pub fn with_env_overrides(mut self) -> Result<DashboardConfig, ConfigError> {
        if let Some(url) = logging::get_from_env(API_BASE_URL_ENV_VAR)? {
            tracing::debug!("Using API base url from {API_BASE_URL_ENV_VAR}: {url}");
            self.api_base_url = url;
        }
        Ok(self)
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    #[must_use]
    pub fn api_proxy(&self) -> Option<&str> {
        self.api_proxy.as_deref()
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    #[must_use]
    pub fn default_page_size(&self) -> u32 {
        self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    #[must_use]
    pub fn cache_stale_time(&self) -> Duration {
        self.cache_stale_time.unwrap_or(DEFAULT_CACHE_STALE_TIME)
    }

    #[must_use]
    pub fn request_retries(&self) -> u32 {
        self.request_retries.unwrap_or(DEFAULT_REQUEST_RETRIES)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY)
    }
}

impl From<&DashboardConfig> for AnalyticsApiConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            api_base_url: config.api_base_url().to_string(),
            api_proxy: config.api_proxy().map(str::to_string),
            request_timeout: config.request_timeout(),
        }
    }
}

impl From<&DashboardConfig> for QueryCacheConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            stale_time: config.cache_stale_time(),
            retries: config.request_retries(),
            retry_delay: config.retry_delay(),
        }
    }
}

fn optional_duration_from_str<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| {
            humantime::parse_duration(&s)
                .map_err(|e| D::Error::custom(format!("Invalid duration `{s}`: {e}")))
        })
        .transpose()
}

fn optional_page_size<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let size = Option::<u32>::deserialize(deserializer)?;
    match size {
        Some(0) => Err(D::Error::custom("Page size cannot be zero")),
        Some(s) if s > MAX_PAGE_SIZE => Err(D::Error::custom(format!(
            "Page size cannot exceed {MAX_PAGE_SIZE}, got {s}"
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use test_utils::asserts::assert_str_contains;

    #[test]
    fn minimal_config_uses_defaults() {
        let config =
            DashboardConfig::from_yaml_str("api_base_url: http://127.0.0.1:8000\n").unwrap();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:8000");
        assert_eq!(config.api_proxy(), None);
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.default_page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.cache_stale_time(), Duration::ZERO);
        assert_eq!(config.request_retries(), 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
    }

    #[test]
    fn full_config() {
        let yaml = r#"
api_base_url: "http://analytics.local/api"
api_proxy: "socks5://192.168.1.1:9000"
request_timeout: "30s"
default_page_size: 25
cache_stale_time: "1m"
request_retries: 0
retry_delay: "250ms"
"#;
        let config = DashboardConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.api_proxy(), Some("socks5://192.168.1.1:9000"));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.default_page_size(), 25);

        let cache_config = QueryCacheConfig::from(&config);
        assert_eq!(cache_config.stale_time, Duration::from_secs(60));
        assert_eq!(cache_config.retries, 0);
        assert_eq!(cache_config.retry_delay, Duration::from_millis(250));

        let api_config = AnalyticsApiConfig::from(&config);
        assert_eq!(api_config.api_base_url, "http://analytics.local/api");
        assert_eq!(api_config.request_timeout, Duration::from_secs(30));
    }

    #[rstest]
    #[case("default_page_size: 0", "zero")]
    #[case("default_page_size: 500", "cannot exceed")]
    #[case("request_timeout: \"soon\"", "Invalid duration")]
    fn invalid_values(#[case] line: &str, #[case] expected_error: &str) {
        let yaml = format!("api_base_url: http://127.0.0.1:8000\n{line}\n");
        let err = DashboardConfig::from_yaml_str(&yaml).unwrap_err();
        assert_str_contains(&err.to_string(), expected_error);
    }

    #[test]
    fn missing_base_url() {
        let err = DashboardConfig::from_yaml_str("default_page_size: 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::FileFormatCouldNotBeParsed(_)));
    }

    #[test]
    fn from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let err = DashboardConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileDoesNotExist(p) if p == path));

        std::fs::write(&path, "api_base_url: http://10.0.0.2:8000\n").unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.api_base_url(), "http://10.0.0.2:8000");
    }

    #[test]
    fn env_override() {
        let config =
            DashboardConfig::from_yaml_str("api_base_url: http://127.0.0.1:8000\n").unwrap();

        unsafe {
            std::env::set_var(API_BASE_URL_ENV_VAR, "http://override:9000");
        }
        let overridden = config.clone().with_env_overrides().unwrap();
        unsafe {
            std::env::remove_var(API_BASE_URL_ENV_VAR);
        }
        assert_eq!(overridden.api_base_url(), "http://override:9000");

        let untouched = config.with_env_overrides().unwrap();
        assert_eq!(untouched.api_base_url(), "http://127.0.0.1:8000");
    }
}
