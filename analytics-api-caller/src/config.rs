const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsApiConfig {
    // e.g.: http://127.0.0.1:8000/api/v1
    pub api_base_url: String,
    // e.g.: socks5://192.168.1.1:9000
    pub api_proxy: Option<String>,
    pub request_timeout: std::time::Duration,
}

impl AnalyticsApiConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_proxy: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Joins `path` to the base url, tolerating a trailing slash on the base
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base_url = self.api_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base_url}/{path}")
    }
}
