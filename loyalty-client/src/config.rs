//! Client configuration

use crate::{ClientError, ClientResult};

/// Default REST path of the hosted table service
pub const DEFAULT_REST_PATH: &str = "rest/v1";

/// Client configuration for connecting to the hosted table store
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | STORE_URL | (required) | Project URL, e.g. `https://xyz.supabase.co` |
/// | STORE_API_KEY | (required) | API key sent as `apikey` and bearer token |
/// | STORE_TIMEOUT_SECS | 30 | Request timeout in seconds |
/// | STORE_REST_PATH | rest/v1 | Path of the REST endpoint under the URL |
#[derive(Clone)]
pub struct ClientConfig {
    /// Store base URL (e.g., "https://xyz.supabase.co")
    pub base_url: String,

    /// API key for the store
    pub api_key: String,

    /// Path of the row API below `base_url`
    pub rest_path: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            rest_path: DEFAULT_REST_PATH.to_string(),
            timeout: 30,
        }
    }

    /// Load from environment variables
    pub fn from_env() -> ClientResult<Self> {
        let base_url = std::env::var("STORE_URL")
            .map_err(|_| ClientError::Config("STORE_URL must be set".into()))?;
        let api_key = std::env::var("STORE_API_KEY")
            .map_err(|_| ClientError::Config("STORE_API_KEY must be set".into()))?;

        let mut config = Self::new(base_url, api_key);
        if let Some(timeout) = std::env::var("STORE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Ok(path) = std::env::var("STORE_REST_PATH") {
            config.rest_path = path;
        }
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the REST path
    pub fn with_rest_path(mut self, path: impl Into<String>) -> Self {
        self.rest_path = path.into();
        self
    }

    /// Full URL of the row API, without trailing slash
    pub fn rest_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.rest_path.trim_matches('/')
        )
    }
}

// The API key stays out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("rest_path", &self.rest_path)
            .field("timeout", &self.timeout)
            .finish()
    }
}
