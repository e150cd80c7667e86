//! Project configuration for endpoint test runs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public Petstore document used when nothing else is configured.
pub const DEFAULT_SPEC: &str = "https://petstore.swagger.io/v2/swagger.json";

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenAPI/Swagger document: local file path or http(s) URL
    #[serde(default = "default_spec")]
    pub spec: String,

    /// Prefix for endpoints whose path is not an absolute URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP headers sent with every test call (auth tokens, API keys)
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Base URL of the result store (`{store_url}/test-results`).
    /// Persistence is disabled when unset.
    #[serde(default)]
    pub store_url: Option<String>,

    /// Timeout for each test call, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for each persistence call, in seconds
    #[serde(default = "default_persist_timeout")]
    pub persist_timeout_secs: u64,

    /// Directory for exported result files
    #[serde(default)]
    pub results_dir: Option<PathBuf>,
}

fn default_spec() -> String {
    DEFAULT_SPEC.to_string()
}

const fn default_request_timeout() -> u64 {
    10
}

const fn default_persist_timeout() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spec: default_spec(),
            base_url: None,
            headers: HashMap::new(),
            store_url: None,
            request_timeout_secs: default_request_timeout(),
            persist_timeout_secs: default_persist_timeout(),
            results_dir: None,
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from default location (.swaggerdrill.toml)
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [".swaggerdrill.toml", ".swaggerdrill.json", "swaggerdrill.toml"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Headers to send, with blank names dropped.
    #[must_use]
    pub fn request_headers(&self) -> HashMap<String, String> {
        self.headers
            .iter()
            .filter(|(k, _)| !k.trim().is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn persist_timeout(&self) -> Duration {
        Duration::from_secs(self.persist_timeout_secs)
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# swaggerdrill configuration

# OpenAPI / Swagger document (file path or URL)
spec = "https://petstore.swagger.io/v2/swagger.json"

# Prefix for endpoints whose spec declares a relative server URL (or none)
# base_url = "http://localhost:8080"

# HTTP headers sent with every test call (auth, api keys)
[headers]
Authorization = "Bearer your-token-here"
# X-API-Key = "your-api-key"

# Result store; every result is POSTed to {store_url}/test-results
# store_url = "http://localhost:5000/api"

# Timeouts in seconds
# request_timeout_secs = 10
# persist_timeout_secs = 5

# Directory for exported api-test-results-*.json files
# results_dir = ".swaggerdrill/results"
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
