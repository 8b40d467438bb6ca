//! Connector configuration.

use crate::credentials::Credentials;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectorConfig {
    /// Base URL of the registry, without a trailing slash
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Sent as the `EIDR-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size used when a query does not set one
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub credentials: Credentials,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            credentials: Credentials::default(),
        }
    }
}

impl ConnectorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: ConnectorConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            anyhow::bail!("'endpoint' must not be empty");
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            anyhow::bail!(
                "Invalid endpoint '{}': expected an http:// or https:// URL",
                self.endpoint
            );
        }
        if self.page_size == 0 {
            anyhow::bail!("'page_size' must be at least 1");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("'timeout_secs' must be at least 1");
        }
        Ok(())
    }

    /// Endpoint with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_endpoint() -> String {
    "https://registry1.eidr.org".to_string()
}

fn default_api_version() -> String {
    "2.7.1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    25
}
