use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BalanceBotError, Result};

/// One configured RPC endpoint. Identity is the position in the config
/// file; `name` uniqueness is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Telegram bot token.
    pub token: String,
    /// Per-RPC-call timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout: u64,
    /// RPC endpoints, queried in this order.
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

fn default_timeout_ms() -> u64 {
    1000
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&data)?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(BalanceBotError::config_error("token cannot be empty"));
        }

        if self.timeout == 0 {
            return Err(BalanceBotError::config_error(
                "timeout must be greater than 0",
            ));
        }

        for endpoint in &self.endpoints {
            if endpoint.name.is_empty() {
                return Err(BalanceBotError::config_error(format!(
                    "endpoint with path {} has no name",
                    endpoint.path
                )));
            }
            if endpoint.path.is_empty() {
                return Err(BalanceBotError::config_error(format!(
                    "endpoint {} has no path",
                    endpoint.name
                )));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            token: String::new(),
            timeout: default_timeout_ms(),
            endpoints: Vec::new(),
        }
    }
}
