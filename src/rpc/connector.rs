use std::time::Duration;

use ethers::providers::{Http, Middleware, Provider};
use log::{debug, info};
use tokio::time;

use crate::config::EndpointConfig;
use crate::error::{BalanceBotError, Result};

/// A named RPC endpoint bound to a live client connection. Built once at
/// startup and immutable afterwards; there is no re-dial path at runtime.
#[derive(Clone, Debug)]
pub struct Endpoint<M = Provider<Http>> {
    pub name: String,
    pub path: String,
    pub client: M,
}

impl<M> Endpoint<M> {
    pub fn new(name: impl Into<String>, path: impl Into<String>, client: M) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            client,
        }
    }
}

/// Dials every configured endpoint in order and verifies reachability by
/// fetching the latest block number under `timeout`. A dead endpoint at
/// boot is a configuration error: any dial or liveness failure aborts
/// startup instead of serving with a partial endpoint set.
pub async fn connect_all(configs: &[EndpointConfig], timeout: Duration) -> Result<Vec<Endpoint>> {
    let mut endpoints = Vec::with_capacity(configs.len());

    for config in configs {
        debug!("Dialing {} ({})", config.name, config.path);

        let client = Provider::<Http>::try_from(config.path.as_str())
            .map_err(|e| BalanceBotError::dial(&config.name, &config.path, e.to_string()))?;

        let block = match time::timeout(timeout, client.get_block_number()).await {
            Ok(Ok(block)) => block,
            Ok(Err(e)) => {
                return Err(BalanceBotError::liveness(
                    &config.name,
                    &config.path,
                    e.to_string(),
                ))
            }
            Err(_) => {
                return Err(BalanceBotError::liveness(
                    &config.name,
                    &config.path,
                    format!("timed out after {}ms", timeout.as_millis()),
                ))
            }
        };

        info!("✅ {} is live at block {}", config.name, block);
        endpoints.push(Endpoint::new(&config.name, &config.path, client));
    }

    Ok(endpoints)
}
