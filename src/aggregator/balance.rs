use std::time::Duration;

use chrono::Local;
use ethers::providers::{Middleware, MiddlewareError};
use ethers::types::Address;
use log::{debug, warn};
use tokio::time;

use crate::rpc::Endpoint;
use crate::utils::Formatter;

/// Builds per-request balance reports by querying every configured
/// endpoint sequentially, each call under its own freshly derived timeout.
/// One attempt per endpoint per request; no retries.
#[derive(Clone, Debug)]
pub struct BalanceAggregator {
    timeout: Duration,
}

impl BalanceAggregator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Full report: localized date/time header followed by the endpoint
    /// lines. All-zero balances yield a header-only report.
    pub async fn build_report<M: Middleware>(
        &self,
        endpoints: &[Endpoint<M>],
        address: Address,
    ) -> String {
        let mut report = Local::now()
            .format("🗓 *%Y-%m-%d*\n⌚️ *%-I:%M %p* (%Z)\n\n")
            .to_string();
        report.push_str(&self.collect_lines(endpoints, address).await);
        report
    }

    /// Queries endpoints in configuration order, which is the only ordering
    /// guarantee and determines report line order. An endpoint contributes
    /// a line iff it failed with a service-class error or returned a
    /// strictly non-zero balance.
    pub async fn collect_lines<M: Middleware>(
        &self,
        endpoints: &[Endpoint<M>],
        address: Address,
    ) -> String {
        let mut lines = String::new();

        for endpoint in endpoints {
            debug!("Querying {} for balance of {:?}", endpoint.name, address);

            match time::timeout(self.timeout, endpoint.client.get_balance(address, None)).await {
                Ok(Ok(balance)) => {
                    // Zero balances are never reported, even from healthy
                    // endpoints.
                    if !balance.is_zero() {
                        lines.push_str(&format!(
                            "*{}*:  `{}`\n",
                            endpoint.name,
                            Formatter::format_wei(balance)
                        ));
                    }
                }
                Ok(Err(e)) => {
                    warn!(
                        "{} ({}): balance query failed: {}",
                        endpoint.name, endpoint.path, e
                    );
                    if is_service_error(&e) {
                        lines.push_str(&service_error_line(&endpoint.name));
                    }
                }
                Err(_) => {
                    warn!(
                        "{} ({}): balance query timed out after {}ms",
                        endpoint.name,
                        endpoint.path,
                        self.timeout.as_millis()
                    );
                    lines.push_str(&service_error_line(&endpoint.name));
                }
            }
        }

        lines
    }
}

fn service_error_line(name: &str) -> String {
    format!("*{name}*:  `_service error_`\n")
}

/// Only transport-level failures are surfaced to the user. An error that
/// carries a JSON-RPC error response came from a responsive server, and a
/// deserialization error is a decode problem; both stay log-only.
fn is_service_error<E: MiddlewareError>(err: &E) -> bool {
    err.as_error_response().is_none() && err.as_serde_error().is_none()
}
