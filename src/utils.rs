use ethers::types::U256;
use ethers::utils::format_units;
use log::{error, info};

/// Startup narration helpers.
pub struct Logger;

impl Logger {
    pub fn log_operation_start(operation: &str, details: &str) {
        info!("🚀 Starting {}: {}", operation, details);
    }

    pub fn log_operation_success(operation: &str, details: &str) {
        info!("✅ {} completed successfully: {}", operation, details);
    }

    pub fn log_operation_failure(operation: &str, error: &str) {
        error!("❌ {} failed: {}", operation, error);
    }
}

/// Formatting helpers for report lines.
pub struct Formatter;

impl Formatter {
    /// Converts a wei balance to its decimal ether representation,
    /// dropping trailing fractional zeros (1e18 wei renders as `1`).
    pub fn format_wei(balance: U256) -> String {
        let formatted =
            format_units(balance, "ether").unwrap_or_else(|_| balance.to_string());

        match formatted.split_once('.') {
            Some((integer, fraction)) => {
                let fraction = fraction.trim_end_matches('0');
                if fraction.is_empty() {
                    integer.to_string()
                } else {
                    format!("{integer}.{fraction}")
                }
            }
            None => formatted,
        }
    }
}
