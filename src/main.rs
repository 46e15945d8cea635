mod aggregator;
mod bot;
mod config;
mod error;
mod parser;
mod rpc;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use bot::{start_bot, Commands};
use config::Settings;
use utils::Logger;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Telegram bot reporting a wallet's balance across Ethereum RPC endpoints"
)]
struct Args {
    /// Path to the YAML config file
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    Logger::log_operation_start("BalanceBot", "Initializing application");

    let settings = match Settings::load(&args.config) {
        Ok(s) => {
            Logger::log_operation_success("Configuration", "Settings loaded successfully");
            s
        }
        Err(e) => {
            Logger::log_operation_failure("Configuration", &e.to_string());
            return Err(e.into());
        }
    };

    if let Err(e) = settings.validate() {
        Logger::log_operation_failure("Configuration validation", &e.to_string());
        return Err(e.into());
    }

    // A dead endpoint at boot is a configuration error: fail the whole
    // process instead of serving with a partial endpoint set.
    let endpoints = match rpc::connect_all(&settings.endpoints, settings.timeout()).await {
        Ok(endpoints) => {
            Logger::log_operation_success(
                "RPC",
                &format!("{} endpoint(s) dialed and live", endpoints.len()),
            );
            endpoints
        }
        Err(e) => {
            Logger::log_operation_failure("RPC", &e.to_string());
            return Err(e.into());
        }
    };

    info!("📊 Configuration:");
    info!("  - Endpoints: {}", endpoints.len());
    info!("  - RPC timeout: {}ms", settings.timeout);

    let commands = Commands::new(endpoints, settings.timeout());
    start_bot(&settings.token, commands).await
}
