// Expose the internal modules for integration tests.
pub mod aggregator;
pub mod bot;
pub mod config;
pub mod error;
pub mod parser;
pub mod rpc;
pub mod utils;

// Re-export the commonly used types.
pub use aggregator::BalanceAggregator;
pub use bot::{BotApi, BotDispatcher, Command, Commands};
pub use config::Settings;
pub use error::BalanceBotError;
pub use parser::AddressParser;
pub use rpc::Endpoint;
