pub mod commands;
pub mod dispatcher;
pub mod traits;

pub use commands::Commands;
pub use dispatcher::{start_bot, BotDispatcher, Command};
pub use traits::BotApi;
