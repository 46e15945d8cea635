use anyhow::Result;
use log::{debug, error, info};
use teloxide::{prelude::*, utils::command::BotCommands, RequestError};

use crate::bot::commands::Commands;
use crate::error::BalanceBotError;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "view the address ETH amount across all configured RPCs")]
    Balance(String),
    #[command(description = "show the command list")]
    Help,
}

pub struct BotDispatcher {
    commands: Commands,
}

impl BotDispatcher {
    pub fn new(commands: Commands) -> Self {
        Self { commands }
    }

    pub async fn run(self, bot: Bot) -> Result<()> {
        info!("🤖 Starting BalanceBot dispatcher...");

        let commands = self.commands.clone();
        let fallback = self.commands;

        Dispatcher::builder(
            bot,
            Update::filter_message()
                .branch(dptree::entry().filter_command::<Command>().endpoint(
                    move |bot: Bot, msg: Message, cmd: Command| {
                        let commands = commands.clone();
                        async move {
                            debug!("Handling command: {cmd:?}");
                            commands.handle_command(&bot, msg.chat.id, msg.id, cmd).await;
                            Ok::<(), RequestError>(())
                        }
                    },
                ))
                .branch(
                    // Anything else that looks like a command gets the
                    // "not found" notice; plain chatter is ignored.
                    dptree::filter(|msg: Message| {
                        msg.text().map(|text| text.starts_with('/')).unwrap_or(false)
                    })
                    .endpoint(move |bot: Bot, msg: Message| {
                        let commands = fallback.clone();
                        async move {
                            debug!("Unknown command in chat {}", msg.chat.id);
                            commands.handle_unknown(&bot, msg.chat.id, msg.id).await;
                            Ok::<(), RequestError>(())
                        }
                    }),
                ),
        )
        .default_handler(|update| async move {
            debug!("Ignoring non-command update {:?}", update.id);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

        Ok(())
    }
}

/// Connects to the Bot API, verifies the token and runs the long-polling
/// dispatcher until the process is killed.
pub async fn start_bot(token: &str, commands: Commands) -> Result<()> {
    info!("🚀 Initializing Telegram bot...");

    let bot = Bot::new(token);

    match bot.get_me().await {
        Ok(me) => {
            info!("✅ Bot connected successfully:");
            info!("  - Username: @{}", me.username());
            info!("  - ID: {}", me.id);
        }
        Err(e) => {
            error!("❌ Failed to connect to Telegram Bot API: {e}");
            return Err(BalanceBotError::Telegram(e).into());
        }
    }

    let dispatcher = BotDispatcher::new(commands);

    info!("🎯 Ready to receive commands");
    dispatcher.run(bot).await
}
