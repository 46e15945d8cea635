use std::sync::Arc;
use std::time::Duration;

use ethers::providers::{Http, Middleware, Provider};
use log::{error, info};
use teloxide::types::{ChatId, MessageId};
use tokio::sync::Semaphore;

use crate::aggregator::BalanceAggregator;
use crate::bot::dispatcher::Command;
use crate::bot::traits::BotApi;
use crate::parser::AddressParser;
use crate::rpc::Endpoint;

/// Upper bound on concurrently running command handlers, so an update
/// burst cannot exhaust the process.
pub const MAX_INFLIGHT_COMMANDS: usize = 64;

pub const HELP_TEXT: &str = "*Commands:*\n\
    /balance <address>: view the address ETH amount\n\
    \tWe check all configured RPCs\n\
    /help: show this message\n";

pub const UNKNOWN_TEXT: &str = "Command *not found!*\nType /help to see any";

pub const INVALID_ADDRESS_TEXT: &str = "Wallet address is *not valid*!";

#[derive(Clone)]
pub struct Commands<M = Provider<Http>> {
    parser: AddressParser,
    aggregator: BalanceAggregator,
    endpoints: Arc<Vec<Endpoint<M>>>,
    limiter: Arc<Semaphore>,
}

impl<M: Middleware> Commands<M> {
    pub fn new(endpoints: Vec<Endpoint<M>>, timeout: Duration) -> Self {
        Self {
            parser: AddressParser::new(),
            aggregator: BalanceAggregator::new(timeout),
            endpoints: Arc::new(endpoints),
            limiter: Arc::new(Semaphore::new(MAX_INFLIGHT_COMMANDS)),
        }
    }

    pub async fn handle_command<B: BotApi>(
        &self,
        bot: &B,
        chat_id: ChatId,
        message_id: MessageId,
        command: Command,
    ) {
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            // The semaphore is never closed.
            Err(_) => return,
        };

        match command {
            Command::Balance(address) => {
                self.handle_balance(bot, chat_id, message_id, address.trim())
                    .await
            }
            Command::Help => self.reply(bot, chat_id, message_id, HELP_TEXT, "/help").await,
        }
    }

    pub async fn handle_unknown<B: BotApi>(&self, bot: &B, chat_id: ChatId, message_id: MessageId) {
        // Unknown commands count against the same in-flight cap.
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(_) => return,
        };

        self.reply(bot, chat_id, message_id, UNKNOWN_TEXT, "unknown command")
            .await;
    }

    async fn handle_balance<B: BotApi>(
        &self,
        bot: &B,
        chat_id: ChatId,
        message_id: MessageId,
        candidate: &str,
    ) {
        // Invalid addresses are rejected before any endpoint is queried.
        let Some(address) = self.parser.parse(candidate) else {
            self.reply(bot, chat_id, message_id, INVALID_ADDRESS_TEXT, "/balance")
                .await;
            return;
        };

        info!(
            "Collecting balances for {} across {} endpoint(s)",
            candidate,
            self.endpoints.len()
        );

        let report = self.aggregator.build_report(&self.endpoints, address).await;
        self.reply(bot, chat_id, message_id, &report, "/balance").await;
    }

    /// Send failures are logged and never retried or surfaced back to the
    /// user.
    async fn reply<B: BotApi>(
        &self,
        bot: &B,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        context: &str,
    ) {
        if let Err(e) = bot.send_reply(chat_id, message_id, text).await {
            error!("{context}: failed to send reply to chat {chat_id}: {e}");
        }
    }
}
