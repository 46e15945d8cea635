use async_trait::async_trait;
use teloxide::{
    payloads::SendMessageSetters,
    requests::Requester,
    types::{ChatId, MessageId, ParseMode},
    Bot, RequestError,
};

/// The outbound seam to the chat platform; mocked in tests.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Sends `text` threaded as a reply to the triggering message,
    /// rendered with Markdown.
    async fn send_reply(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: &str,
    ) -> Result<(), RequestError>;
}

#[async_trait]
impl BotApi for Bot {
    async fn send_reply(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: &str,
    ) -> Result<(), RequestError> {
        self.send_message(chat_id, text)
            .reply_to_message_id(reply_to)
            .parse_mode(ParseMode::Markdown)
            .await?;
        Ok(())
    }
}
