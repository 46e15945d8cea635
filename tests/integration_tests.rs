use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::providers::{MockError, MockProvider, Provider};
use ethers::types::U256;
use teloxide::types::{ChatId, MessageId};
use teloxide::RequestError;
use tokio::sync::Mutex;

use balancebot::bot::commands::{
    HELP_TEXT, INVALID_ADDRESS_TEXT, MAX_INFLIGHT_COMMANDS, UNKNOWN_TEXT,
};
use balancebot::bot::{BotApi, Command, Commands};
use balancebot::rpc::Endpoint;

const TIMEOUT: Duration = Duration::from_millis(250);
const CHAT: ChatId = ChatId(1);
const MESSAGE: MessageId = MessageId(42);

// Mock Bot API implementation capturing outbound replies
#[derive(Debug, Clone)]
pub struct MockSentMessage {
    pub chat_id: ChatId,
    pub reply_to: MessageId,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct MockBotApi {
    pub sent_messages: Arc<Mutex<Vec<MockSentMessage>>>,
    pub should_fail: Arc<Mutex<bool>>,
}

impl MockBotApi {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().await = should_fail;
    }

    pub async fn get_sent_messages(&self) -> Vec<MockSentMessage> {
        self.sent_messages.lock().await.clone()
    }
}

#[async_trait]
impl BotApi for MockBotApi {
    async fn send_reply(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: &str,
    ) -> Result<(), RequestError> {
        if *self.should_fail.lock().await {
            return Err(RequestError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "mock send failure",
            )));
        }

        self.sent_messages.lock().await.push(MockSentMessage {
            chat_id,
            reply_to,
            text: text.to_string(),
        });
        Ok(())
    }
}

// Bot API mock that tracks how many replies are being sent at once
#[derive(Debug, Clone)]
pub struct BlockingBotApi {
    pub in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl BlockingBotApi {
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl BotApi for BlockingBotApi {
    async fn send_reply(
        &self,
        _chat_id: ChatId,
        _reply_to: MessageId,
        _text: &str,
    ) -> Result<(), RequestError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Keep the reply in flight long enough for the burst to pile up.
        tokio::time::sleep(Duration::from_millis(25)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

fn mocked_endpoint(name: &str) -> (Endpoint<Provider<MockProvider>>, MockProvider) {
    let (provider, mock) = Provider::mocked();
    (Endpoint::new(name, "mock://", provider), mock)
}

fn commands(endpoints: Vec<Endpoint<Provider<MockProvider>>>) -> Commands<Provider<MockProvider>> {
    Commands::new(endpoints, TIMEOUT)
}

#[tokio::test]
async fn test_help_command_replies_with_command_list() {
    let bot = MockBotApi::new();
    let commands = commands(Vec::new());

    commands
        .handle_command(&bot, CHAT, MESSAGE, Command::Help)
        .await;

    let sent = bot.get_sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, CHAT);
    assert_eq!(sent[0].reply_to, MESSAGE);
    assert_eq!(sent[0].text, HELP_TEXT);
}

#[tokio::test]
async fn test_unknown_command_replies_not_found() {
    let bot = MockBotApi::new();
    let commands = commands(Vec::new());

    commands.handle_unknown(&bot, CHAT, MESSAGE).await;

    let sent = bot.get_sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, UNKNOWN_TEXT);
}

#[tokio::test]
async fn test_invalid_address_is_rejected_without_any_query() {
    let bot = MockBotApi::new();
    let (endpoint, mock) = mocked_endpoint("mainnet");
    let commands = commands(vec![endpoint]);

    commands
        .handle_command(
            &bot,
            CHAT,
            MESSAGE,
            Command::Balance("0xnot-a-real-address".to_string()),
        )
        .await;

    let sent = bot.get_sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, INVALID_ADDRESS_TEXT);

    // The endpoint never saw a request.
    assert!(matches!(
        mock.assert_request("eth_getBalance", ()),
        Err(MockError::EmptyRequests)
    ));
}

#[tokio::test]
async fn test_balance_report_lists_nonzero_endpoints_in_config_order() {
    let bot = MockBotApi::new();
    let (first, first_mock) = mocked_endpoint("first");
    let (second, second_mock) = mocked_endpoint("second");
    let (third, third_mock) = mocked_endpoint("third");
    first_mock.push(U256::exp10(18)).unwrap();
    second_mock.push(U256::zero()).unwrap();
    third_mock.push(U256::exp10(17) * 5u64).unwrap();

    let commands = commands(vec![first, second, third]);
    commands
        .handle_command(
            &bot,
            CHAT,
            MESSAGE,
            Command::Balance("0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string()),
        )
        .await;

    let sent = bot.get_sent_messages().await;
    assert_eq!(sent.len(), 1);

    let report = &sent[0].text;
    assert!(report.starts_with("🗓 *"));
    assert!(report.contains("*first*:  `1`\n"));
    assert!(report.contains("*third*:  `0.5`\n"));
    // The zero-balance endpoint is silently omitted.
    assert!(!report.contains("second"));
    // Line order follows the configured endpoint order.
    assert!(report.find("*first*").unwrap() < report.find("*third*").unwrap());
}

#[tokio::test]
async fn test_service_error_and_healthy_endpoint_each_produce_one_line() {
    let bot = MockBotApi::new();
    let (healthy, healthy_mock) = mocked_endpoint("healthy");
    // No response pushed: the flaky endpoint fails at the transport level.
    let (flaky, _flaky_mock) = mocked_endpoint("flaky");
    healthy_mock.push(U256::exp10(18)).unwrap();

    let commands = commands(vec![healthy, flaky]);
    commands
        .handle_command(
            &bot,
            CHAT,
            MESSAGE,
            Command::Balance("0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string()),
        )
        .await;

    let sent = bot.get_sent_messages().await;
    assert_eq!(sent.len(), 1);

    let report = &sent[0].text;
    assert!(report.ends_with("*healthy*:  `1`\n*flaky*:  `_service error_`\n"));
    assert_eq!(report.matches("_service error_").count(), 1);
}

#[tokio::test]
async fn test_unknown_command_burst_respects_concurrency_cap() {
    let bot = BlockingBotApi::new();
    let commands = commands(Vec::new());

    let mut handles = Vec::new();
    for chat in 0..(MAX_INFLIGHT_COMMANDS + 16) {
        let bot = bot.clone();
        let commands = commands.clone();
        handles.push(tokio::spawn(async move {
            commands
                .handle_unknown(&bot, ChatId(chat as i64), MESSAGE)
                .await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert!(bot.max_in_flight.load(Ordering::SeqCst) <= MAX_INFLIGHT_COMMANDS);
}

#[tokio::test]
async fn test_send_failures_are_swallowed() {
    let bot = MockBotApi::new();
    bot.set_should_fail(true).await;

    let commands = commands(Vec::new());
    commands
        .handle_command(&bot, CHAT, MESSAGE, Command::Help)
        .await;

    // The failure is logged, never retried and never surfaced.
    assert!(bot.get_sent_messages().await.is_empty());
}
