use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serial_test::serial;
use tempfile::tempdir;
use tokio::sync::Mutex;

use salesbot::bot::traits::BotApi;
use salesbot::calculator::StatsCalculator;
use salesbot::parser::message::{moscow_offset, SaleParser, ValidationError};
use salesbot::retry::RetryConfig;
use salesbot::storage::models::{ValidSale, RECORD_HEADERS, UNSPECIFIED_SOURCE};
use salesbot::storage::{CsvStore, SheetSink, StorageManager};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use teloxide::types::{
    Chat, ChatId, MediaKind, MediaText, Message, MessageCommon, MessageId, MessageKind, User,
    UserId,
};
use teloxide::RequestError;

// Mock Bot API implementation
#[derive(Debug, Clone)]
pub struct MockBotApi {
    pub sent_messages: Arc<Mutex<Vec<MockSentMessage>>>,
    pub sent_documents: Arc<Mutex<Vec<MockSentDocument>>>,
    pub should_fail: Arc<Mutex<bool>>,
}

#[derive(Debug, Clone)]
pub struct MockSentMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub reply_to_message_id: Option<MessageId>,
}

#[derive(Debug, Clone)]
pub struct MockSentDocument {
    pub chat_id: ChatId,
    pub path: String,
}

impl MockBotApi {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(Vec::new())),
            sent_documents: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().await = should_fail;
    }

    pub async fn get_sent_messages(&self) -> Vec<MockSentMessage> {
        self.sent_messages.lock().await.clone()
    }

    pub async fn get_sent_documents(&self) -> Vec<MockSentDocument> {
        self.sent_documents.lock().await.clone()
    }

    fn create_mock_message(chat_id: ChatId, message_id: MessageId, text: &str) -> Message {
        let user = User {
            id: UserId(12345),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("ru".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let chat = Chat {
            id: chat_id,
            kind: teloxide::types::ChatKind::Private(teloxide::types::ChatPrivate {
                username: Some("testuser".to_string()),
                first_name: Some("Test".to_string()),
                last_name: Some("User".to_string()),
                bio: None,
                has_private_forwards: None,
                has_restricted_voice_and_video_messages: None,
                emoji_status_custom_emoji_id: None,
            }),
            photo: None,
            pinned_message: None,
            message_auto_delete_time: None,
            has_hidden_members: false,
            has_aggressive_anti_spam_enabled: false,
        };

        Message {
            id: message_id,
            thread_id: None,
            date: Utc::now(),
            chat,
            via_bot: None,
            kind: MessageKind::Common(MessageCommon {
                from: Some(user),
                forward: None,
                edit_date: None,
                media_kind: MediaKind::Text(MediaText {
                    text: text.to_string(),
                    entities: vec![],
                }),
                reply_markup: None,
                sender_chat: None,
                author_signature: None,
                is_automatic_forward: false,
                has_protected_content: false,
                reply_to_message: None,
                is_topic_message: false,
            }),
        }
    }
}

#[async_trait]
impl BotApi for MockBotApi {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<Message, RequestError> {
        if *self.should_fail.lock().await {
            return Err(RequestError::Api(teloxide::ApiError::Unknown(
                "Mock error".to_string(),
            )));
        }

        let message_id = MessageId(rand::random::<i32>().abs());
        let mut messages = self.sent_messages.lock().await;
        messages.push(MockSentMessage {
            chat_id,
            text: text.to_string(),
            reply_to_message_id: None,
        });

        Ok(Self::create_mock_message(chat_id, message_id, text))
    }

    async fn reply_to_message(
        &self,
        message: &Message,
        text: &str,
    ) -> Result<Message, RequestError> {
        if *self.should_fail.lock().await {
            return Err(RequestError::Api(teloxide::ApiError::Unknown(
                "Mock error".to_string(),
            )));
        }

        let message_id = MessageId(rand::random::<i32>().abs());
        let mut messages = self.sent_messages.lock().await;
        messages.push(MockSentMessage {
            chat_id: message.chat.id,
            text: text.to_string(),
            reply_to_message_id: Some(message.id),
        });

        Ok(Self::create_mock_message(message.chat.id, message_id, text))
    }

    async fn send_document(&self, chat_id: ChatId, path: &Path) -> Result<Message, RequestError> {
        if *self.should_fail.lock().await {
            return Err(RequestError::Api(teloxide::ApiError::Unknown(
                "Mock error".to_string(),
            )));
        }

        let message_id = MessageId(rand::random::<i32>().abs());
        let mut documents = self.sent_documents.lock().await;
        documents.push(MockSentDocument {
            chat_id,
            path: path.display().to_string(),
        });

        Ok(Self::create_mock_message(chat_id, message_id, ""))
    }
}

// test helpers
fn fixed_now() -> DateTime<FixedOffset> {
    moscow_offset()
        .with_ymd_and_hms(2025, 7, 14, 18, 45, 0)
        .unwrap()
}

fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        backoff_multiplier: 2.0,
    }
}

async fn create_test_storage(dir: &Path) -> Result<(CsvStore, StorageManager)> {
    let csv = CsvStore::new(dir.join("sales.csv")).await?;
    let manager = StorageManager::from_parts(csv.clone(), SheetSink::new(None), fast_retry());
    Ok((csv, manager))
}

// both dialects end-to-end through the parser
#[tokio::test]
async fn test_sale_parser_scenarios() -> Result<()> {
    let parser = SaleParser::new();

    let scenarios = [
        (
            "@swagger 15.09 1230 65юсдт биб",
            "@swagger",
            "15.09.2025 12:30",
            "65 USDT",
            "биб",
        ),
        (
            "@nikita 15.12.2025 на 19:30 200usdt \"соль да перец\"",
            "@nikita",
            "15.12.2025 19:30",
            "200 USDT",
            "соль да перец",
        ),
        (
            "@ivan вчера на 14:00 150₽ \"криптоканал\"",
            "@ivan",
            "13.07.2025 14:00",
            "150 ₽",
            "криптоканал",
        ),
        (
            "@alex 25.12 1200 0.01btc блог",
            "@alex",
            "25.12.2025 12:00",
            "0.01 BTC",
            "блог",
        ),
        (
            // "группа" carries the "р" currency fragment, so the source
            // scan drops it and validation falls back to the sentinel
            "@maria 20.01.2025 1800 5000р группа",
            "@maria",
            "20.01.2025 18:00",
            "5000 ₽",
            UNSPECIFIED_SOURCE,
        ),
    ];

    for (input, buyer, occurred_at, amount, source) in scenarios {
        let record = parser.parse_at(input, fixed_now());
        let sale = record.validate().expect("scenario must validate");
        assert_eq!(sale.buyer, buyer, "buyer for {input:?}");
        assert_eq!(sale.occurred_at, occurred_at, "occurred_at for {input:?}");
        assert_eq!(sale.amount, amount, "amount for {input:?}");
        assert_eq!(sale.source, source, "source for {input:?}");
    }

    Ok(())
}

// messages that must be rejected, not stored
#[tokio::test]
async fn test_invalid_messages_are_rejected() -> Result<()> {
    let parser = SaleParser::new();

    let missing_amount = ["@user hello", "@user просто зашел"];
    for input in missing_amount {
        let record = parser.parse_at(input, fixed_now());
        assert_eq!(
            record.validate(),
            Err(ValidationError::AmountMissing),
            "for {input:?}"
        );
    }

    let record = parser.parse_at("взял за 200usdt, отчитаюсь", fixed_now());
    assert_eq!(record.validate(), Err(ValidationError::BuyerMissing));

    Ok(())
}

// a missing source is healed, never rejected
#[tokio::test]
async fn test_source_healing() -> Result<()> {
    let parser = SaleParser::new();
    let record = parser.parse_at("@user 15.09 1230 65юсдт", fixed_now());
    let sale = record.validate()?;
    assert_eq!(sale.source, UNSPECIFIED_SOURCE);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_storage_roundtrip() -> Result<()> {
    let dir = tempdir()?;
    let (csv, manager) = create_test_storage(dir.path()).await?;

    let sale = ValidSale {
        buyer: "@swagger".to_string(),
        occurred_at: "15.09.2025 12:30".to_string(),
        amount: "65 USDT".to_string(),
        source: "биб".to_string(),
    };
    manager.add_sale(&sale).await?;

    let rows = csv.read_all().await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], RECORD_HEADERS);
    assert_eq!(
        rows[1],
        vec!["@swagger", "15.09.2025 12:30", "65 USDT", "биб"]
    );

    Ok(())
}

// parse → validate → store → aggregate
#[tokio::test]
#[serial]
async fn test_complete_sale_flow() -> Result<()> {
    let dir = tempdir()?;
    let (csv, manager) = create_test_storage(dir.path()).await?;
    let parser = SaleParser::new();

    let inputs = [
        "@swagger 15.09 1230 65юсдт биб",
        "@ivan вчера на 14:00 150₽ \"криптоканал\"",
        "@nikita 15.12.2025 на 19:30 200usdt \"соль да перец\"",
    ];
    for input in inputs {
        let sale = parser.parse_at(input, fixed_now()).validate()?;
        manager.add_sale(&sale).await?;
    }

    let stats = StatsCalculator::new(csv).stats().await?;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.usdt_count, 2);
    assert_eq!(stats.usdt_total, 265.0);
    assert_eq!(stats.rub_count, 1);
    assert_eq!(stats.rub_total, 150.0);

    Ok(())
}

#[tokio::test]
async fn test_mock_bot_api() -> Result<()> {
    let mock_bot = MockBotApi::new();
    let chat_id = ChatId(12345);

    let result = mock_bot.send_message(chat_id, "тестовое сообщение").await;
    assert!(result.is_ok());

    let sent = mock_bot.get_sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, chat_id);
    assert_eq!(sent[0].text, "тестовое сообщение");

    let incoming = MockBotApi::create_mock_message(chat_id, MessageId(7), "@user 100usdt");
    let result = mock_bot.reply_to_message(&incoming, "✅ Записано").await;
    assert!(result.is_ok());

    let sent = mock_bot.get_sent_messages().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].reply_to_message_id, Some(MessageId(7)));

    let result = mock_bot
        .send_document(chat_id, Path::new("sales_data.csv"))
        .await;
    assert!(result.is_ok());
    let documents = mock_bot.get_sent_documents().await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].path, "sales_data.csv");

    mock_bot.set_should_fail(true).await;
    let result = mock_bot.send_message(chat_id, "это должно упасть").await;
    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_concurrent_sales() -> Result<()> {
    let dir = tempdir()?;
    let (csv, manager) = create_test_storage(dir.path()).await?;

    let mut handles = vec![];
    for i in 0..10 {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move {
            let sale = ValidSale {
                buyer: format!("@buyer{i}"),
                occurred_at: "15.09.2025 12:30".to_string(),
                amount: "10 USDT".to_string(),
                source: "канал".to_string(),
            };
            manager.add_sale(&sale).await
        }));
    }

    for handle in handles {
        handle.await??;
    }

    let rows = csv.read_all().await?;
    assert_eq!(rows.len(), 11);

    Ok(())
}

// the parser is pure and cheap enough to run inline per message
#[tokio::test]
async fn test_parser_performance() -> Result<()> {
    let parser = SaleParser::new();
    let now = fixed_now();

    let start = std::time::Instant::now();
    for _ in 0..1000 {
        let _record = parser.parse_at("@swagger 15.09 1230 65юсдт биб", now);
    }
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_secs(5),
        "1000 parses took {elapsed:?}"
    );

    Ok(())
}
