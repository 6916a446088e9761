use async_trait::async_trait;
use std::path::Path;
use teloxide::{
    types::{ChatId, Message},
    RequestError,
};

/// Bot-side operations the sales flow needs, abstracted so tests can run
/// against a mock instead of the Telegram API.
#[async_trait]
#[allow(dead_code)]
pub trait BotApi {
    /// Send a plain text message to a chat.
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<Message, RequestError>;

    /// Reply to a specific message.
    async fn reply_to_message(
        &self,
        message: &Message,
        text: &str,
    ) -> Result<Message, RequestError>;

    /// Send a file (the CSV export).
    async fn send_document(&self, chat_id: ChatId, path: &Path) -> Result<Message, RequestError>;
}
