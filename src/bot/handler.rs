use log::{debug, error, info, warn};
use teloxide::{requests::Requester, types::Message, Bot, RequestError};

use crate::parser::message::SaleParser;
use crate::storage::manager::StorageManager;
use crate::utils::{Formatter, Logger, Validator};

#[derive(Clone)]
pub struct MessageHandler {
    parser: SaleParser,
    storage: StorageManager,
}

impl MessageHandler {
    pub fn new(storage: StorageManager) -> Self {
        Self {
            parser: SaleParser::new(),
            storage,
        }
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    pub async fn handle_message(&self, bot: &Bot, message: &Message) -> Result<(), RequestError> {
        let Some(text) = message.text() else {
            return Ok(());
        };
        debug!("Processing message: {text}");

        let parsed = self.parser.parse(text);
        if !Validator::is_valid_datetime(&parsed.occurred_at) {
            warn!("Assembled date-time looks off: {}", parsed.occurred_at);
        }

        match parsed.validate() {
            Err(reason) => {
                info!("Rejected message: {reason}");
                bot.send_message(message.chat.id, Formatter::rejection_text(reason))
                    .await?;
            }
            Ok(sale) => {
                info!(
                    "Parsed sale: buyer={}, amount={}, source={}",
                    sale.buyer, sale.amount, sale.source
                );

                // the record is complete at this point; a sink failure is a
                // separate outcome and must not read as a parse failure
                match self.storage.add_sale(&sale).await {
                    Ok(()) => {
                        Logger::log_sale_recorded(&sale);
                        bot.send_message(message.chat.id, Formatter::confirmation_text(&sale))
                            .await?;
                    }
                    Err(e) => {
                        error!("Failed to store sale: {e}");
                        bot.send_message(
                            message.chat.id,
                            "❌ Ошибка при сохранении данных. Попробуйте еще раз.",
                        )
                        .await?;
                    }
                }
            }
        }

        Ok(())
    }
}
