use log::error;
use teloxide::{
    requests::Requester,
    types::{InputFile, Message},
    Bot, RequestError,
};

use crate::bot::handler::MessageHandler;
use crate::calculator::stats::StatsCalculator;
use crate::utils::Formatter;

#[derive(Clone)]
pub struct Commands {
    handler: MessageHandler,
    stats: StatsCalculator,
}

impl Commands {
    pub fn new(handler: MessageHandler) -> Self {
        let stats = StatsCalculator::new(handler.storage().csv().clone());
        Self { handler, stats }
    }

    pub async fn handle_command(
        &self,
        bot: &Bot,
        message: &Message,
        command: &str,
    ) -> Result<(), RequestError> {
        match command {
            "/start" => self.handle_start(bot, message).await,
            "/help" => self.handle_help(bot, message).await,
            "/stats" => self.handle_stats(bot, message).await,
            "/export" => self.handle_export(bot, message).await,
            "/sheets" => self.handle_sheets(bot, message).await,
            _ => {
                bot.send_message(message.chat.id, "Unknown command").await?;
                Ok(())
            }
        }
    }

    async fn handle_start(&self, bot: &Bot, message: &Message) -> Result<(), RequestError> {
        let welcome_text = "🤖 Добро пожаловать в бота для учета рекламы!\n\n\
            ⚡️ Быстрый формат (без запятых, просто накидал):\n\
            • @n2342rik 12.10 1845 6000р русский биз\n\
            • @ivan 16.12 1430 200usdt канал\n\
            • @maria 20.01.2025 1800 5000р группа\n\n\
            Я автоматически извлеку:\n\
            👤 Ник покупателя\n\
            📅 Дату и время публикации\n\
            💰 Сумму покупки (поддерживает 5000р, 200usdt)\n\
            📺 Источник размещения\n\n\
            📊 Доступные команды:\n\
            /help — показать справку\n\
            /stats — показать статистику\n\
            /export — экспорт данных\n\
            /sheets — статус таблицы";

        bot.send_message(message.chat.id, welcome_text).await?;
        Ok(())
    }

    async fn handle_help(&self, bot: &Bot, message: &Message) -> Result<(), RequestError> {
        let help_text = "📋 Как использовать бота:\n\n\
            1️⃣ Отправьте сообщение о размещении рекламы в любом формате\n\
            2️⃣ Бот автоматически извлечет:\n\
            \u{20}  👤 Ник покупателя (@username)\n\
            \u{20}  📅 Дату и время публикации\n\
            \u{20}  💰 Сумму покупки (usdt, ₽, btc, eth)\n\
            \u{20}  📺 Источник размещения\n\
            3️⃣ Данные автоматически сохранятся в таблицу\n\n\
            🔤 Примеры сообщений:\n\n\
            📝 Форматированный (с запятыми и кавычками):\n\
            • @nikita 15.12.2025 на 19:30 200usdt \"соль да перец\"\n\
            • @ivan вчера на 14:00 150₽ \"криптоканал\"\n\n\
            ⚡ Быстрый (без запятых, просто накидал):\n\
            • @n2342rik 12.10 1845 6000р русский биз\n\
            • @ivan 16.12 1430 200usdt канал\n\
            • @alex 25.12 1200 0.01btc блог\n\n\
            📊 Команды:\n\
            /start — начать работу\n\
            /help — эта справка\n\
            /stats — статистика размещений\n\
            /export — экспорт данных в CSV\n\
            /sheets — статус таблицы";

        bot.send_message(message.chat.id, help_text).await?;
        Ok(())
    }

    async fn handle_stats(&self, bot: &Bot, message: &Message) -> Result<(), RequestError> {
        match self.stats.stats().await {
            Ok(stats) => {
                bot.send_message(message.chat.id, Formatter::stats_text(&stats))
                    .await?;
            }
            Err(e) => {
                error!("Failed to compute stats: {e}");
                bot.send_message(message.chat.id, "❌ Ошибка при получении статистики.")
                    .await?;
            }
        }
        Ok(())
    }

    async fn handle_export(&self, bot: &Bot, message: &Message) -> Result<(), RequestError> {
        let path = self.handler.storage().csv().path().to_path_buf();
        bot.send_document(message.chat.id, InputFile::file(path))
            .await?;
        Ok(())
    }

    async fn handle_sheets(&self, bot: &Bot, message: &Message) -> Result<(), RequestError> {
        let text = if self.handler.storage().sheets().is_connected() {
            "✅ Таблица подключена!\n\n\
             📊 Данные автоматически синхронизируются с удаленной таблицей\n\
             💾 Локальная копия хранится в CSV файле"
        } else {
            "❌ Удаленная таблица не подключена\n\n\
             📝 Данные сохраняются только в локальный CSV файл\n\
             🔧 Для подключения задайте SHEETS_WEBHOOK_URL и перезапустите бота"
        };

        bot.send_message(message.chat.id, text).await?;
        Ok(())
    }
}
