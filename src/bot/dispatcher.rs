use anyhow::Result;
use log::{debug, error, info};
use teloxide::{
    prelude::*,
    types::{MediaKind, MessageKind},
    utils::command::BotCommands,
    RequestError,
};

use crate::bot::commands::Commands;
use crate::bot::handler::MessageHandler;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Поддерживаемые команды:")]
pub enum Command {
    #[command(description = "начать работу")]
    Start,
    #[command(description = "показать справку")]
    Help,
    #[command(description = "статистика размещений")]
    Stats,
    #[command(description = "экспорт данных в CSV")]
    Export,
    #[command(description = "статус удаленной таблицы")]
    Sheets,
}

pub struct BotDispatcher {
    message_handler: MessageHandler,
    commands: Commands,
}

impl BotDispatcher {
    pub fn new(message_handler: MessageHandler) -> Self {
        let commands = Commands::new(message_handler.clone());
        Self {
            message_handler,
            commands,
        }
    }

    pub async fn run(self, bot: Bot) -> Result<()> {
        info!("🤖 Starting SalesBot dispatcher...");

        let handler = self.message_handler.clone();
        let commands = self.commands.clone();

        Dispatcher::builder(
            bot,
            Update::filter_message()
                .branch(dptree::entry().filter_command::<Command>().endpoint(
                    move |bot: Bot, msg: Message, cmd: Command| {
                        let commands = commands.clone();
                        async move {
                            debug!("Handling command: {cmd:?}");

                            let command_str = match cmd {
                                Command::Start => "/start",
                                Command::Help => "/help",
                                Command::Stats => "/stats",
                                Command::Export => "/export",
                                Command::Sheets => "/sheets",
                            };

                            if let Err(e) = commands.handle_command(&bot, &msg, command_str).await {
                                error!("Failed to handle command {command_str}: {e}");
                            }

                            Ok::<(), RequestError>(())
                        }
                    },
                ))
                .branch(
                    dptree::filter(|msg: Message| msg.text().is_some()).endpoint(
                        move |bot: Bot, msg: Message| {
                            let handler = handler.clone();
                            async move {
                                debug!(
                                    "Handling message from chat: {}, user: {:?}",
                                    msg.chat.id,
                                    msg.from()
                                );

                                if let MessageKind::Common(common_msg) = &msg.kind {
                                    if let MediaKind::Text(_) = &common_msg.media_kind {
                                        if let Err(e) = handler.handle_message(&bot, &msg).await {
                                            error!("Failed to handle message: {e}");

                                            let error_text = "❌ Произошла ошибка при обработке сообщения. Попробуйте еще раз.";
                                            if let Err(send_err) =
                                                bot.send_message(msg.chat.id, error_text).await
                                            {
                                                error!("Failed to send error message: {send_err}");
                                            }
                                        }
                                    }
                                }

                                Ok::<(), RequestError>(())
                            }
                        },
                    ),
                ),
        )
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

        Ok(())
    }
}

/// Connects to Telegram and runs the dispatcher until shutdown.
pub async fn start_bot(token: &str, message_handler: MessageHandler) -> Result<()> {
    info!("🚀 Initializing Telegram Bot...");

    let bot = Bot::new(token);

    match bot.get_me().await {
        Ok(me) => {
            info!("✅ Bot connected successfully:");
            info!("  - Username: @{}", me.username());
            info!("  - Name: {}", me.first_name);
            info!("  - ID: {}", me.id);
        }
        Err(e) => {
            error!("❌ Failed to connect to Telegram Bot API: {e}");
            return Err(anyhow::anyhow!("Bot connection failed: {}", e));
        }
    }

    let dispatcher = BotDispatcher::new(message_handler);

    info!("🎯 Starting message processing...");
    info!("💡 Bot is now ready to receive sale reports!");

    dispatcher.run(bot).await?;

    Ok(())
}
