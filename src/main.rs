mod bot;
mod calculator;
mod config;
mod error;
mod parser;
mod retry;
mod storage;
mod utils;
mod web;

use anyhow::Result;
use dotenv::dotenv;
use log::info;

use bot::{dispatcher, MessageHandler};
use config::Settings;
use storage::StorageManager;
use utils::Logger;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    env_logger::init();

    Logger::log_operation_start("SalesBot", "Initializing application");

    let settings = match Settings::new() {
        Ok(s) => {
            Logger::log_operation_success("Configuration", "Settings loaded successfully");
            s
        }
        Err(e) => {
            Logger::log_operation_failure("Configuration", &e.to_string());
            return Err(e);
        }
    };

    if let Err(e) = settings.validate() {
        Logger::log_operation_failure("Configuration validation", &e.to_string());
        return Err(e);
    }

    let storage = match StorageManager::new(&settings).await {
        Ok(s) => {
            Logger::log_operation_success("Storage", "CSV store initialized successfully");
            s
        }
        Err(e) => {
            Logger::log_operation_failure("Storage", &e.to_string());
            return Err(e.into());
        }
    };

    let message_handler = MessageHandler::new(storage);
    Logger::log_operation_success("MessageHandler", "Handler initialized successfully");

    info!("🤖 SalesBot initialized successfully!");
    info!("📊 Configuration:");
    info!("  - Bot Name: {}", settings.bot_name);
    info!("  - CSV file: {}", settings.csv_path);
    info!(
        "  - Sheet sink: {}",
        if settings.sheets_webhook_url.is_some() {
            "configured"
        } else {
            "disabled"
        }
    );
    info!("  - Health port: {}", settings.health_port);
    info!("  - Max Retry Attempts: {}", settings.max_retry_attempts);

    // the hosting platform's health probe runs beside the dispatcher
    let health_port = settings.health_port;
    tokio::spawn(async move {
        if let Err(e) = web::serve_health(health_port).await {
            Logger::log_operation_failure("HealthServer", &e.to_string());
        }
    });

    dispatcher::start_bot(&settings.telegram_bot_token, message_handler).await?;

    Ok(())
}
