use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub telegram_bot_token: String,
    pub csv_path: String,
    pub bot_name: String,
    pub sheets_webhook_url: Option<String>,
    pub health_port: u16,
    pub max_retry_attempts: u32,
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let telegram_bot_token =
            env::var("TELEGRAM_BOT_TOKEN").map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        let csv_path = env::var("CSV_PATH").unwrap_or_else(|_| "sales_data.csv".to_string());

        let bot_name = env::var("BOT_NAME").unwrap_or_else(|_| "SalesBot".to_string());

        let sheets_webhook_url = env::var("SHEETS_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let health_port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .unwrap_or(8000);

        let max_retry_attempts = env::var("MAX_RETRY_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u32>()
            .unwrap_or(3);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Settings {
            telegram_bot_token,
            csv_path,
            bot_name,
            sheets_webhook_url,
            health_port,
            max_retry_attempts,
            log_level,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram_bot_token.is_empty() {
            return Err(anyhow!("Telegram bot token cannot be empty"));
        }

        if self.csv_path.is_empty() {
            return Err(anyhow!("CSV path cannot be empty"));
        }

        if self.health_port == 0 {
            return Err(anyhow!("Health port must be greater than 0"));
        }

        if self.max_retry_attempts == 0 {
            return Err(anyhow!("Max retry attempts must be greater than 0"));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            telegram_bot_token: String::new(),
            csv_path: "sales_data.csv".to_string(),
            bot_name: "SalesBot".to_string(),
            sheets_webhook_url: None,
            health_port: 8000,
            max_retry_attempts: 3,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_validate_except_token() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_err());

        settings.telegram_bot_token = "123:abc".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_retries_rejected() {
        let settings = Settings {
            telegram_bot_token: "123:abc".to_string(),
            max_retry_attempts: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
