use chrono::NaiveDateTime;
use log::{error, info};

use crate::parser::message::ValidationError;
use crate::parser::patterns::{self, ParserPatterns};
use crate::storage::models::{SalesStats, ValidSale};

/// Operation lifecycle logging.
pub struct Logger;

impl Logger {
    pub fn log_operation_start(operation: &str, details: &str) {
        info!("🚀 Starting {}: {}", operation, details);
    }

    pub fn log_operation_success(operation: &str, details: &str) {
        info!("✅ {} completed successfully: {}", operation, details);
    }

    pub fn log_operation_failure(operation: &str, error: &str) {
        error!("❌ {} failed: {}", operation, error);
    }

    pub fn log_sale_recorded(sale: &ValidSale) {
        info!(
            "💰 Sale Recorded: {} | {} | {} | {}",
            sale.buyer, sale.occurred_at, sale.amount, sale.source
        );
    }
}

/// User-facing reply texts.
pub struct Formatter;

impl Formatter {
    pub fn confirmation_text(sale: &ValidSale) -> String {
        format!(
            "✅ Реклама успешно записана!\n\n\
             👤 Ник покупателя: {}\n\
             📅 Дата и время публикации: {}\n\
             💰 Сумма: {}\n\
             📺 Источник размещения: {}\n\n\
             📊 Используйте /stats для просмотра статистики",
            sale.buyer, sale.occurred_at, sale.amount, sale.source
        )
    }

    pub fn rejection_text(reason: ValidationError) -> String {
        format!(
            "❌ {}\n\n\
             Попробуйте переформулировать сообщение или используйте /help для примеров.\n\n\
             Примеры правильных сообщений:\n\
             • @nikita 15.12.2025 на 19:30 200usdt \"соль да перец\"\n\
             • @ivan вчера на 14:00 150₽ \"криптоканал\"\n\
             • @maria сегодня на 20:15 0.01btc \"телеграм группа\"",
            reason
        )
    }

    pub fn stats_text(stats: &SalesStats) -> String {
        format!(
            "📊 Статистика рекламы:\n\n\
             📈 Всего размещений: {}\n\
             💰 USDT: {} ({:.0} USDT)\n\
             💴 Рубли: {} ({:.0}₽)",
            stats.total, stats.usdt_count, stats.usdt_total, stats.rub_count, stats.rub_total
        )
    }
}

/// Sanity checks over the canonical string forms.
pub struct Validator;

impl Validator {
    /// True when the string is a full "ДД.ММ.ГГГГ ЧЧ:ММ" timestamp.
    pub fn is_valid_datetime(value: &str) -> bool {
        NaiveDateTime::parse_from_str(value, "%d.%m.%Y %H:%M").is_ok()
    }

    /// True when the string looks like "<число> <валюта>".
    pub fn is_valid_amount(value: &str) -> bool {
        let patterns = ParserPatterns::get_instance();
        let mut parts = value.splitn(2, ' ');
        let number_ok = parts
            .next()
            .map(|n| patterns.token_number.is_match(n.trim_end_matches('k')))
            .unwrap_or(false);
        let currency_ok = parts
            .next()
            .map(|c| patterns::has_currency_keyword(&c.to_lowercase()))
            .unwrap_or(false);
        number_ok && currency_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_validation() {
        assert!(Validator::is_valid_datetime("15.09.2025 12:30"));
        assert!(Validator::is_valid_datetime("5.9.2025 9:05"));
        assert!(!Validator::is_valid_datetime("15.09.2025"));
        assert!(!Validator::is_valid_datetime("31.02.2025 12:30"));
        assert!(!Validator::is_valid_datetime("15.09.2025 50:00"));
    }

    #[test]
    fn test_amount_validation() {
        assert!(Validator::is_valid_amount("65 USDT"));
        assert!(Validator::is_valid_amount("150 ₽"));
        assert!(Validator::is_valid_amount("0.01 BTC"));
        assert!(Validator::is_valid_amount("5k ₽"));
        assert!(!Validator::is_valid_amount("USDT"));
        assert!(!Validator::is_valid_amount("много денег"));
    }

    #[test]
    fn test_confirmation_mentions_every_field() {
        let sale = ValidSale {
            buyer: "@swagger".to_string(),
            occurred_at: "15.09.2025 12:30".to_string(),
            amount: "65 USDT".to_string(),
            source: "биб".to_string(),
        };
        let text = Formatter::confirmation_text(&sale);
        for needle in ["@swagger", "15.09.2025 12:30", "65 USDT", "биб"] {
            assert!(text.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_rejection_text_carries_reason() {
        let text = Formatter::rejection_text(ValidationError::AmountMissing);
        assert!(text.contains("Не удалось определить сумму"));
        assert!(text.contains("/help"));
    }

    #[test]
    fn test_stats_text() {
        let stats = SalesStats {
            total: 3,
            usdt_count: 2,
            usdt_total: 265.0,
            rub_count: 1,
            rub_total: 150.0,
        };
        let text = Formatter::stats_text(&stats);
        assert!(text.contains("Всего размещений: 3"));
        assert!(text.contains("265 USDT"));
        assert!(text.contains("150₽"));
    }
}
