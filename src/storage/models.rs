use serde::{Deserialize, Serialize};

/// Source value written when the message names no placement at all.
pub const UNSPECIFIED_SOURCE: &str = "Не указан";

/// Header row of the sales table, kept byte-compatible with the existing
/// spreadsheets.
pub const RECORD_HEADERS: [&str; 4] = [
    "Ник покупателя",
    "Дата и время публикации",
    "Сумма",
    "Источник размещения",
];

/// Best-effort extraction result for one incoming message. `occurred_at` is
/// always populated (defaulted from the wall clock when the message has no
/// date/time cues); the other fields stay `None` when no pattern matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSale {
    pub buyer: Option<String>,
    pub occurred_at: String,
    pub amount: Option<String>,
    pub source: Option<String>,
    pub original_text: String,
}

/// A record that passed validation and is ready for the storage sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidSale {
    pub buyer: String,
    pub occurred_at: String,
    pub amount: String,
    pub source: String,
}

/// Aggregates for the /stats command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesStats {
    pub total: usize,
    pub usdt_count: usize,
    pub usdt_total: f64,
    pub rub_count: usize,
    pub rub_total: f64,
}
