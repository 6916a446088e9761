use chrono::{DateTime, FixedOffset, Utc};
use log::debug;
use thiserror::Error;

use crate::parser::dialect::{self, Dialect};
use crate::parser::patterns::ParserPatterns;
use crate::parser::{fields, terse};
use crate::storage::models::{ParsedSale, ValidSale, UNSPECIFIED_SOURCE};

/// Publication times are tracked in Europe/Moscow, which sits at UTC+3
/// year-round.
const MOSCOW_OFFSET_SECS: i32 = 3 * 3600;

pub fn moscow_offset() -> FixedOffset {
    FixedOffset::east_opt(MOSCOW_OFFSET_SECS).unwrap()
}

pub fn moscow_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&moscow_offset())
}

/// Why a parsed record cannot be stored. The texts go straight to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Не удалось определить ник покупателя")]
    BuyerMissing,
    #[error("Не удалось определить сумму")]
    AmountMissing,
}

#[derive(Clone, Debug)]
pub struct SaleParser {
    patterns: &'static ParserPatterns,
}

impl SaleParser {
    pub fn new() -> Self {
        Self {
            patterns: ParserPatterns::get_instance(),
        }
    }

    /// Parses against the current Moscow wall clock.
    pub fn parse(&self, text: &str) -> ParsedSale {
        self.parse_at(text, moscow_now())
    }

    /// Pure form: the same text and clock always produce the same record.
    /// Never fails; fields that cannot be determined come back empty and
    /// are judged later by [`ParsedSale::validate`].
    pub fn parse_at(&self, text: &str, now: DateTime<FixedOffset>) -> ParsedSale {
        debug!("Parsing message: {text}");

        let dialect = dialect::classify(self.patterns, text);
        debug!("Dialect: {dialect:?}");

        if dialect == Dialect::Terse {
            let record = terse::parse(self.patterns, text, now);
            // a terse result without a buyer usually means the shape guess
            // was wrong; give the punctuated cascades a chance
            if record.buyer.is_some() {
                debug!("Terse result: {record:?}");
                return record;
            }
        }

        let lowered = text.to_lowercase();
        let date = fields::extract_date(self.patterns, &lowered, now);
        let time = fields::extract_time(self.patterns, &lowered);
        let occurred_at = match (date, time) {
            (Some(date), Some(time)) => format!("{date} {time}"),
            (Some(date), None) => format!("{date} {}", now.format("%H:%M")),
            (None, Some(time)) => format!("{} {time}", now.format("%d.%m.%Y")),
            (None, None) => now.format("%d.%m.%Y %H:%M").to_string(),
        };

        let record = ParsedSale {
            buyer: fields::extract_buyer(self.patterns, text),
            occurred_at,
            amount: fields::extract_amount(self.patterns, text),
            source: fields::extract_source(self.patterns, text),
            original_text: text.to_string(),
        };
        debug!("Punctuated result: {record:?}");
        record
    }
}

impl Default for SaleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ParsedSale {
    /// A record is storable when both buyer and amount are known. A missing
    /// source is healed to the sentinel, never rejected; the date-time half
    /// was already defaulted during parsing.
    pub fn validate(self) -> Result<ValidSale, ValidationError> {
        let buyer = self
            .buyer
            .filter(|b| !b.trim().is_empty())
            .ok_or(ValidationError::BuyerMissing)?;
        let amount = self
            .amount
            .filter(|a| !a.trim().is_empty())
            .ok_or(ValidationError::AmountMissing)?;
        let source = self
            .source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNSPECIFIED_SOURCE.to_string());

        Ok(ValidSale {
            buyer,
            occurred_at: self.occurred_at,
            amount,
            source,
        })
    }
}
