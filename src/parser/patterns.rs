use regex::Regex;
use std::sync::OnceLock;

/// Canonical currency tags written into stored amounts. These strings are
/// part of the storage contract and must not change.
pub const USDT: &str = "USDT";
pub const RUB: &str = "₽";
pub const BTC: &str = "BTC";
pub const ETH: &str = "ETH";

/// Fragments that mark a token as carrying a currency, in any position.
pub const CURRENCY_KEYWORDS: [&str; 9] = [
    "usdt", "usd", "₽", "руб", "btc", "eth", "юсдт", "долл", "р",
];

/// Subset accepted as a standalone currency token next to a bare number
/// (a lone "р" is too ambiguous there).
pub const ADJACENT_CURRENCY_KEYWORDS: [&str; 8] =
    ["usdt", "usd", "₽", "руб", "btc", "eth", "юсдт", "долл"];

/// Fragments mapped to USDT / rubles when canonicalizing a currency-bearing
/// token.
pub const USDT_KEYWORDS: [&str; 4] = ["usdt", "usd", "юсдт", "долл"];
pub const RUB_KEYWORDS: [&str; 3] = ["₽", "руб", "р"];

/// Keywords that may introduce a buyer name in the punctuated dialect,
/// highest confidence first.
pub const BUYER_KEYWORDS: [&str; 6] = [
    "продал",
    "продажа",
    "клиент",
    "покупатель",
    "купил",
    "заказчик",
];

/// Russian month names (genitive case, as they appear after a day number).
pub const MONTH_NAMES: [(&str, u32); 12] = [
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
];

pub fn month_number(name_lower: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .find(|(name, _)| *name == name_lower)
        .map(|(_, number)| *number)
}

/// True when the lower-cased text contains any currency fragment.
pub fn has_currency_keyword(lower: &str) -> bool {
    CURRENCY_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[derive(Debug)]
pub struct ParserPatterns {
    // shared
    pub username: Regex,
    pub number: Regex,

    // dialect classifier
    pub structural_word: Regex,
    pub ruble_shorthand: Regex,

    // punctuated buyer cascade (after the username pattern)
    pub buyer_keyword: Vec<Regex>,
    pub name_at_start: Regex,
    pub capitalized_word: Regex,

    // punctuated date/time
    pub date_numeric: Regex,
    pub date_month_name: Regex,
    pub time_colon: Regex,
    pub time_hour_word: Regex,

    // punctuated amount cascade, highest confidence first
    pub amount_currency: Regex,
    pub amount_thousands: Regex,
    pub amount_ruble_tail: Regex,
    pub amount_bare: Regex,

    // punctuated source: quoted spans, in priority order
    pub source_double_quoted: Regex,
    pub source_single_quoted: Regex,
    pub source_guillemet: Regex,

    // terse token shapes (whole-token matches)
    pub token_date: Regex,
    pub token_day: Regex,
    pub token_time_digits: Regex,
    pub token_time_colon: Regex,
    pub token_number: Regex,
    pub token_digits: Regex,
}

impl ParserPatterns {
    pub fn new() -> Self {
        let month_alternation = MONTH_NAMES
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("|");

        let buyer_keyword = BUYER_KEYWORDS
            .iter()
            .map(|keyword| {
                // the name runs until a preposition, punctuation or the end
                Regex::new(&format!(
                    r"(?i){keyword}\s*:?\s*([А-Яа-яA-Za-z0-9\s_-]+?)(?:\s(?:за|в|на|по|крипт|рубл|₽|час|мин)|$|[.!,])"
                ))
                .unwrap()
            })
            .collect();

        Self {
            username: Regex::new(r"@(\w+)").unwrap(),
            number: Regex::new(r"(\d+(?:[.,]\d+)?)").unwrap(),

            structural_word: Regex::new(
                r"\b(?:за|через|сегодня|вчера|продал|клиент|покупатель)\b",
            )
            .unwrap(),
            ruble_shorthand: Regex::new(r"\d+р\b").unwrap(),

            buyer_keyword,
            name_at_start: Regex::new(r"^([А-Я][а-я]+(?:\s[А-Я][а-я]+)*)").unwrap(),
            capitalized_word: Regex::new(r"[А-Я][а-я]+").unwrap(),

            date_numeric: Regex::new(r"(\d{1,2})[./](\d{1,2})[./](\d{2,4})").unwrap(),
            date_month_name: Regex::new(&format!(r"(\d{{1,2}})\s+({month_alternation})"))
                .unwrap(),
            time_colon: Regex::new(r"(\d{1,2}):(\d{2})").unwrap(),
            time_hour_word: Regex::new(r"(?:в\s*)?(\d{1,2})\s*(?:час|ч)").unwrap(),

            amount_currency: Regex::new(
                r"(?i)(\d+(?:[.,]\d+)?)\s*(?:usdt|usd|₽|руб|рубл|btc|eth|долл)",
            )
            .unwrap(),
            amount_thousands: Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:тысяч|к|k)").unwrap(),
            amount_ruble_tail: Regex::new(r"(?i)(\d+(?:[.,]\d+)?)(?:р|₽|руб|рубл)").unwrap(),
            amount_bare: Regex::new(r"(\d+(?:[.,]\d+)?)").unwrap(),

            source_double_quoted: Regex::new(r#""([^"]+)""#).unwrap(),
            source_single_quoted: Regex::new(r"'([^']+)'").unwrap(),
            source_guillemet: Regex::new(r"«([^»]+)»").unwrap(),

            token_date: Regex::new(r"^\d{1,2}\.\d{1,2}(?:\.\d{2,4})?$").unwrap(),
            token_day: Regex::new(r"^\d{1,2}$").unwrap(),
            token_time_digits: Regex::new(r"^\d{3,4}$").unwrap(),
            token_time_colon: Regex::new(r"^\d{1,2}:\d{2}$").unwrap(),
            token_number: Regex::new(r"^\d+(?:[.,]\d+)?$").unwrap(),
            token_digits: Regex::new(r"^\d+$").unwrap(),
        }
    }

    pub fn get_instance() -> &'static Self {
        static INSTANCE: OnceLock<ParserPatterns> = OnceLock::new();
        INSTANCE.get_or_init(ParserPatterns::new)
    }
}

impl Default for ParserPatterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_lookup() {
        assert_eq!(month_number("января"), Some(1));
        assert_eq!(month_number("декабря"), Some(12));
        assert_eq!(month_number("январь"), None);
    }

    #[test]
    fn test_currency_keyword_detection() {
        assert!(has_currency_keyword("65юсдт"));
        assert!(has_currency_keyword("5000р"));
        assert!(has_currency_keyword("0.01btc"));
        assert!(!has_currency_keyword("1230"));
    }

    #[test]
    fn test_token_shapes() {
        let patterns = ParserPatterns::get_instance();
        assert!(patterns.token_date.is_match("15.09"));
        assert!(patterns.token_date.is_match("15.09.2025"));
        assert!(!patterns.token_date.is_match("15.09.2025г"));
        assert!(patterns.token_time_digits.is_match("1230"));
        assert!(!patterns.token_time_digits.is_match("12"));
        assert!(patterns.token_time_colon.is_match("9:45"));
    }

    #[test]
    fn test_structural_word_is_whole_word_only() {
        let patterns = ParserPatterns::get_instance();
        assert!(patterns.structural_word.is_match("продал вчера"));
        // "за" inside another word must not count
        assert!(!patterns.structural_word.is_match("заказ без меток"));
    }

    #[test]
    fn test_ruble_shorthand_boundary() {
        let patterns = ParserPatterns::get_instance();
        assert!(patterns.ruble_shorthand.is_match("6000р биз"));
        assert!(!patterns.ruble_shorthand.is_match("6000руб"));
    }
}
