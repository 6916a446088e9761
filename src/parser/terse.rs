use chrono::{DateTime, Datelike, FixedOffset};

use crate::parser::patterns::{self, ParserPatterns, BTC, ETH, RUB, USDT};
use crate::storage::models::ParsedSale;

/// Single-pass positional extraction for token runs like
/// "@swagger 15.09 1230 65юсдт биб". Everything is decided from token
/// shapes; no grammar, no punctuation.
pub fn parse(patterns: &ParserPatterns, text: &str, now: DateTime<FixedOffset>) -> ParsedSale {
    let words: Vec<&str> = text.split_whitespace().collect();

    let buyer = find_buyer(&words);
    let date = find_date(patterns, &words, now);
    let time = find_time(patterns, &words);
    let occurred_at = assemble_datetime(date, time, now);
    let amount = find_amount(patterns, &words);
    let source = find_source(patterns, &words, amount.as_deref(), buyer);

    ParsedSale {
        buyer: buyer.map(str::to_string),
        occurred_at,
        amount,
        source,
        original_text: text.to_string(),
    }
}

/// First @handle, else the first purely alphabetic token long enough to be
/// a name.
fn find_buyer<'a>(words: &[&'a str]) -> Option<&'a str> {
    if let Some(word) = words.iter().copied().find(|w| w.starts_with('@')) {
        return Some(word);
    }
    words
        .iter()
        .copied()
        .find(|w| w.chars().all(char::is_alphabetic) && w.chars().count() > 2)
}

/// A "ДД.ММ" / "ДД.ММ.ГГГГ" token, or a day number followed by a month
/// name ("12 декабря"). Two-digit years are left exactly as typed.
fn find_date(
    patterns: &ParserPatterns,
    words: &[&str],
    now: DateTime<FixedOffset>,
) -> Option<String> {
    for (i, word) in words.iter().enumerate() {
        if patterns.token_date.is_match(word) {
            return Some((*word).to_string());
        }
        if patterns.token_day.is_match(word) {
            if let Some(next) = words.get(i + 1) {
                if let Some(month) = patterns::month_number(&next.to_lowercase()) {
                    return Some(format!("{}.{:02}.{}", word, month, now.year()));
                }
            }
        }
    }
    None
}

/// "1230"/"930" style bare digits, or an already-formed "12:30".
fn find_time(patterns: &ParserPatterns, words: &[&str]) -> Option<String> {
    for word in words {
        if patterns.token_time_digits.is_match(word) {
            let padded = if word.len() == 3 {
                format!("0{word}")
            } else {
                (*word).to_string()
            };
            return Some(format!("{}:{}", &padded[..2], &padded[2..]));
        }
        if patterns.token_time_colon.is_match(word) {
            return Some((*word).to_string());
        }
    }
    None
}

/// Missing halves are filled from the wall clock; a year-less date always
/// gets the current year so the result stays a full ДД.ММ.ГГГГ ЧЧ:ММ.
fn assemble_datetime(
    date: Option<String>,
    time: Option<String>,
    now: DateTime<FixedOffset>,
) -> String {
    match (date, time) {
        (Some(date), Some(time)) => format!("{} {}", complete_year(&date, now), time),
        (Some(date), None) => format!("{} {}", complete_year(&date, now), now.format("%H:%M")),
        (None, Some(time)) => format!("{} {}", now.format("%d.%m.%Y"), time),
        (None, None) => now.format("%d.%m.%Y %H:%M").to_string(),
    }
}

fn complete_year(date: &str, now: DateTime<FixedOffset>) -> String {
    if date.split('.').count() == 2 {
        format!("{}.{}", date, now.year())
    } else {
        date.to_string()
    }
}

/// First token that is either number+currency in one word ("65юсдт",
/// "5000р") or a bare number whose neighbor names a currency ("200 usdt").
/// Tokens already claimed as handle, date or time are skipped.
fn find_amount(patterns: &ParserPatterns, words: &[&str]) -> Option<String> {
    for (i, word) in words.iter().enumerate() {
        if word.starts_with('@')
            || patterns.token_date.is_match(word)
            || patterns.token_time_digits.is_match(word)
            || patterns.token_time_colon.is_match(word)
        {
            continue;
        }

        let lower = word.to_lowercase();
        if patterns::has_currency_keyword(&lower) {
            if let Some(caps) = patterns.number.captures(word) {
                let number = caps[1].replace(',', ".");
                return Some(format!("{} {}", number, currency_tag(&lower)));
            }
        } else if patterns.token_number.is_match(word) {
            if let Some(next) = words.get(i + 1) {
                let next_lower = next.to_lowercase();
                if patterns::ADJACENT_CURRENCY_KEYWORDS
                    .iter()
                    .any(|kw| next_lower.contains(kw))
                {
                    let number = word.replace(',', ".");
                    return Some(format!("{} {}", number, currency_tag(&next_lower)));
                }
            }
        }
    }
    None
}

fn currency_tag(lower: &str) -> &'static str {
    if patterns::USDT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        USDT
    } else if patterns::RUB_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        RUB
    } else if lower.contains("btc") {
        BTC
    } else if lower.contains("eth") {
        ETH
    } else {
        USDT
    }
}

/// Whatever plain words follow the amount token; failing that, the last
/// plain word of the message (never the buyer again).
fn find_source(
    patterns: &ParserPatterns,
    words: &[&str],
    amount: Option<&str>,
    buyer: Option<&str>,
) -> Option<String> {
    let mut amount_index = None;
    if let Some(amount) = amount {
        let number = amount.split_whitespace().next().unwrap_or_default();
        for (i, word) in words.iter().enumerate() {
            let normalized = word.replace(',', ".");
            if normalized == number
                || (normalized.contains(number) && word.chars().any(|c| c.is_ascii_digit()))
            {
                amount_index = Some(i);
                break;
            }
        }
    }

    let mut source_words: Vec<&str> = Vec::new();
    if let Some(idx) = amount_index {
        for word in words[idx + 1..].iter().copied() {
            if is_source_candidate(patterns, word) {
                source_words.push(word);
            }
        }
    }

    if source_words.is_empty() {
        for word in words.iter().rev().copied() {
            if is_source_candidate(patterns, word) && Some(word) != buyer {
                source_words.push(word);
                break;
            }
        }
    }

    if source_words.is_empty() {
        None
    } else {
        Some(source_words.join(" "))
    }
}

fn is_source_candidate(patterns: &ParserPatterns, word: &str) -> bool {
    let lower = word.to_lowercase();
    !patterns.token_digits.is_match(word)
        && !patterns::has_currency_keyword(&lower)
        && !patterns.token_date.is_match(word)
        && !patterns.token_time_digits.is_match(word)
        && !patterns.token_time_colon.is_match(word)
        && !word.starts_with('@')
}
