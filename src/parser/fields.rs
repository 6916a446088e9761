use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};

use crate::parser::patterns::{self, ParserPatterns, BTC, ETH, RUB, USDT};

const USDT_HINTS: [&str; 3] = ["usdt", "usd", "долл"];
const RUB_HINTS: [&str; 4] = ["₽", "руб", "рубл", "р"];
const RUB_CONTEXT_HINTS: [&str; 5] = ["₽", "руб", "рубл", "р", "наличн"];
const THOUSANDS_HINTS: [&str; 3] = ["тысяч", "к", "k"];

/// Buyer cascade: @handle, then a name after a sale keyword, then a
/// capitalized run at the start, then any capitalized words.
pub fn extract_buyer(patterns: &ParserPatterns, text: &str) -> Option<String> {
    if let Some(caps) = patterns.username.captures(text) {
        return Some(format!("@{}", &caps[1]));
    }

    for keyword_regex in &patterns.buyer_keyword {
        if let Some(caps) = keyword_regex.captures(text) {
            let buyer = caps[1].trim();
            if buyer.chars().count() > 1 && !buyer.chars().all(|c| c.is_ascii_digit()) {
                return Some(title_case(buyer));
            }
        }
    }

    if let Some(caps) = patterns.name_at_start.captures(text) {
        return Some(caps[1].to_string());
    }

    let names: Vec<&str> = patterns
        .capitalized_word
        .find_iter(text)
        .map(|m| m.as_str())
        .take(2)
        .collect();
    if !names.is_empty() {
        return Some(names.join(" "));
    }

    None
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Date cascade over the lower-cased message: the words "сегодня"/"вчера",
/// then "12 декабря" phrases, then numeric ДД.ММ.ГГГГ / ДД/ММ/ГГ. Every
/// numeric candidate must form a real calendar date or the search moves on.
pub fn extract_date(
    patterns: &ParserPatterns,
    text: &str,
    now: DateTime<FixedOffset>,
) -> Option<String> {
    if text.contains("сегодня") {
        return Some(now.format("%d.%m.%Y").to_string());
    }
    if text.contains("вчера") {
        let yesterday = now - Duration::days(1);
        return Some(yesterday.format("%d.%m.%Y").to_string());
    }

    for caps in patterns.date_month_name.captures_iter(text) {
        let Ok(day) = caps[1].parse::<u32>() else {
            continue;
        };
        let Some(month) = patterns::month_number(&caps[2]) else {
            continue;
        };
        if NaiveDate::from_ymd_opt(now.year(), month, day).is_some() {
            return Some(format!("{:02}.{:02}.{}", day, month, now.year()));
        }
    }

    for caps in patterns.date_numeric.captures_iter(text) {
        let Ok(day) = caps[1].parse::<u32>() else {
            continue;
        };
        let Ok(month) = caps[2].parse::<u32>() else {
            continue;
        };
        let year_text = if caps[3].len() == 2 {
            format!("20{}", &caps[3])
        } else {
            caps[3].to_string()
        };
        let Ok(year) = year_text.parse::<i32>() else {
            continue;
        };
        if NaiveDate::from_ymd_opt(year, month, day).is_some() {
            return Some(format!("{:02}.{:02}.{}", day, month, year));
        }
    }

    None
}

/// Time cascade: ЧЧ:ММ within range, else "в 15 часов" / "15ч" hour forms.
pub fn extract_time(patterns: &ParserPatterns, text: &str) -> Option<String> {
    if let Some(caps) = patterns.time_colon.captures(text) {
        if let (Ok(hours), Ok(minutes)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
            if hours <= 23 && minutes <= 59 {
                return Some(format!("{:02}:{:02}", hours, minutes));
            }
        }
    }

    if let Some(caps) = patterns.time_hour_word.captures(text) {
        if let Ok(hour) = caps[1].parse::<u32>() {
            if hour <= 23 {
                return Some(format!("{:02}:00", hour));
            }
        }
    }

    None
}

/// Amount cascade, highest confidence first: number glued to a currency
/// word, number with a thousands marker, the "5000р" shorthand, then any
/// bare number with the currency inferred from the whole message.
pub fn extract_amount(patterns: &ParserPatterns, text: &str) -> Option<String> {
    let cascade = [
        &patterns.amount_currency,
        &patterns.amount_thousands,
        &patterns.amount_ruble_tail,
        &patterns.amount_bare,
    ];

    for regex in cascade {
        if let Some(caps) = regex.captures(text) {
            let number = caps[1].replace(',', ".");
            let full_match = caps[0].to_lowercase();
            return Some(canonical_amount(&number, &full_match, text));
        }
    }

    None
}

fn canonical_amount(number: &str, full_match: &str, text: &str) -> String {
    if USDT_HINTS.iter().any(|kw| full_match.contains(kw)) {
        format!("{number} {USDT}")
    } else if RUB_HINTS.iter().any(|kw| full_match.contains(kw)) {
        format!("{number} {RUB}")
    } else if full_match.contains("btc") {
        format!("{number} {BTC}")
    } else if full_match.contains("eth") {
        format!("{number} {ETH}")
    } else if THOUSANDS_HINTS.iter().any(|kw| full_match.contains(kw)) {
        format!("{number}k {RUB}")
    } else {
        // bare number: look at the rest of the message for a currency hint
        let lowered = text.to_lowercase();
        if USDT_HINTS.iter().any(|kw| lowered.contains(kw)) {
            format!("{number} {USDT}")
        } else if RUB_CONTEXT_HINTS.iter().any(|kw| lowered.contains(kw)) {
            format!("{number} {RUB}")
        } else {
            format!("{number} {USDT}")
        }
    }
}

/// Source cascade: a quoted span ("", '', «»), then plain words after an
/// inline amount token, then the trailing word when it reads as free text.
pub fn extract_source(patterns: &ParserPatterns, text: &str) -> Option<String> {
    for regex in [
        &patterns.source_double_quoted,
        &patterns.source_single_quoted,
        &patterns.source_guillemet,
    ] {
        if let Some(caps) = regex.captures(text) {
            let span = caps[1].trim();
            if !span.is_empty() {
                return Some(span.to_string());
            }
        }
    }

    let words: Vec<&str> = text.split_whitespace().collect();

    let amount_index = words.iter().position(|word| {
        let lower = word.to_lowercase();
        lower.chars().any(|c| c.is_ascii_digit()) && patterns::has_currency_keyword(&lower)
    });

    if let Some(idx) = amount_index {
        let tail: Vec<&str> = words[idx + 1..]
            .iter()
            .copied()
            .filter(|word| {
                let lower = word.to_lowercase();
                let excluded = patterns.token_date.is_match(word)
                    || patterns.token_time_digits.is_match(word)
                    || patterns.token_time_colon.is_match(word)
                    || word.starts_with('@')
                    || lower.chars().any(|c| c.is_ascii_digit())
                    || patterns::has_currency_keyword(&lower);
                !excluded && word.chars().any(char::is_alphabetic)
            })
            .collect();
        if !tail.is_empty() {
            return Some(tail.join(" "));
        }
    }

    if let Some(last) = words.last() {
        let lower = last.to_lowercase();
        if last.chars().any(char::is_alphabetic)
            && !lower.chars().any(|c| c.is_ascii_digit())
            && !patterns::has_currency_keyword(&lower)
        {
            return Some(last.trim().to_string());
        }
    }

    None
}
