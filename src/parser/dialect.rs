use crate::parser::patterns::{self, ParserPatterns};

/// The two observed message dialects. Terse messages are bare token runs
/// ("@swagger 15.09 1230 65юсдт биб"); punctuated messages carry quotes,
/// commas or connective words ("@nikita 15.12.2025 на 19:30 200usdt \"соль да перец\"").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Terse,
    Punctuated,
}

/// Ordered decision rules; the first one that fires wins, and the order is
/// load-bearing for inputs that trigger several of them.
pub fn classify(patterns: &ParserPatterns, text: &str) -> Dialect {
    // quoting or list punctuation is the strongest structured-format signal
    if text
        .chars()
        .any(|c| matches!(c, '"' | '\'' | '«' | '»' | ',' | ';'))
    {
        return Dialect::Punctuated;
    }

    // connective words only appear in the structured format; matched as
    // whole words so dates like "15.09" don't trip over "в"/"на"
    let lowered = text.to_lowercase();
    if patterns.structural_word.is_match(&lowered) {
        return Dialect::Punctuated;
    }

    let has_digit = text.chars().any(|c| c.is_ascii_digit());

    // a handle plus any number is the terse "just dumped it" format
    if text.contains('@') && has_digit {
        return Dialect::Terse;
    }

    // numbers next to currency markers without structure, likewise
    if has_digit && patterns::has_currency_keyword(&lowered) {
        return Dialect::Terse;
    }

    // handle plus the "5000р" ruble shorthand
    if text.contains('@') && patterns.ruble_shorthand.is_match(text) {
        return Dialect::Terse;
    }

    // the punctuated pipeline degrades gracefully on anything else
    Dialect::Punctuated
}
