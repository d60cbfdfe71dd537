//! Amount extraction from free-form note lines.
//!
//! A match is an optional currency token followed by a digit run:
//!   $90, 200 AED, AED 1,250.50, ١٠٠٬٠٠٠ درهم, ۵۰۰
//! Arabic-Indic and Eastern Arabic-Indic digits are transliterated to ASCII and
//! thousands separators are dropped before parsing. Amounts are never negative.

use famledger_core::Currency;
use regex::Regex;
use std::sync::LazyLock;

use crate::currency::detect_currency;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<currency>\$|€|(?i:usd|eur|aed|dirhams|dirham|dh)|درهم إماراتي|درهماً|درهم)?\s*",
        r"(?P<amount>[0-9٠-٩۰-۹][0-9٠-٩۰-۹.,٬٫]*)"
    ))
    .expect("amount pattern is valid")
});

/// One amount found in a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountMatch {
    pub value: f64,
    pub currency: Currency,
    /// Byte offset of the digits in the original line
    pub start: usize,
}

/// Map Arabic-Indic (٠-٩) and Eastern Arabic-Indic (۰-۹) digits to ASCII.
pub fn normalize_digits(text: &str) -> String {
    text.chars().map(ascii_digit).collect()
}

fn ascii_digit(c: char) -> char {
    match c {
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        _ => c,
    }
}

/// Parse a raw digit run into a number.
///
/// `,` and `٬` are thousands separators, `٫` is the Arabic decimal point and a
/// trailing `.` (end of sentence) is ignored.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && *c != '٬')
        .map(|c| if c == '٫' { '.' } else { ascii_digit(c) })
        .collect();
    let value: f64 = cleaned.trim_end_matches('.').parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Every parseable amount in the line, in order of appearance.
///
/// The currency comes from the token next to the digits when there is one,
/// otherwise from the whole line.
pub fn extract_amounts(line: &str, default: Currency) -> Vec<AmountMatch> {
    AMOUNT_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let digits = caps.name("amount")?;
            let value = parse_number(digits.as_str())?;
            let currency = match caps.name("currency") {
                Some(token) => detect_currency(token.as_str(), default),
                None => detect_currency(line, default),
            };
            Some(AmountMatch {
                value,
                currency,
                start: digits.start(),
            })
        })
        .collect()
}

/// The first amount in the line, if any
pub fn extract_amount(line: &str) -> Option<f64> {
    AMOUNT_RE
        .captures_iter(line)
        .filter_map(|caps| parse_number(caps.name("amount")?.as_str()))
        .next()
}
