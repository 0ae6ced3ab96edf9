//! Money formatting for balances and receipts shown to the user.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency code, stored upper-case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn symbol(&self) -> String {
        symbol_for(self.as_str())
    }

    pub fn minor_units(&self) -> u8 {
        minor_units_for(self.as_str())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

/// Separators used when rendering numbers for a language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::from_tag("en-US")
    }
}

impl LocaleConfig {
    /// Picks separators from the language part of a BCP 47 tag. Unknown languages use
    /// the English convention.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator) = match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "tr" | "id" => (',', '.'),
            "fr" | "pl" | "cs" | "sv" | "fi" | "nb" | "ru" => (',', ' '),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "BRL" => "R$".into(),
        "AUD" => "A$".into(),
        "INR" => "₹".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders `value` with `precision` decimals and locale grouping.
pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let mut out = String::new();
    if value < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, locale.grouping_separator));
    if let Some(frac_part) = frac_part {
        out.push(locale.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Formats an amount with the currency symbol, e.g. `$1,234.50` or `-€12,00`.
pub fn format_amount(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let body = format_number(locale, amount, code.minor_units());
    let symbol = code.symbol();
    match body.strip_prefix('-') {
        Some(unsigned) => format!("-{symbol}{unsigned}"),
        None => format!("{symbol}{body}"),
    }
}
