//! Display formatting for prices, volumes and percentages.
//!
//! Currency and volume follow the es-CO convention: `.` groups thousands and
//! `,` separates decimals.

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const NOT_AVAILABLE: &str = "Not available";
pub const NOT_AVAILABLE_SHORT: &str = "N/A";
pub const CARD_PRICE_PLACEHOLDER: &str = "--";

/// `US$ 1.234,57`, always two fraction digits.
pub fn format_currency(value: Option<&BigDecimal>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };
    let plain = value.with_scale_round(2, RoundingMode::HalfUp).to_plain_string();
    let (negative, digits) = split_sign(value, &plain);
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, "00"));
    format!(
        "{}US$ {},{}",
        if negative { "-" } else { "" },
        group_thousands(integer, '.'),
        fraction
    )
}

/// Whole units with thousands grouping. Zero volume counts as missing.
pub fn format_volume(value: Option<&BigDecimal>) -> String {
    match value {
        Some(value) if *value != BigDecimal::from(0) => {
            let plain = value.with_scale_round(0, RoundingMode::HalfUp).to_plain_string();
            let (negative, digits) = split_sign(value, &plain);
            format!("{}{}", if negative { "-" } else { "" }, group_thousands(digits, '.'))
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Short price used on summary cards. A zero price is not shown.
pub fn format_card_price(value: Option<&BigDecimal>) -> String {
    match value {
        Some(value) if *value != BigDecimal::from(0) => {
            format!("${}", value.with_scale_round(2, RoundingMode::HalfUp).to_plain_string())
        }
        _ => CARD_PRICE_PLACEHOLDER.to_string(),
    }
}

/// `d/m/yyyy` for RFC 3339 timestamps and plain dates, anything else as is.
pub fn format_date(raw: &str) -> String {
    const DISPLAY: &str = "%-d/%-m/%Y";

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(DISPLAY).to_string();
    }
    raw.to_string()
}

/// The sign follows the unrounded value, so `-0.001` still reads `-US$ 0,00`.
fn split_sign<'a>(value: &BigDecimal, plain: &'a str) -> (bool, &'a str) {
    (*value < BigDecimal::from(0), plain.trim_start_matches('-'))
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped
}
