//! Plain-text views of the dashboard.

use crate::detail::{DetailCard, HistoryState, SnapshotState};
use crate::format::{
    format_card_price, format_currency, format_date, format_percent, format_volume,
    NOT_AVAILABLE_SHORT,
};
use crate::model::{Coin, HistoricalRecord, PricePoint, Range};
use crate::shell::Shell;
use bigdecimal::BigDecimal;
use std::fmt::Write;

const CHART_WIDTH: usize = 40;
const UP: &str = "▲";
const DOWN: &str = "▼";

/// Summary cards call zero an upward move. The detail chart's trend is
/// strict, so a flat series there is drawn as down.
pub fn is_change_positive(change: Option<f64>) -> bool {
    matches!(change, Some(change) if change >= 0.0)
}

fn arrow(positive: bool) -> &'static str {
    if positive {
        UP
    } else {
        DOWN
    }
}

fn percent_or_placeholder(change: Option<f64>) -> String {
    change.map(format_percent).unwrap_or_else(|| NOT_AVAILABLE_SHORT.to_string())
}

pub fn summary_card(position: usize, coin: &Coin) -> String {
    let change = coin.percent_change_24h;
    format!(
        "[{}] {} ({})\n    {}  {} {}\n    {}",
        position,
        coin.name,
        coin.symbol.to_uppercase(),
        format_card_price(coin.price.as_ref()),
        arrow(is_change_positive(change)),
        percent_or_placeholder(change),
        coin.logo
    )
}

/// Search box line followed by the open suggestion list, if any.
pub fn search_box(shell: &Shell) -> String {
    let mut out = format!("Search: {}\n", shell.search_term());
    if !shell.suggestions().is_empty() {
        for (i, coin) in shell.suggestions().iter().enumerate() {
            let _ = writeln!(out, "  {}. {} ({})", i + 1, coin.name, coin.symbol);
        }
    } else if !shell.search_term().trim().is_empty() {
        let _ = writeln!(out, "  No coin matches '{}'.", shell.search_term());
    }
    out
}

pub fn browse_view(shell: &Shell) -> String {
    let mut out = String::new();
    if shell.sample().is_empty() {
        let _ = writeln!(out, "No coins to show.");
        return out;
    }
    for (i, coin) in shell.sample().iter().enumerate() {
        let _ = writeln!(out, "{}\n", summary_card(i + 1, coin));
    }
    out
}

pub fn detail_view(card: &DetailCard) -> String {
    let coin = card.coin();
    if let SnapshotState::Loading = card.snapshot() {
        return format!("Loading data for {}...\n", coin.name);
    }

    let mut out = String::new();
    let _ = writeln!(out, "== {} ({}) ==", coin.name, coin.symbol.to_uppercase());
    let change = match card.range_change() {
        Some(change) => format!("{} {}", arrow(change >= 0.0), format_percent(change)),
        None => NOT_AVAILABLE_SHORT.to_string(),
    };
    let _ = writeln!(out, "{:<16}{}", "Current price:", format_currency(card.latest_price()));
    let _ = writeln!(out, "{:<16}{}", format!("Change ({}):", card.range()), change);
    let _ = writeln!(out, "{:<16}{}", "Volume (24h):", format_volume(card.latest_volume()));
    let _ = writeln!(out);

    match card.snapshot() {
        SnapshotState::Ready(_) => {
            let positive = card.is_trend_positive();
            let _ = writeln!(out, "Price, last {}  {}", card.range(), arrow(positive));
            for line in chart(card.filtered()) {
                let _ = writeln!(out, "{}", line);
            }
        }
        _ => {
            let _ = writeln!(out, "Price chart unavailable.");
        }
    }
    let _ = writeln!(out, "{}", range_selector(card.range()));
    let _ = writeln!(out);

    if !card.table_visible() {
        let _ = writeln!(out, "Type 'table' to show the price history.");
        return out;
    }
    match card.history() {
        HistoryState::Empty | HistoryState::Loading => {
            let _ = writeln!(out, "Loading history...");
        }
        HistoryState::NoData => {
            let _ = writeln!(out, "No historical data available.");
        }
        HistoryState::Populated(records) => out.push_str(&history_table(records)),
    }
    out
}

pub fn range_selector(selected: Range) -> String {
    let ranges: Vec<String> = Range::ALL
        .iter()
        .map(|r| {
            if *r == selected {
                format!("[{}]", r)
            } else {
                r.to_string()
            }
        })
        .collect();
    format!("Range: {}", ranges.join(" "))
}

/// One horizontal bar per point, scaled between the series' lowest and
/// highest price.
pub fn chart(series: &[PricePoint]) -> Vec<String> {
    let values: Vec<Option<f64>> = series.iter().map(|p| p.price.as_ref().and_then(to_f64)).collect();
    let known = values.iter().flatten();
    let min = known.clone().copied().fold(f64::INFINITY, f64::min);
    let max = known.copied().fold(f64::NEG_INFINITY, f64::max);

    series
        .iter()
        .zip(values)
        .map(|(point, value)| {
            let len = match value {
                Some(_) if max <= min => CHART_WIDTH / 2,
                Some(v) => 1 + ((v - min) / (max - min) * (CHART_WIDTH - 1) as f64).round() as usize,
                None => 0,
            };
            format!(
                "  {:>4} │{:<width$} {}",
                point.label.as_str(),
                "█".repeat(len),
                format_currency(point.price.as_ref()),
                width = CHART_WIDTH
            )
        })
        .collect()
}

pub fn history_table(records: &[HistoricalRecord]) -> String {
    let mut out = format!("  {:<20} {:<12} {}\n", "Price", "Date", "Change % (24h)");
    for record in records {
        let _ = writeln!(
            out,
            "  {:<20} {:<12} {}",
            format_currency(record.price.as_ref()),
            format_date(&record.date),
            percent_or_placeholder(record.percent_change_24h)
        );
    }
    out
}

fn to_f64(value: &BigDecimal) -> Option<f64> {
    value.to_plain_string().parse::<f64>().ok()
}
