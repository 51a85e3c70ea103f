//! Seven-point price snapshot of one coin and the range filter applied to it
//! before charting.

use crate::api::response::CoinQuote;
use bigdecimal::BigDecimal;
use std::fmt;
use std::str::FromStr;

/// Label of a snapshot point, oldest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointLabel {
    Days90,
    Days60,
    Days30,
    Days7,
    Hours24,
    Hour1,
    Now,
}

impl PointLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointLabel::Days90 => "90d",
            PointLabel::Days60 => "60d",
            PointLabel::Days30 => "30d",
            PointLabel::Days7 => "7d",
            PointLabel::Hours24 => "24h",
            PointLabel::Hour1 => "1h",
            PointLabel::Now => "now",
        }
    }
}

impl fmt::Display for PointLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time window the user can chart. Every range except `Days90` cuts the
/// snapshot at its own label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Range {
    #[default]
    Days90,
    Days60,
    Days30,
    Days7,
    Hours24,
    Hour1,
}

impl Range {
    pub const ALL: [Range; 6] = [
        Range::Days90,
        Range::Days60,
        Range::Days30,
        Range::Days7,
        Range::Hours24,
        Range::Hour1,
    ];

    pub fn label(&self) -> PointLabel {
        match self {
            Range::Days90 => PointLabel::Days90,
            Range::Days60 => PointLabel::Days60,
            Range::Days30 => PointLabel::Days30,
            Range::Days7 => PointLabel::Days7,
            Range::Hours24 => PointLabel::Hours24,
            Range::Hour1 => PointLabel::Hour1,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label().as_str())
    }
}

impl FromStr for Range {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Range::ALL
            .iter()
            .copied()
            .find(|r| r.label().as_str() == s)
            .ok_or_else(|| format!("unknown range '{}', expected one of 90d, 60d, 30d, 7d, 24h, 1h", s))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PricePoint {
    pub label: PointLabel,
    pub price: Option<BigDecimal>,
    /// Absent on the `Now` point.
    pub percent_change: Option<f64>,
    /// Present only on the `Now` point.
    pub volume_24h: Option<BigDecimal>,
}

impl PricePoint {
    fn lookback(label: PointLabel, price: &Option<BigDecimal>, percent_change: Option<f64>) -> Self {
        Self {
            label,
            price: price.clone(),
            percent_change,
            volume_24h: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceSnapshot {
    points: Vec<PricePoint>,
}

impl PriceSnapshot {
    pub fn from_quote(quote: &CoinQuote) -> Self {
        let points = vec![
            PricePoint::lookback(PointLabel::Days90, &quote.price_90d_ago, quote.percent_change_90d),
            PricePoint::lookback(PointLabel::Days60, &quote.price_60d_ago, quote.percent_change_60d),
            PricePoint::lookback(PointLabel::Days30, &quote.price_30d_ago, quote.percent_change_30d),
            PricePoint::lookback(PointLabel::Days7, &quote.price_7d_ago, quote.percent_change_7d),
            PricePoint::lookback(PointLabel::Hours24, &quote.price_24h_ago, quote.percent_change_24h),
            PricePoint::lookback(PointLabel::Hour1, &quote.price_1h_ago, quote.percent_change_1h),
            PricePoint {
                label: PointLabel::Now,
                price: quote.price.clone(),
                percent_change: None,
                volume_24h: quote.volume_24h.clone(),
            },
        ];
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn point(&self, label: PointLabel) -> Option<&PricePoint> {
        self.points.iter().find(|p| p.label == label)
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// `Days90` keeps every point. Any other range keeps the contiguous
    /// suffix starting at that range's label, or nothing if no point carries
    /// the label.
    pub fn filter_by_range(&self, range: Range) -> &[PricePoint] {
        if range == Range::Days90 {
            return &self.points;
        }
        match self.points.iter().position(|p| p.label == range.label()) {
            Some(index) => &self.points[index..],
            None => &[],
        }
    }
}

/// Upward iff the last price is strictly greater than the first. Ties and
/// missing prices are not upward.
pub fn is_trend_positive(series: &[PricePoint]) -> bool {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => match (&first.price, &last.price) {
            (Some(first), Some(last)) => last > first,
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
pub(crate) fn quote_with_prices(prices: [i64; 7]) -> CoinQuote {
    let d = |v: i64| Some(BigDecimal::from(v));
    CoinQuote {
        price_90d_ago: d(prices[0]),
        percent_change_90d: Some(25.0),
        price_60d_ago: d(prices[1]),
        percent_change_60d: Some(13.64),
        price_30d_ago: d(prices[2]),
        percent_change_30d: Some(19.05),
        price_7d_ago: d(prices[3]),
        percent_change_7d: Some(4.17),
        price_24h_ago: d(prices[4]),
        percent_change_24h: Some(5.93),
        price_1h_ago: d(prices[5]),
        percent_change_1h: Some(-0.5),
        price: d(prices[6]),
        volume_24h: Some(BigDecimal::from(35_123_456_789_i64)),
    }
}
