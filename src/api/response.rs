use crate::serde_util::{deserialize_decimal, deserialize_f64};
use bigdecimal::BigDecimal;
use serde::Deserialize;

/// Payload of `getDataById`: the current price plus one price and percent
/// change per lookback point. Any field may be null or missing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CoinQuote {
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price_90d_ago: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub percent_change_90d: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price_60d_ago: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub percent_change_60d: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price_30d_ago: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub percent_change_30d: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price_7d_ago: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub percent_change_7d: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price_24h_ago: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub percent_change_24h: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price_1h_ago: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub percent_change_1h: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub volume_24h: Option<BigDecimal>,
}
