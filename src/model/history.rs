use crate::serde_util::{deserialize_decimal, deserialize_f64, EntityId};
use bigdecimal::BigDecimal;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HistoricalRecord {
    pub id: EntityId,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price: Option<BigDecimal>,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub percent_change_24h: Option<f64>,
}
