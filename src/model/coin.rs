use crate::serde_util::{deserialize_decimal, deserialize_f64, EntityId};
use bigdecimal::BigDecimal;
use serde::Deserialize;

/// One row of the coin list endpoint. Extra fields sent by the backend are
/// ignored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Coin {
    pub id: EntityId,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub percent_change_24h: Option<f64>,
}

impl Coin {
    /// Case-insensitive substring match against name or symbol.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.symbol.to_lowercase().contains(&term)
    }
}

#[cfg(test)]
pub(crate) fn coin(id: u64, name: &str, symbol: &str) -> Coin {
    Coin {
        id: EntityId::from(id),
        name: name.to_string(),
        symbol: symbol.to_string(),
        logo: format!("https://img.example/{}.png", symbol.to_lowercase()),
        price: None,
        percent_change_24h: None,
    }
}
