pub mod coin;
pub mod history;
pub mod snapshot;

pub use coin::Coin;
pub use history::HistoricalRecord;
pub use snapshot::{PricePoint, PriceSnapshot, Range};
