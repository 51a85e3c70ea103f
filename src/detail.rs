//! Per-coin detail card: price snapshot, chart range and the historical
//! table, plus the background task that keeps the snapshot fresh.

use crate::api::response::CoinQuote;
use crate::api::{ApiHandle, FetchResult};
use crate::app::AppEvent;
use crate::model::snapshot::is_trend_positive;
use crate::model::{Coin, HistoricalRecord, PricePoint, PriceSnapshot, Range};
use crate::serde_util::EntityId;
use bigdecimal::BigDecimal;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, info, instrument, trace, warn};

#[derive(Debug)]
pub enum SnapshotState {
    Loading,
    Ready(PriceSnapshot),
    Unavailable,
}

#[derive(Debug, PartialEq)]
pub enum HistoryState {
    Empty,
    Loading,
    Populated(Vec<HistoricalRecord>),
    NoData,
}

#[derive(Debug)]
pub struct DetailCard {
    coin: Coin,
    epoch: u64,
    snapshot: SnapshotState,
    range: Range,
    table_visible: bool,
    history: HistoryState,
}

impl DetailCard {
    /// `epoch` tags every fetch issued for this card; results carrying any
    /// other epoch are dropped.
    pub fn new(coin: Coin, epoch: u64) -> Self {
        Self {
            coin,
            epoch,
            snapshot: SnapshotState::Loading,
            range: Range::default(),
            table_visible: false,
            history: HistoryState::Empty,
        }
    }

    pub fn coin(&self) -> &Coin {
        &self.coin
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn snapshot(&self) -> &SnapshotState {
        &self.snapshot
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn table_visible(&self) -> bool {
        self.table_visible
    }

    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    /// Returns false when the result belongs to another card.
    pub fn apply_snapshot(&mut self, epoch: u64, result: FetchResult<CoinQuote>) -> bool {
        if epoch != self.epoch {
            debug!(
                "Discarding snapshot for epoch {}, card {} is at epoch {}",
                epoch, self.coin.name, self.epoch
            );
            return false;
        }
        self.snapshot = match result {
            Ok(quote) => SnapshotState::Ready(PriceSnapshot::from_quote(&quote)),
            Err(error) => {
                warn!("Error getting price data for {}: {}", self.coin.name, error);
                SnapshotState::Unavailable
            }
        };
        true
    }

    pub fn select_range(&mut self, range: Range) {
        trace!("Range for {} set to {}", self.coin.name, range);
        self.range = range;
    }

    /// Chart series for the selected range; empty until a snapshot is ready.
    pub fn filtered(&self) -> &[PricePoint] {
        match &self.snapshot {
            SnapshotState::Ready(snapshot) => snapshot.filter_by_range(self.range),
            SnapshotState::Loading | SnapshotState::Unavailable => &[],
        }
    }

    pub fn is_trend_positive(&self) -> bool {
        is_trend_positive(self.filtered())
    }

    /// Percent change reported for the selected range's own point.
    pub fn range_change(&self) -> Option<f64> {
        match &self.snapshot {
            SnapshotState::Ready(snapshot) => snapshot
                .point(self.range.label())
                .and_then(|p| p.percent_change),
            _ => None,
        }
    }

    pub fn latest_price(&self) -> Option<&BigDecimal> {
        self.latest().and_then(|p| p.price.as_ref())
    }

    pub fn latest_volume(&self) -> Option<&BigDecimal> {
        self.latest().and_then(|p| p.volume_24h.as_ref())
    }

    /// Flips table visibility. Returns true when the caller must fetch the
    /// history, which happens only on the first show for this coin.
    pub fn toggle_table(&mut self) -> bool {
        self.table_visible = !self.table_visible;
        if self.table_visible && self.history == HistoryState::Empty {
            self.history = HistoryState::Loading;
            return true;
        }
        false
    }

    pub fn apply_history(&mut self, epoch: u64, result: FetchResult<Vec<HistoricalRecord>>) -> bool {
        if epoch != self.epoch {
            debug!("Discarding history for epoch {}", epoch);
            return false;
        }
        self.history = match result {
            Ok(records) if records.is_empty() => HistoryState::NoData,
            Ok(records) => HistoryState::Populated(records),
            Err(error) => {
                warn!("Error getting historical data for {}: {}", self.coin.name, error);
                HistoryState::NoData
            }
        };
        true
    }

    fn latest(&self) -> Option<&PricePoint> {
        match &self.snapshot {
            SnapshotState::Ready(snapshot) => snapshot.latest(),
            _ => None,
        }
    }
}

/// Stops the refresh loop when stopped or dropped.
#[derive(Debug)]
pub struct RefreshHandle {
    stop_sender: Option<oneshot::Sender<()>>,
}

impl RefreshHandle {
    pub fn stop(mut self) {
        self.signal();
    }

    fn signal(&mut self) {
        if let Some(stop_sender) = self.stop_sender.take() {
            if stop_sender.send(()).is_err() {
                trace!("Refresh loop already finished");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.signal();
    }
}

/// Fetches the snapshot right away and then once per `interval` until the
/// returned handle is stopped.
pub fn spawn_refresh(
    api: ApiHandle,
    coin_id: EntityId,
    epoch: u64,
    interval: Duration,
    events: UnboundedSender<AppEvent>,
) -> RefreshHandle {
    let (stop_sender, stop_recv) = oneshot::channel();
    tokio::spawn(run_refresh_loop(api, coin_id, epoch, interval, events, stop_recv));
    RefreshHandle {
        stop_sender: Some(stop_sender),
    }
}

#[instrument(skip(api, events, stop_recv))]
async fn run_refresh_loop(
    api: ApiHandle,
    coin_id: EntityId,
    epoch: u64,
    interval: Duration,
    events: UnboundedSender<AppEvent>,
    mut stop_recv: oneshot::Receiver<()>,
) {
    loop {
        debug!("Fetching price snapshot for {}", coin_id);

        let result = tokio::select! {
            _ = &mut stop_recv => {
                debug!("Stop signal received during fetch for {}", coin_id);
                return;
            }
            result = api.quote(&coin_id) => result,
        };

        if events.send(AppEvent::SnapshotFetched { epoch, result }).is_err() {
            warn!("Dashboard is gone, stopping refresh for {}", coin_id);
            return;
        }

        if timeout(interval, &mut stop_recv).await.is_ok() {
            info!("Stopped price refresh for {}", coin_id);
            return;
        }
    }
}

/// One-shot history fetch for the card at `epoch`.
pub fn spawn_history_fetch(api: ApiHandle, coin_id: EntityId, epoch: u64, events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        debug!("Fetching history for {}", coin_id);
        let result = api.history(&coin_id).await;
        if events.send(AppEvent::HistoryFetched { epoch, result }).is_err() {
            warn!("Dashboard is gone, dropping history for {}", coin_id);
        }
    });
}
