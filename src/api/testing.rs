//! In-memory stand-in for the backend used by the dashboard tests.

use crate::api::response::CoinQuote;
use crate::api::{ApiHandle, ApiRequest, FetchError};
use crate::model::{Coin, HistoricalRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Default)]
pub struct RequestCounts {
    pub coin_list: AtomicUsize,
    pub quote: AtomicUsize,
    pub history: AtomicUsize,
}

impl RequestCounts {
    pub fn coin_list(&self) -> usize {
        self.coin_list.load(Ordering::SeqCst)
    }

    pub fn quote(&self) -> usize {
        self.quote.load(Ordering::SeqCst)
    }

    pub fn history(&self) -> usize {
        self.history.load(Ordering::SeqCst)
    }
}

/// `None` for a fixture makes the matching endpoint fail.
#[derive(Clone, Debug, Default)]
pub struct FakeBackend {
    pub coins: Option<Vec<Coin>>,
    pub quote: Arc<Mutex<Option<CoinQuote>>>,
    pub history: Option<Vec<HistoricalRecord>>,
}

impl FakeBackend {
    pub fn set_quote(&self, quote: Option<CoinQuote>) {
        *self.quote.lock().unwrap() = quote;
    }

    pub fn spawn(self) -> (ApiHandle, Arc<RequestCounts>) {
        let (job_sender, mut job_receiver) = mpsc::unbounded_channel();
        let counts = Arc::new(RequestCounts::default());
        let task_counts = Arc::clone(&counts);

        tokio::spawn(async move {
            while let Some(req) = job_receiver.recv().await {
                match req {
                    ApiRequest::CoinList { resp_sender } => {
                        task_counts.coin_list.fetch_add(1, Ordering::SeqCst);
                        let _ = resp_sender.send(self.coins.clone().ok_or_else(unavailable));
                    }
                    ApiRequest::Quote { resp_sender, .. } => {
                        task_counts.quote.fetch_add(1, Ordering::SeqCst);
                        let quote = self.quote.lock().unwrap().clone();
                        let _ = resp_sender.send(quote.ok_or_else(unavailable));
                    }
                    ApiRequest::History { resp_sender, .. } => {
                        task_counts.history.fetch_add(1, Ordering::SeqCst);
                        let _ = resp_sender.send(self.history.clone().ok_or_else(unavailable));
                    }
                }
            }
        });

        (ApiHandle::new(job_sender), counts)
    }
}

fn unavailable() -> FetchError {
    FetchError::Other("backend unavailable".to_string())
}
