use crate::api::error::FetchError;
use crate::api::response::CoinQuote;
use crate::model::{Coin, HistoricalRecord};
use crate::serde_util::EntityId;
use std::result;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

pub type FetchResult<T> = result::Result<T, FetchError>;

/// A job for the request consumer. Each variant carries the channel its
/// reply goes back on.
#[derive(Debug)]
pub enum ApiRequest {
    CoinList {
        resp_sender: oneshot::Sender<FetchResult<Vec<Coin>>>,
    },
    Quote {
        id: EntityId,
        resp_sender: oneshot::Sender<FetchResult<CoinQuote>>,
    },
    History {
        id: EntityId,
        resp_sender: oneshot::Sender<FetchResult<Vec<HistoricalRecord>>>,
    },
}

impl ApiRequest {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApiRequest::CoinList { .. } => "/api/getCryptoData",
            ApiRequest::Quote { .. } => "/api/getDataById",
            ApiRequest::History { .. } => "/api/getCryptoHistory",
        }
    }

    pub fn coin_id(&self) -> Option<&EntityId> {
        match self {
            ApiRequest::CoinList { .. } => None,
            ApiRequest::Quote { id, .. } | ApiRequest::History { id, .. } => Some(id),
        }
    }
}

/// Cloneable front door to the request consumer task.
#[derive(Clone, Debug)]
pub struct ApiHandle {
    job_sender: UnboundedSender<ApiRequest>,
}

impl ApiHandle {
    pub fn new(job_sender: UnboundedSender<ApiRequest>) -> Self {
        Self { job_sender }
    }

    pub async fn coin_list(&self) -> FetchResult<Vec<Coin>> {
        self.request(|resp_sender| ApiRequest::CoinList { resp_sender })
            .await
    }

    pub async fn quote(&self, id: &EntityId) -> FetchResult<CoinQuote> {
        let id = id.clone();
        self.request(|resp_sender| ApiRequest::Quote { id, resp_sender })
            .await
    }

    pub async fn history(&self, id: &EntityId) -> FetchResult<Vec<HistoricalRecord>> {
        let id = id.clone();
        self.request(|resp_sender| ApiRequest::History { id, resp_sender })
            .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<FetchResult<T>>) -> ApiRequest,
    ) -> FetchResult<T> {
        let (resp_sender, resp_receiver) = oneshot::channel();
        if self.job_sender.send(build(resp_sender)).is_err() {
            return Err("request consumer is not running".into());
        }
        match resp_receiver.await {
            Ok(result) => result,
            Err(_) => Err("request consumer dropped the reply".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_request_fails_when_consumer_is_gone() {
        let (job_sender, job_receiver) = mpsc::unbounded_channel();
        drop(job_receiver);
        let api = ApiHandle::new(job_sender);
        let err = api.coin_list().await.unwrap_err();
        assert_eq!("Other Error: request consumer is not running", err.to_string());
    }

    #[tokio::test]
    async fn test_request_fails_when_reply_is_dropped() {
        let (job_sender, mut job_receiver) = mpsc::unbounded_channel();
        let api = ApiHandle::new(job_sender);
        tokio::spawn(async move {
            while let Some(req) = job_receiver.recv().await {
                assert_eq!("/api/getDataById", req.endpoint());
                assert_eq!(Some("btc"), req.coin_id().map(|id| id.as_str()));
                drop(req);
            }
        });
        let err = api.quote(&EntityId::from("btc")).await.unwrap_err();
        assert_eq!("Other Error: request consumer dropped the reply", err.to_string());
    }
}
