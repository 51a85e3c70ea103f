use crate::api::{ApiRequest, FetchError, FetchResult};
use reqwest::header;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use tracing::{debug, instrument, trace, warn};

/// Serves backend requests until every sender is dropped. Each request runs
/// on its own task so a slow quote never holds up a history fetch.
#[instrument(skip(job_receiver))]
pub async fn consume_api_requests(mut job_receiver: UnboundedReceiver<ApiRequest>, base_url: String) {
    let http_client = reqwest::Client::new();

    while let Some(req) = job_receiver.recv().await {
        let http_client = http_client.clone();
        let url = request_url(&base_url, &req);
        trace!("Dispatching request to {}", url);
        tokio::spawn(async move {
            match req {
                ApiRequest::CoinList { resp_sender } => {
                    reply(resp_sender, get_json(&http_client, &url).await, &url)
                }
                ApiRequest::Quote { resp_sender, .. } => {
                    reply(resp_sender, get_json(&http_client, &url).await, &url)
                }
                ApiRequest::History { resp_sender, .. } => {
                    reply(resp_sender, get_json(&http_client, &url).await, &url)
                }
            }
        });
    }

    debug!("All request senders dropped, consumer stopped");
}

pub fn request_url(base_url: &str, req: &ApiRequest) -> String {
    let base_url = base_url.trim_end_matches('/');
    match req.coin_id() {
        Some(id) => {
            let id = urlencoding::encode(id.as_str());
            format!("{}{}?id={}", base_url, req.endpoint(), id)
        }
        None => format!("{}{}", base_url, req.endpoint()),
    }
}

async fn get_json<T: DeserializeOwned>(http_client: &reqwest::Client, url: &str) -> FetchResult<T> {
    let response = http_client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()
        .map_err(status_error)?;

    let body = response.text().await?;
    let parsed = serde_json::from_str(&body)?;
    Ok(parsed)
}

fn status_error(err: reqwest::Error) -> FetchError {
    match err.status() {
        Some(status) => FetchError::Status(status),
        None => err.into(),
    }
}

fn reply<T>(resp_sender: oneshot::Sender<FetchResult<T>>, result: FetchResult<T>, url: &str) {
    if let Err(ref e) = result {
        debug!("Request to {} failed: {}", url, e);
    }
    if resp_sender.send(result).is_err() {
        warn!("Requester of {} went away before the reply", url);
    }
}
