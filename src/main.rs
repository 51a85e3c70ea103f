use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, trace, Level};

mod api;
mod app;
mod command;
mod config;
mod detail;
mod format;
mod model;
mod render;
mod serde_util;
mod shell;

use crate::api::req_consumer::consume_api_requests;
use crate::api::ApiHandle;
use crate::app::{run, spawn_input_reader, spawn_signal_handler, Dashboard};
use crate::config::{read_config, CONFIG_PATH};

#[tokio::main]
async fn main() {
    let config = read_config(CONFIG_PATH).await;
    let max_level = config
        .as_ref()
        .ok()
        .and_then(|config| config.max_level().ok())
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(error) => {
            error!("Error reading config: {}", error);
            return;
        }
    };

    info!("Using backend at {}", config.backend_url);

    let (job_sender, job_receiver) = mpsc::unbounded_channel();
    let backend_url = config.backend_url.clone();
    trace!("Starting API request consumer...");
    tokio::spawn(async move {
        consume_api_requests(job_receiver, backend_url).await;
    });

    let (event_sender, event_receiver) = mpsc::unbounded_channel();
    spawn_input_reader(event_sender.clone());
    spawn_signal_handler(event_sender.clone());

    let dashboard = Dashboard::new(
        ApiHandle::new(job_sender),
        event_sender,
        Duration::from_secs(config.refresh_interval_secs),
        StdRng::from_entropy(),
    );

    run(dashboard, event_receiver, io::stdout()).await;

    info!("All tasks finished.");
}
