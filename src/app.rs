//! Dashboard runtime: the single owner of shell and detail-card state. Every
//! fetch result and every line the user types arrives here as an `AppEvent`.

use crate::api::response::CoinQuote;
use crate::api::{ApiHandle, FetchResult};
use crate::command::{Command, CommandError, HELP};
use crate::detail::{spawn_history_fetch, spawn_refresh, DetailCard, RefreshHandle};
use crate::model::{Coin, HistoricalRecord};
use crate::render;
use crate::shell::{Shell, View};
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, instrument, trace, warn};

const TITLE: &str = "Crypto Dashboard";
const RULE: &str = "────────────────────────────────────────────────────────────";

#[derive(Debug)]
pub enum AppEvent {
    Input(String),
    InputClosed,
    Interrupted,
    CoinsLoaded {
        generation: u64,
        result: FetchResult<Vec<Coin>>,
    },
    SnapshotFetched {
        epoch: u64,
        result: FetchResult<CoinQuote>,
    },
    HistoryFetched {
        epoch: u64,
        result: FetchResult<Vec<HistoricalRecord>>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Dashboard<R> {
    shell: Shell,
    detail: Option<DetailCard>,
    refresh: Option<RefreshHandle>,
    api: ApiHandle,
    events: UnboundedSender<AppEvent>,
    refresh_interval: Duration,
    // bumped on reload, tags the coin list fetch
    generation: u64,
    // bumped whenever the detail card is replaced or dropped
    card_epoch: u64,
    notice: Option<String>,
    rng: R,
}

impl<R: Rng> Dashboard<R> {
    pub fn new(api: ApiHandle, events: UnboundedSender<AppEvent>, refresh_interval: Duration, rng: R) -> Self {
        Self {
            shell: Shell::new(),
            detail: None,
            refresh: None,
            api,
            events,
            refresh_interval,
            generation: 0,
            card_epoch: 0,
            notice: None,
            rng,
        }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn detail(&self) -> Option<&DetailCard> {
        self.detail.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Issues the one coin list fetch of this load.
    pub fn start(&mut self) {
        let api = self.api.clone();
        let events = self.events.clone();
        let generation = self.generation;
        debug!("Loading coin list, generation {}", generation);
        tokio::spawn(async move {
            let result = api.coin_list().await;
            if events.send(AppEvent::CoinsLoaded { generation, result }).is_err() {
                warn!("Dashboard is gone, dropping coin list");
            }
        });
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Input(line) => {
                self.notice = None;
                match line.parse::<Command>() {
                    Ok(command) => return self.handle_command(command),
                    Err(CommandError::Empty) => {}
                    Err(e) => self.notice = Some(e.to_string()),
                }
            }
            AppEvent::InputClosed => {
                info!("Input closed, stopping...");
                return Flow::Quit;
            }
            AppEvent::Interrupted => {
                info!("Ctrl+C pressed. Stopping...");
                return Flow::Quit;
            }
            AppEvent::CoinsLoaded { generation, result } => {
                if generation != self.generation {
                    debug!("Discarding coin list of generation {}", generation);
                    return Flow::Continue;
                }
                match result {
                    Ok(coins) => self.shell.load_coins(coins, &mut self.rng),
                    Err(e) => error!("Error loading coin list: {}", e),
                }
            }
            AppEvent::SnapshotFetched { epoch, result } => match self.detail.as_mut() {
                Some(card) => {
                    card.apply_snapshot(epoch, result);
                }
                None => trace!("No coin selected, dropping snapshot of epoch {}", epoch),
            },
            AppEvent::HistoryFetched { epoch, result } => match self.detail.as_mut() {
                Some(card) => {
                    card.apply_history(epoch, result);
                }
                None => trace!("No coin selected, dropping history of epoch {}", epoch),
            },
        }
        Flow::Continue
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        trace!("Handling {:?}", command);
        match command {
            Command::Search(term) => self.shell.set_search_term(&term),
            Command::ClearSearch => self.shell.clear_search(),
            Command::Pick(position) => self.pick(position),
            Command::Range(range) => match self.detail.as_mut() {
                Some(card) => card.select_range(range),
                None => self.notice = Some("Open a coin first to pick a chart range".to_string()),
            },
            Command::ToggleTable => match self.detail.as_mut() {
                Some(card) => {
                    if card.toggle_table() {
                        spawn_history_fetch(
                            self.api.clone(),
                            card.coin().id.clone(),
                            card.epoch(),
                            self.events.clone(),
                        );
                    }
                }
                None => self.notice = Some("Open a coin first to see its history".to_string()),
            },
            Command::Back => self.back_to_browse(),
            Command::Reload => {
                self.reset();
                self.start();
            }
            Command::Help => self.notice = Some(HELP.to_string()),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn pick(&mut self, position: usize) {
        let showing_cards = matches!(self.shell.view(), View::Browse);
        if self.shell.suggestions().is_empty() && !showing_cards {
            self.notice = Some("Search for a coin first, or go 'back' to the cards".to_string());
            return;
        }
        match self.shell.pick(position).cloned() {
            Some(coin) => self.select_coin(coin),
            None => self.notice = Some(format!("There is no entry {}", position)),
        }
    }

    /// Reselecting the coin already on screen keeps its card and refresh
    /// loop; any other coin starts over with a fresh card.
    pub fn select_coin(&mut self, coin: Coin) {
        if self.detail.as_ref().map(|card| &card.coin().id) == Some(&coin.id) {
            self.shell.select(coin);
            return;
        }

        self.stop_refresh();
        self.card_epoch += 1;
        let coin_id = coin.id.clone();
        self.shell.select(coin.clone());
        self.detail = Some(DetailCard::new(coin, self.card_epoch));
        self.refresh = Some(spawn_refresh(
            self.api.clone(),
            coin_id,
            self.card_epoch,
            self.refresh_interval,
            self.events.clone(),
        ));
    }

    fn back_to_browse(&mut self) {
        self.stop_refresh();
        self.card_epoch += 1;
        self.detail = None;
        self.shell.deselect();
    }

    fn reset(&mut self) {
        info!("Reloading dashboard");
        self.back_to_browse();
        self.shell.reset();
        self.generation += 1;
        self.notice = None;
    }

    pub fn shutdown(&mut self) {
        self.stop_refresh();
    }

    fn stop_refresh(&mut self) {
        if let Some(handle) = self.refresh.take() {
            handle.stop();
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n{}\n", TITLE, render::search_box(&self.shell));
        match (self.shell.view(), &self.detail) {
            (View::Detail(_), Some(card)) => out.push_str(&render::detail_view(card)),
            _ => out.push_str(&render::browse_view(&self.shell)),
        }
        if let Some(notice) = &self.notice {
            out.push('\n');
            out.push_str(notice);
            out.push('\n');
        }
        out
    }
}

/// Draws after every event until the user quits or input ends.
#[instrument(skip_all)]
pub async fn run<R: Rng, W: Write>(
    mut dashboard: Dashboard<R>,
    mut receiver: UnboundedReceiver<AppEvent>,
    mut out: W,
) {
    dashboard.start();
    draw(&dashboard, &mut out);

    while let Some(event) = receiver.recv().await {
        if dashboard.handle_event(event) == Flow::Quit {
            break;
        }
        draw(&dashboard, &mut out);
    }

    dashboard.shutdown();
    info!("Dashboard stopped");
}

fn draw<R: Rng, W: Write>(dashboard: &Dashboard<R>, out: &mut W) {
    if let Err(e) = write!(out, "{}\n{}> ", RULE, dashboard.render()).and_then(|_| out.flush()) {
        warn!("Error drawing dashboard: {}", e);
    }
}

/// Reads stdin on a plain thread so a blocked read never holds up runtime
/// shutdown.
pub fn spawn_input_reader(events: UnboundedSender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(AppEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!("Error reading input: {}", e);
                    break;
                }
            }
        }
        let _ = events.send(AppEvent::InputClosed);
    });
}

pub fn spawn_signal_handler(events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        trace!("Waiting for Ctrl+C signal...");
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        let _ = events.send(AppEvent::Interrupted);
    });
}
