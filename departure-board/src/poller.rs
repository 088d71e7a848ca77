//! Poll scheduler.
//!
//! One cycle fetches departures, then (optionally) arrivals, normalizes them
//! and publishes the result. The next cycle is armed only after the current
//! one has rendered, so cycles never overlap however slow the upstream is.
//!
//! Failure policy:
//! - departures fetch fails: cycle aborted, previous trains kept
//! - arrivals fetch fails: degrade to departures-only data
//! - normalization fails: cycle output discarded, previous trains kept
//!
//! The renderer is invoked after every cycle either way; a failed cycle
//! leaves the state (including its `last_updated` stamp) untouched.

use std::time::Duration;

use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::board::{BoardState, Renderer};
use crate::config::WidgetConfig;
use crate::transport::{
    BoardSource, FetchError, NormalizeError, arrivals_of, bound, departures_of, normalize,
};

/// Why a cycle produced no update.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// Departures could not be fetched
    #[error("error retrieving departures: {0}")]
    Departures(#[source] FetchError),

    /// The payload could not be turned into trains
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Poll settings taken from the widget configuration.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_trains: i64,
    pub live_arrivals: bool,
    pub log_data: bool,
}

impl From<&WidgetConfig> for PollSettings {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            interval: config.update_interval(),
            max_trains: config.max_trains,
            live_arrivals: config.get_live_arrivals,
            log_data: config.log_data,
        }
    }
}

/// Drives poll cycles and owns the board state.
pub struct Poller<S, R> {
    source: S,
    renderer: R,
    settings: PollSettings,
    state: BoardState,
}

impl<S: BoardSource, R: Renderer> Poller<S, R> {
    pub fn new(source: S, renderer: R, settings: PollSettings) -> Self {
        Self {
            source,
            renderer,
            settings,
            state: BoardState::default(),
        }
    }

    /// The current board state.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Fetch and normalize once, replacing the trains on success.
    ///
    /// Returns the number of trains now on the board. Does not render.
    pub async fn poll_once(&mut self) -> Result<usize, CycleError> {
        let departures = self
            .source
            .departures()
            .await
            .map_err(CycleError::Departures)?;

        let arrivals = if self.settings.live_arrivals {
            match self.source.arrivals().await {
                Ok(board) => Some(board),
                Err(e) => {
                    warn!(error = %e, "Error retrieving arrivals; using departures only");
                    None
                }
            }
        } else {
            None
        };

        let arrival_list = match &arrivals {
            Some(board) => {
                let list = arrivals_of(board);
                if list.is_none() {
                    warn!("Arrivals response has no arrivals.all list; using departures only");
                }
                list
            }
            None => None,
        };

        let trains = normalize(departures_of(&departures)?, arrival_list)?;
        let trains = bound(trains, self.settings.max_trains);
        let count = trains.len();

        self.state.replace_trains(trains, Local::now());

        if self.settings.log_data {
            info!(trains = ?self.state.trains, "Trains updated");
        } else {
            debug!(count, "Trains updated");
        }

        Ok(count)
    }

    /// Run one full cycle: poll, log any failure, render.
    pub async fn cycle(&mut self) -> Result<usize, CycleError> {
        let result = self.poll_once().await;
        if let Err(e) = &result {
            error!(error = %e, "Error updating trains");
        }
        self.renderer.render(&self.state).await;
        result
    }

    /// Poll forever. Each sleep starts after the previous render.
    pub async fn run(mut self) {
        if self.settings.log_data {
            info!("Logging enabled - received train data will be logged.");
        }
        info!(interval_secs = self.settings.interval.as_secs(), "Starting poll loop");

        loop {
            let _ = self.cycle().await;
            tokio::time::sleep(self.settings.interval).await;
        }
    }
}
