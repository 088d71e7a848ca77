//! Board state and the rendering seam.

use std::future::Future;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::config::ConfigError;
use crate::domain::Train;

/// Everything a renderer needs to draw the board.
///
/// Owned by the poller and replaced wholesale on each successful cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoardState {
    /// Bounded, ordered trains from the last successful cycle.
    pub trains: Vec<Train>,

    /// When the last successful cycle finished.
    pub last_updated: Option<DateTime<Local>>,

    /// Configuration problems; non-empty means polling never started.
    pub config_errors: Vec<String>,
}

impl BoardState {
    /// A board that only reports configuration errors.
    pub fn from_config_errors(errors: &[ConfigError]) -> Self {
        Self {
            config_errors: errors.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    /// Replace the train list and stamp the update time.
    pub fn replace_trains(&mut self, trains: Vec<Train>, at: DateTime<Local>) {
        self.trains = trains;
        self.last_updated = Some(at);
    }
}

/// Receives the board after every poll cycle.
pub trait Renderer {
    fn render(&self, state: &BoardState) -> impl Future<Output = ()> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_become_messages() {
        let state =
            BoardState::from_config_errors(&[ConfigError::MissingCredentials, ConfigError::InvalidTo]);
        assert_eq!(
            state.config_errors,
            vec![
                "API information ('app_id' and/or 'app_key') missing.".to_string(),
                "Invalid 'TO' station code (must be 3 characters).".to_string(),
            ]
        );
        assert!(state.trains.is_empty());
        assert!(state.last_updated.is_none());
    }

    #[test]
    fn replace_stamps_time() {
        let mut state = BoardState::default();
        let now = Local::now();
        state.replace_trains(Vec::new(), now);
        assert_eq!(state.last_updated, Some(now));
    }
}
