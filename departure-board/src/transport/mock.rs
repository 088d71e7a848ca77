//! Mock board source for running without API credentials.
//!
//! Loads sample boards from JSON files and serves them as if they were
//! live API responses.

use std::path::Path;

use super::BoardSource;
use super::error::FetchError;
use super::types::{ArrivalBoard, DepartureBoard};

/// File name of the departure board inside the mock data directory.
const DEPARTURES_FILE: &str = "departures.json";

/// File name of the (optional) arrival board inside the mock data directory.
const ARRIVALS_FILE: &str = "arrivals.json";

#[derive(Debug, Clone)]
struct MockBoards {
    departures: DepartureBoard,
    arrivals: Option<ArrivalBoard>,
}

/// Board source that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockBoardSource {
    boards: MockBoards,
}

impl MockBoardSource {
    /// Load `departures.json` (required) and `arrivals.json` (optional)
    /// from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let boards = load_boards(data_dir.as_ref())?;
        Ok(Self { boards })
    }
}

impl BoardSource for MockBoardSource {
    async fn departures(&self) -> Result<DepartureBoard, FetchError> {
        Ok(self.boards.departures.clone())
    }

    async fn arrivals(&self) -> Result<ArrivalBoard, FetchError> {
        self.boards
            .arrivals
            .clone()
            .ok_or_else(|| FetchError::Api {
                status: 404,
                message: format!("no {ARRIVALS_FILE} in mock data"),
            })
    }
}

fn load_boards(data_dir: &Path) -> Result<MockBoards, FetchError> {
    let departures = read_json(&data_dir.join(DEPARTURES_FILE))?;

    let arrivals_path = data_dir.join(ARRIVALS_FILE);
    let arrivals = if arrivals_path.is_file() {
        Some(read_json(&arrivals_path)?)
    } else {
        None
    };

    Ok(MockBoards {
        departures,
        arrivals,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, FetchError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| FetchError::Mock(format!("failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&json)
        .map_err(|e| FetchError::Mock(format!("failed to parse {}: {}", path.display(), e)))
}
