//! TransportAPI live board response DTOs.
//!
//! These types map directly to the `/uk/train/station/{code}/live.json`
//! responses. Every field is optional because the API omits or nulls
//! fields freely; presence is checked later by the normalizer.

use serde::Deserialize;

/// Response from the live departures endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartureBoard {
    /// Date the board was generated for ("YYYY-MM-DD").
    pub date: Option<String>,

    /// Time of day the board was generated ("HH:MM").
    pub time_of_day: Option<String>,

    /// Human-readable name of the station.
    pub station_name: Option<String>,

    /// CRS code of the station.
    pub station_code: Option<String>,

    /// Departing services.
    pub departures: Option<ServiceList<RawDeparture>>,
}

/// Response from the live arrivals endpoint (`type=arrival`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArrivalBoard {
    pub date: Option<String>,
    pub time_of_day: Option<String>,
    pub station_name: Option<String>,
    pub station_code: Option<String>,

    /// Arriving services.
    pub arrivals: Option<ServiceList<RawArrival>>,
}

/// Wrapper around the service array; the API nests it under `all`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceList<T> {
    pub all: Option<Vec<T>>,
}

/// A service on the departure board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDeparture {
    /// Train identifier, unique per scheduled service within the window.
    pub train_uid: Option<String>,

    /// Free-text status, e.g. "ON TIME", "LATE", "CANCELLED".
    pub status: Option<String>,

    /// "train" or "bus" (rail replacement).
    pub mode: Option<String>,

    pub origin_name: Option<String>,
    pub destination_name: Option<String>,

    /// ATOC operator code.
    pub operator: Option<String>,
    pub operator_name: Option<String>,

    /// Scheduled departure time ("HH:MM").
    pub aimed_departure_time: Option<String>,

    /// Live departure estimate ("HH:MM").
    pub expected_departure_time: Option<String>,

    pub platform: Option<String>,

    /// Present when requested with `station_detail=calling_at`.
    pub station_detail: Option<StationDetail>,
}

impl RawDeparture {
    /// The first calling point detail, used as the arrival fallback.
    pub fn first_calling_point(&self) -> Option<&CallingPoint> {
        self.station_detail
            .as_ref()
            .and_then(|detail| detail.calling_at.as_deref())
            .and_then(|points| points.first())
    }
}

/// Calling-point detail attached to a departure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationDetail {
    pub calling_at: Option<Vec<CallingPoint>>,
}

/// A calling point of a departing service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallingPoint {
    pub station_code: Option<String>,
    pub station_name: Option<String>,
    pub platform: Option<String>,
    pub aimed_arrival_time: Option<String>,
    pub aimed_departure_time: Option<String>,
}

/// A service on the arrival board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArrival {
    pub train_uid: Option<String>,
    pub status: Option<String>,
    pub platform: Option<String>,

    /// Scheduled arrival time ("HH:MM").
    pub aimed_arrival_time: Option<String>,

    /// Live arrival estimate ("HH:MM").
    pub expected_arrival_time: Option<String>,
}
