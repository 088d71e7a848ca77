//! TransportAPI live board access.
//!
//! This module provides an HTTP client for the TransportAPI UK train
//! station boards and the conversion of its responses into [`Train`]
//! records.
//!
//! Key characteristics of the upstream data:
//! - Times are bare "HH:MM" strings (UK local time, no date)
//! - Fields are omitted or null freely, so every DTO field is optional
//! - Departures requested with `station_detail=calling_at` carry the
//!   destination calling point, which stands in for the arrival when no
//!   arrival board is fetched
//!
//! [`Train`]: crate::domain::Train

use std::future::Future;

mod client;
mod error;
mod mock;
mod normalize;
mod types;

pub use client::{ApiConfig, DEFAULT_BASE_URL, TransportClient};
pub use error::FetchError;
pub use mock::MockBoardSource;
pub use normalize::{
    NormalizeError, arrivals_of, bound, departures_of, normalize, normalize_departure,
};
pub use types::{
    ArrivalBoard, CallingPoint, DepartureBoard, RawArrival, RawDeparture, ServiceList,
    StationDetail,
};

/// Source of departure and arrival boards for the configured station pair.
pub trait BoardSource {
    /// Departure board at the origin, filtered to the destination.
    fn departures(&self) -> impl Future<Output = Result<DepartureBoard, FetchError>> + Send;

    /// Arrival board at the destination, filtered to the origin.
    fn arrivals(&self) -> impl Future<Output = Result<ArrivalBoard, FetchError>> + Send;
}
