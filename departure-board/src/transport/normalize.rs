//! Conversion from board DTOs to [`Train`] records.
//!
//! This is the validating parse step: required fields are checked up front
//! and failures are reported as [`NormalizeError`] instead of surfacing as
//! missing data halfway through rendering.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::{ClockTime, Leg, Operator, TimeError, Train};

use super::types::{ArrivalBoard, DepartureBoard, RawArrival, RawDeparture};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NormalizeError {
    /// Upstream payload is missing data the record cannot be built without
    #[error("malformed upstream data: {0}")]
    DataShape(String),

    /// A time-of-day string could not be parsed
    #[error("cannot parse {field} {value:?} for train {train}: {source}")]
    Parse {
        train: String,
        field: &'static str,
        value: String,
        #[source]
        source: TimeError,
    },
}

impl NormalizeError {
    fn missing(train: &str, field: &str) -> Self {
        NormalizeError::DataShape(format!("train {train} has no {field}"))
    }
}

/// Extract the departure list from a departures response.
pub fn departures_of(board: &DepartureBoard) -> Result<&[RawDeparture], NormalizeError> {
    board
        .departures
        .as_ref()
        .and_then(|list| list.all.as_deref())
        .ok_or_else(|| NormalizeError::DataShape("response has no departures.all list".into()))
}

/// Extract the arrival list from an arrivals response, if it has one.
pub fn arrivals_of(board: &ArrivalBoard) -> Option<&[RawArrival]> {
    board.arrivals.as_ref().and_then(|list| list.all.as_deref())
}

/// Normalize departures, pairing each with its arrival record if any.
///
/// Arrivals are matched on `train_uid`; when several arrivals share an
/// identifier the first in list order wins. Output order follows the
/// departure list. The first malformed departure fails the whole batch.
pub fn normalize(
    departures: &[RawDeparture],
    arrivals: Option<&[RawArrival]>,
) -> Result<Vec<Train>, NormalizeError> {
    let mut by_id: HashMap<&str, &RawArrival> = HashMap::new();
    for arrival in arrivals.unwrap_or(&[]) {
        if let Some(id) = arrival.train_uid.as_deref() {
            by_id.entry(id).or_insert(arrival);
        }
    }

    departures
        .iter()
        .map(|dep| {
            let arrival = dep
                .train_uid
                .as_deref()
                .and_then(|id| by_id.get(id).copied());
            normalize_departure(dep, arrival)
        })
        .collect()
}

/// Build a single [`Train`] from a departure and its optional arrival.
pub fn normalize_departure(
    dep: &RawDeparture,
    arrival: Option<&RawArrival>,
) -> Result<Train, NormalizeError> {
    let id = dep
        .train_uid
        .as_deref()
        .ok_or_else(|| NormalizeError::DataShape("departure has no train_uid".into()))?;

    let status = dep
        .status
        .as_deref()
        .ok_or_else(|| NormalizeError::missing(id, "status"))?
        .to_lowercase();

    let origin = dep
        .origin_name
        .clone()
        .ok_or_else(|| NormalizeError::missing(id, "origin_name"))?;
    let destination = dep
        .destination_name
        .clone()
        .ok_or_else(|| NormalizeError::missing(id, "destination_name"))?;

    let scheduled_departure = required_time(
        id,
        "aimed_departure_time",
        dep.aimed_departure_time.as_deref(),
    )?;
    let live_departure = optional_time(
        id,
        "expected_departure_time",
        dep.expected_departure_time.as_deref(),
    )?;
    let departure = Leg::with_live(scheduled_departure, live_departure, dep.platform.clone());

    let matched = match arrival {
        Some(arr) => arrival_leg(id, dep, arr)?,
        None => None,
    };
    let arrival = match matched {
        Some(leg) => leg,
        None => {
            // No usable arrival record: fall back to the first calling point
            let calling_point = dep
                .first_calling_point()
                .ok_or_else(|| NormalizeError::missing(id, "arrival record or calling point"))?;
            let scheduled = required_time(
                id,
                "calling_at[0].aimed_arrival_time",
                calling_point.aimed_arrival_time.as_deref(),
            )?;
            Leg::scheduled_only(scheduled, calling_point.platform.clone())
        }
    };

    Ok(Train {
        id: id.to_string(),
        status,
        is_replacement_bus: dep.mode.as_deref() == Some("bus"),
        origin,
        destination,
        operator: Operator {
            code: dep.operator.clone(),
            name: dep.operator_name.clone(),
        },
        departure,
        arrival,
    })
}

/// Arrival leg from a matched arrival record.
///
/// A record without its own aimed time borrows the calling point's. With
/// neither, the record is ignored and `None` is returned.
fn arrival_leg(
    id: &str,
    dep: &RawDeparture,
    arr: &RawArrival,
) -> Result<Option<Leg>, NormalizeError> {
    let scheduled = match arr.aimed_arrival_time.as_deref() {
        Some(aimed) => parse_time(id, "aimed_arrival_time", aimed)?,
        None => {
            let fallback = dep
                .first_calling_point()
                .and_then(|cp| cp.aimed_arrival_time.as_deref());
            match fallback {
                Some(aimed) => parse_time(id, "calling_at[0].aimed_arrival_time", aimed)?,
                None => {
                    warn!(train = id, "Arrival record has no aimed time; ignoring it");
                    return Ok(None);
                }
            }
        }
    };
    let live = optional_time(id, "expected_arrival_time", arr.expected_arrival_time.as_deref())?;
    Ok(Some(Leg::with_live(scheduled, live, arr.platform.clone())))
}

/// Keep at most `max` trains, preserving order.
///
/// A non-positive `max` yields an empty list.
pub fn bound(mut trains: Vec<Train>, max: i64) -> Vec<Train> {
    let max = usize::try_from(max).unwrap_or(0);
    trains.truncate(max);
    trains
}

fn required_time(
    train: &str,
    field: &'static str,
    value: Option<&str>,
) -> Result<ClockTime, NormalizeError> {
    let value = value.ok_or_else(|| NormalizeError::missing(train, field))?;
    parse_time(train, field, value)
}

fn optional_time(
    train: &str,
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<ClockTime>, NormalizeError> {
    value.map(|v| parse_time(train, field, v)).transpose()
}

fn parse_time(train: &str, field: &'static str, value: &str) -> Result<ClockTime, NormalizeError> {
    ClockTime::parse_hhmm(value).map_err(|source| NormalizeError::Parse {
        train: train.to_string(),
        field,
        value: value.to_string(),
        source,
    })
}
