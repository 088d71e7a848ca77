//! The normalized train record handed to renderers.

use serde::Serialize;

use super::ClockTime;

/// Operating company as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operator {
    /// ATOC code, e.g. "NT".
    pub code: Option<String>,
    /// Display name, e.g. "Northern".
    pub name: Option<String>,
}

/// One end of a journey: departure from the origin station or arrival at
/// the destination station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leg {
    /// Timetabled time.
    pub scheduled: ClockTime,

    /// Live estimate. Always set for departures (falls back to the scheduled
    /// time). `None` for arrivals without an arrival record.
    pub live: Option<ClockTime>,

    /// `live - scheduled` in whole minutes; `None` exactly when `live` is.
    pub delay_minutes: Option<i64>,

    /// Platform, if announced.
    pub platform: Option<String>,

    /// Whether upstream actually supplied the live time, as opposed to it
    /// being copied from the schedule.
    pub live_reported: bool,
}

impl Leg {
    /// A leg with a live time, defaulting to the schedule when upstream
    /// supplied none.
    pub fn with_live(
        scheduled: ClockTime,
        live: Option<ClockTime>,
        platform: Option<String>,
    ) -> Self {
        let live_reported = live.is_some();
        let live = live.unwrap_or(scheduled);
        Self {
            scheduled,
            live: Some(live),
            delay_minutes: Some(live.minutes_since(scheduled)),
            platform,
            live_reported,
        }
    }

    /// A leg known only from the timetable.
    pub fn scheduled_only(scheduled: ClockTime, platform: Option<String>) -> Self {
        Self {
            scheduled,
            live: None,
            delay_minutes: None,
            platform,
            live_reported: false,
        }
    }

    /// Whether the live estimate is later than the schedule.
    pub fn is_late(&self) -> bool {
        self.delay_minutes.is_some_and(|d| d > 0)
    }
}

/// A departure, optionally enriched with its arrival, ready for display.
///
/// Built fresh each poll cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Train {
    /// Upstream train identifier (`train_uid`).
    pub id: String,

    /// Upstream status, lowercased verbatim ("on time", "late", ...).
    pub status: String,

    /// Rail-replacement bus rather than a train.
    pub is_replacement_bus: bool,

    pub origin: String,
    pub destination: String,
    pub operator: Operator,

    /// Departure from the board's origin station.
    pub departure: Leg,

    /// Arrival at the filtered destination station.
    pub arrival: Leg,
}

impl Train {
    /// Whether the upstream status marks this service as cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status == "cancelled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    #[test]
    fn live_leg_computes_delay() {
        let leg = Leg::with_live(t("10:00"), Some(t("10:05")), Some("3".into()));
        assert_eq!(leg.live, Some(t("10:05")));
        assert_eq!(leg.delay_minutes, Some(5));
        assert!(leg.live_reported);
        assert!(leg.is_late());
    }

    #[test]
    fn missing_live_defaults_to_schedule() {
        let leg = Leg::with_live(t("10:00"), None, None);
        assert_eq!(leg.live, Some(t("10:00")));
        assert_eq!(leg.delay_minutes, Some(0));
        assert!(!leg.live_reported);
        assert!(!leg.is_late());
    }

    #[test]
    fn early_running_is_negative() {
        let leg = Leg::with_live(t("10:00"), Some(t("09:58")), None);
        assert_eq!(leg.delay_minutes, Some(-2));
        assert!(!leg.is_late());
    }

    #[test]
    fn scheduled_only_leg_has_no_live_data() {
        let leg = Leg::scheduled_only(t("10:30"), Some("5".into()));
        assert_eq!(leg.live, None);
        assert_eq!(leg.delay_minutes, None);
        assert_eq!(leg.platform.as_deref(), Some("5"));
    }
}
