//! Askama templates for the dashboard.

use askama::Template;
use chrono::{DateTime, Local};

use crate::board::BoardState;
use crate::domain::{Leg, Train};

use super::state::RouteLabel;

/// The departure board page.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub from: String,
    pub to: String,
    pub trains: Vec<TrainView>,
    pub last_updated: String,
    pub config_errors: Vec<String>,
}

impl BoardTemplate {
    pub fn new(state: &BoardState, route: &RouteLabel) -> Self {
        Self {
            from: route.from.clone(),
            to: route.to.clone(),
            trains: state.trains.iter().map(TrainView::from_train).collect(),
            last_updated: state.last_updated.map(local_time).unwrap_or_default(),
            config_errors: state.config_errors.clone(),
        }
    }
}

/// Train view model for templates.
#[derive(Debug, Clone)]
pub struct TrainView {
    pub destination: String,
    pub operator: String,
    pub departure_scheduled: String,
    pub departure_expected: String,
    pub departure_platform: String,
    pub arrival_scheduled: String,
    pub arrival_expected: String,
    pub arrival_platform: String,
    pub delay: String,
    pub is_bus: bool,
    pub is_cancelled: bool,
    pub is_late: bool,
}

impl TrainView {
    pub fn from_train(train: &Train) -> Self {
        Self {
            destination: train.destination.clone(),
            operator: train
                .operator
                .name
                .clone()
                .or_else(|| train.operator.code.clone())
                .unwrap_or_default(),
            departure_scheduled: train.departure.scheduled.to_string(),
            departure_expected: expected_label(&train.departure),
            departure_platform: platform_label(&train.departure),
            arrival_scheduled: train.arrival.scheduled.to_string(),
            arrival_expected: expected_label(&train.arrival),
            arrival_platform: platform_label(&train.arrival),
            delay: delay_label(train.departure.delay_minutes),
            is_bus: train.is_replacement_bus,
            is_cancelled: train.is_cancelled(),
            is_late: train.departure.is_late(),
        }
    }

    /// CSS class for the table row.
    pub fn row_class(&self) -> &'static str {
        if self.is_cancelled {
            "cancelled"
        } else if self.is_late {
            "late"
        } else {
            "on-time"
        }
    }
}

fn expected_label(leg: &Leg) -> String {
    match (leg.live, leg.delay_minutes) {
        (None, _) => String::new(),
        (Some(_), _) if !leg.live_reported => "No estimate".to_string(),
        (Some(_), Some(0)) => "On time".to_string(),
        (Some(live), _) => live.to_string(),
    }
}

fn platform_label(leg: &Leg) -> String {
    leg.platform.clone().unwrap_or_else(|| "-".to_string())
}

fn delay_label(delay: Option<i64>) -> String {
    match delay {
        Some(d) if d > 0 => format!("+{d} min"),
        Some(d) if d < 0 => format!("{d} min"),
        _ => String::new(),
    }
}

/// Format an instant as local "HH:MM".
fn local_time(at: DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::domain::{ClockTime, Operator};
    use chrono::TimeZone;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn train(status: &str, live: Option<&str>, bus: bool) -> Train {
        Train {
            id: "C10432".into(),
            status: status.into(),
            is_replacement_bus: bus,
            origin: "Leeds".into(),
            destination: "York".into(),
            operator: Operator {
                code: Some("NT".into()),
                name: None,
            },
            departure: Leg::with_live(t("10:00"), live.map(t), Some("8b".into())),
            arrival: Leg::scheduled_only(t("10:31"), None),
        }
    }

    fn route() -> RouteLabel {
        RouteLabel {
            from: "LDS".into(),
            to: "YRK".into(),
        }
    }

    #[test]
    fn view_of_late_train() {
        let view = TrainView::from_train(&train("late", Some("10:05"), false));
        assert_eq!(view.departure_scheduled, "10:00");
        assert_eq!(view.departure_expected, "10:05");
        assert_eq!(view.departure_platform, "8b");
        assert_eq!(view.arrival_expected, "");
        assert_eq!(view.arrival_platform, "-");
        assert_eq!(view.delay, "+5 min");
        assert_eq!(view.operator, "NT");
        assert_eq!(view.row_class(), "late");
    }

    #[test]
    fn view_of_on_time_and_cancelled() {
        let view = TrainView::from_train(&train("on time", Some("10:00"), false));
        assert_eq!(view.departure_expected, "On time");
        assert_eq!(view.delay, "");
        assert_eq!(view.row_class(), "on-time");

        // Schedule copied into the live slot is not an estimate
        let view = TrainView::from_train(&train("on time", None, false));
        assert_eq!(view.departure_expected, "No estimate");
        assert_eq!(view.delay, "");

        let view = TrainView::from_train(&train("cancelled", None, false));
        assert_eq!(view.row_class(), "cancelled");
    }

    #[test]
    fn early_running_delay_label() {
        assert_eq!(delay_label(Some(-2)), "-2 min");
        assert_eq!(delay_label(None), "");
    }

    #[test]
    fn render_board() {
        let mut state = BoardState::default();
        let at = Local.with_ymd_and_hms(2024, 3, 15, 9, 52, 0).unwrap();
        state.replace_trains(
            vec![train("late", Some("10:05"), false), train("bus", None, true)],
            at,
        );

        let html = BoardTemplate::new(&state, &route()).render().unwrap();
        assert!(html.contains("LDS"));
        assert!(html.contains("York"));
        assert!(html.contains("+5 min"));
        assert!(html.contains("Replacement bus"));
        assert!(html.contains("09:52"));
    }

    #[test]
    fn render_config_errors_instead_of_trains() {
        let state = BoardState::from_config_errors(&[ConfigError::InvalidFrom]);
        let html = BoardTemplate::new(&state, &route()).render().unwrap();
        assert!(html.contains("station code (must be 3 characters)."));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn render_empty_board() {
        let html = BoardTemplate::new(&BoardState::default(), &route())
            .render()
            .unwrap();
        assert!(html.contains("No trains"));
    }
}
