//! Widget configuration and its validation.
//!
//! Keys follow the option names of the dashboard widget (`maxTrains`,
//! `getLiveArrivals`, `app_id`, ...). Everything except the credentials and
//! station codes has a default.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::Crs;
use crate::transport::{ApiConfig, DEFAULT_BASE_URL};

/// Environment variable consulted when `app_id` is absent from the file.
pub const APP_ID_ENV: &str = "TRANSPORTAPI_APP_ID";

/// Environment variable consulted when `app_key` is absent from the file.
pub const APP_KEY_ENV: &str = "TRANSPORTAPI_APP_KEY";

/// Shortest poll interval honoured, in seconds.
pub const MIN_UPDATE_INTERVAL_SECS: u64 = 10;

/// A problem with caller-supplied configuration, reported before any
/// network activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("API information ('app_id' and/or 'app_key') missing.")]
    MissingCredentials,

    #[error("Invalid 'FROM' station code (must be 3 characters).")]
    InvalidFrom,

    #[error("Invalid 'TO' station code (must be 3 characters).")]
    InvalidTo,
}

/// Failure to read the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Widget configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Seconds between the end of one poll cycle and the start of the next.
    #[serde(rename = "updateInterval", default = "WidgetConfig::default_update_interval_secs")]
    pub update_interval_secs: u64,

    /// Log every successful cycle's trains.
    #[serde(default)]
    pub log_data: bool,

    /// Maximum number of trains to display.
    #[serde(default = "WidgetConfig::default_max_trains")]
    pub max_trains: i64,

    /// Also fetch the arrival board to get live arrival times.
    #[serde(default)]
    pub get_live_arrivals: bool,

    #[serde(default = "WidgetConfig::default_api_base_url")]
    pub api_base_url: String,

    #[serde(rename = "app_id", default)]
    pub app_id: Option<String>,

    #[serde(rename = "app_key", default)]
    pub app_key: Option<String>,

    /// Origin station code (CRS, any case).
    #[serde(default)]
    pub from: Option<String>,

    /// Destination station code (CRS, any case).
    #[serde(default)]
    pub to: Option<String>,

    /// Offset window, ISO-8601 duration such as "PT01:00:00".
    #[serde(default)]
    pub time_frame: Option<String>,

    /// ATOC operator code filter.
    #[serde(default)]
    pub operator: Option<String>,

    /// Upstream request timeout in seconds.
    #[serde(default = "WidgetConfig::default_timeout_secs")]
    pub timeout_secs: u64,

    /// Address the dashboard listens on.
    #[serde(default = "WidgetConfig::default_listen_addr")]
    pub listen_addr: SocketAddr,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: Self::default_update_interval_secs(),
            log_data: false,
            max_trains: Self::default_max_trains(),
            get_live_arrivals: false,
            api_base_url: Self::default_api_base_url(),
            app_id: None,
            app_key: None,
            from: None,
            to: None,
            time_frame: None,
            operator: None,
            timeout_secs: Self::default_timeout_secs(),
            listen_addr: Self::default_listen_addr(),
        }
    }
}

impl WidgetConfig {
    fn default_update_interval_secs() -> u64 {
        5 * 60
    }
    fn default_max_trains() -> i64 {
        5
    }
    fn default_api_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }
    fn default_timeout_secs() -> u64 {
        30
    }
    fn default_listen_addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 3000))
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fill absent credentials from `lookup` (normally the environment).
    pub fn with_credentials_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if is_blank(self.app_id.as_deref()) {
            self.app_id = lookup(APP_ID_ENV);
        }
        if is_blank(self.app_key.as_deref()) {
            self.app_key = lookup(APP_KEY_ENV);
        }
        self
    }

    /// Poll interval as a Duration, never shorter than
    /// [`MIN_UPDATE_INTERVAL_SECS`].
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs.max(MIN_UPDATE_INTERVAL_SECS))
    }

    /// Check credentials and station codes.
    ///
    /// All failures are collected in order (credentials, from, to); on
    /// success the upstream client configuration is returned.
    pub fn validate(&self) -> Result<ApiConfig, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let credentials = match (self.app_id.as_deref(), self.app_key.as_deref()) {
            (Some(id), Some(key)) if !is_blank(Some(id)) && !is_blank(Some(key)) => {
                Some((id.trim(), key.trim()))
            }
            _ => {
                errors.push(ConfigError::MissingCredentials);
                None
            }
        };

        let from = parse_station(self.from.as_deref());
        if from.is_none() {
            errors.push(ConfigError::InvalidFrom);
        }

        let to = parse_station(self.to.as_deref());
        if to.is_none() {
            errors.push(ConfigError::InvalidTo);
        }

        match (credentials, from, to) {
            (Some((id, key)), Some(from), Some(to)) => {
                Ok(ApiConfig::new(id, key, from, to)
                    .with_base_url(self.api_base_url.clone())
                    .with_time_frame(non_blank(self.time_frame.as_deref()))
                    .with_operator(non_blank(self.operator.as_deref()))
                    .with_timeout(self.timeout_secs))
            }
            _ => Err(errors),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_station(code: Option<&str>) -> Option<Crs> {
    code.and_then(|c| Crs::parse_normalized(c).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> WidgetConfig {
        WidgetConfig {
            app_id: Some("id".into()),
            app_key: Some("key".into()),
            from: Some("LDS".into()),
            to: Some("YRK".into()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_config_yields_api_config() {
        let api = valid().validate().unwrap();
        assert_eq!(api.app_id, "id");
        assert_eq!(api.app_key, "key");
        assert_eq!(api.from.as_str(), "LDS");
        assert_eq!(api.to.as_str(), "YRK");
        assert_eq!(api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn lowercase_station_codes_pass() {
        let config = WidgetConfig {
            from: Some("lds".into()),
            to: Some("yrk".into()),
            ..valid()
        };
        let api = config.validate().unwrap();
        assert_eq!(api.from.as_str(), "LDS");
        assert_eq!(api.to.as_str(), "YRK");
    }

    #[test]
    fn wrong_length_station_codes_fail() {
        for code in ["ab", "abcd", "", "L1S"] {
            let config = WidgetConfig {
                from: Some(code.into()),
                ..valid()
            };
            assert_eq!(config.validate().unwrap_err(), vec![ConfigError::InvalidFrom]);
        }
    }

    #[test]
    fn missing_either_credential_is_one_error() {
        let no_id = WidgetConfig {
            app_id: None,
            ..valid()
        };
        assert_eq!(
            no_id.validate().unwrap_err(),
            vec![ConfigError::MissingCredentials]
        );

        let empty_key = WidgetConfig {
            app_key: Some(String::new()),
            ..valid()
        };
        assert_eq!(
            empty_key.validate().unwrap_err(),
            vec![ConfigError::MissingCredentials]
        );

        let neither = WidgetConfig {
            app_id: None,
            app_key: None,
            ..valid()
        };
        assert_eq!(
            neither.validate().unwrap_err(),
            vec![ConfigError::MissingCredentials]
        );
    }

    #[test]
    fn errors_accumulate_in_order() {
        let errors = WidgetConfig::default().validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ConfigError::MissingCredentials,
                ConfigError::InvalidFrom,
                ConfigError::InvalidTo,
            ]
        );
        assert_eq!(
            errors[0].to_string(),
            "API information ('app_id' and/or 'app_key') missing."
        );
        assert_eq!(
            errors[1].to_string(),
            "Invalid 'FROM' station code (must be 3 characters)."
        );
        assert_eq!(
            errors[2].to_string(),
            "Invalid 'TO' station code (must be 3 characters)."
        );
    }

    #[test]
    fn filters_pass_through() {
        let config = WidgetConfig {
            time_frame: Some("PT01:00:00".into()),
            operator: Some("NT".into()),
            api_base_url: "http://localhost:9000".into(),
            timeout_secs: 3,
            ..valid()
        };
        let api = config.validate().unwrap();
        assert_eq!(api.time_frame.as_deref(), Some("PT01:00:00"));
        assert_eq!(api.operator.as_deref(), Some("NT"));
        assert_eq!(api.base_url, "http://localhost:9000");
        assert_eq!(api.timeout_secs, 3);

        let blank = WidgetConfig {
            operator: Some("  ".into()),
            ..valid()
        };
        assert!(blank.validate().unwrap().operator.is_none());
    }

    #[test]
    fn parse_widget_keys() {
        let config = WidgetConfig::from_json(
            r#"{
                "updateInterval": 120,
                "logData": true,
                "maxTrains": 8,
                "getLiveArrivals": true,
                "app_id": "abc",
                "app_key": "def",
                "from": "lds",
                "to": "YRK",
                "timeFrame": "PT02:00:00",
                "operator": "TP",
                "listenAddr": "0.0.0.0:8080"
            }"#,
        )
        .unwrap();

        assert_eq!(config.update_interval(), Duration::from_secs(120));
        assert!(config.log_data);
        assert_eq!(config.max_trains, 8);
        assert!(config.get_live_arrivals);
        assert_eq!(config.app_id.as_deref(), Some("abc"));
        assert_eq!(config.from.as_deref(), Some("lds"));
        assert_eq!(config.time_frame.as_deref(), Some("PT02:00:00"));
        assert_eq!(config.listen_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[test]
    fn update_interval_has_a_floor() {
        let config = WidgetConfig::from_json(r#"{"updateInterval": 0}"#).unwrap();
        assert_eq!(
            config.update_interval(),
            Duration::from_secs(MIN_UPDATE_INTERVAL_SECS)
        );

        let config = WidgetConfig::from_json(r#"{"updateInterval": 11}"#).unwrap();
        assert_eq!(config.update_interval(), Duration::from_secs(11));
    }

    #[test]
    fn defaults_apply() {
        let config = WidgetConfig::from_json("{}").unwrap();
        assert_eq!(config.update_interval_secs, 300);
        assert_eq!(config.max_trains, 5);
        assert!(!config.log_data);
        assert!(!config.get_live_arrivals);
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"from": "LDS", "to": "YRK"}"#).unwrap();

        let config = WidgetConfig::load(&path).unwrap();
        assert_eq!(config.to.as_deref(), Some("YRK"));

        assert!(matches!(
            WidgetConfig::load(dir.path().join("missing.json")),
            Err(ConfigLoadError::Io { .. })
        ));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            WidgetConfig::load(&path),
            Err(ConfigLoadError::Json(_))
        ));
    }

    #[test]
    fn credentials_from_lookup_only_when_absent() {
        let lookup = |key: &str| match key {
            APP_ID_ENV => Some("env-id".to_string()),
            APP_KEY_ENV => Some("env-key".to_string()),
            _ => None,
        };

        let config = WidgetConfig::default().with_credentials_from(lookup);
        assert_eq!(config.app_id.as_deref(), Some("env-id"));
        assert_eq!(config.app_key.as_deref(), Some("env-key"));

        let config = valid().with_credentials_from(lookup);
        assert_eq!(config.app_id.as_deref(), Some("id"));
        assert_eq!(config.app_key.as_deref(), Some("key"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn station() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[A-Za-z0-9]{0,5}")
    }

    proptest! {
        /// A missing credential always yields exactly one credential error,
        /// first, followed by whatever station errors apply.
        #[test]
        fn credential_error_combined(
            drop_id in any::<bool>(),
            from in station(),
            to in station(),
        ) {
            let config = WidgetConfig {
                app_id: if drop_id { None } else { Some("id".into()) },
                app_key: if drop_id { Some("key".into()) } else { None },
                from: from.clone(),
                to: to.clone(),
                ..Default::default()
            };

            let errors = config.validate().unwrap_err();
            let credential_errors = errors
                .iter()
                .filter(|e| **e == ConfigError::MissingCredentials)
                .count();
            prop_assert_eq!(credential_errors, 1);
            prop_assert_eq!(&errors[0], &ConfigError::MissingCredentials);

            let from_ok = parse_station(from.as_deref()).is_some();
            let to_ok = parse_station(to.as_deref()).is_some();
            prop_assert_eq!(errors.contains(&ConfigError::InvalidFrom), !from_ok);
            prop_assert_eq!(errors.contains(&ConfigError::InvalidTo), !to_ok);
        }

        /// Any three-letter code validates regardless of case
        #[test]
        fn three_letter_codes_pass(from in "[A-Za-z]{3}", to in "[A-Za-z]{3}") {
            let config = WidgetConfig {
                app_id: Some("id".into()),
                app_key: Some("key".into()),
                from: Some(from),
                to: Some(to),
                ..Default::default()
            };
            prop_assert!(config.validate().is_ok());
        }
    }
}
