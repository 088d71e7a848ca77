//! TransportAPI live board HTTP client.
//!
//! Fetches the departure board at the origin station filtered to services
//! calling at the destination, and the arrival board at the destination
//! filtered to services that called at the origin.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::Crs;

use super::BoardSource;
use super::error::FetchError;
use super::types::{ArrivalBoard, DepartureBoard};

/// Default base URL for the TransportAPI UK train station endpoints.
pub const DEFAULT_BASE_URL: &str = "https://transportapi.com/v3/uk/train/station/";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the live board client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Application id credential
    pub app_id: String,
    /// Application key credential
    pub app_key: String,
    /// Station the departures are taken from
    pub from: Crs,
    /// Station the services must call at
    pub to: Crs,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// ISO-8601 offset window, passed as `to_offset` (e.g. "PT01:00:00")
    pub time_frame: Option<String>,
    /// ATOC operator filter
    pub operator: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a new config for the given credentials and station pair.
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>, from: Crs, to: Crs) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            from,
            to,
            base_url: DEFAULT_BASE_URL.to_string(),
            time_frame: None,
            operator: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Restrict results to an offset window.
    pub fn with_time_frame(mut self, time_frame: Option<String>) -> Self {
        self.time_frame = time_frame;
        self
    }

    /// Restrict results to one operator.
    pub fn with_operator(mut self, operator: Option<String>) -> Self {
        self.operator = operator;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// URL of the live board for a station.
    fn board_url(&self, station: &Crs) -> String {
        format!(
            "{}/{}/live.json",
            self.base_url.trim_end_matches('/'),
            station.as_str()
        )
    }

    /// Query parameters shared by both boards.
    fn common_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("app_id", self.app_id.clone()),
            ("app_key", self.app_key.clone()),
        ];
        if let Some(offset) = &self.time_frame {
            query.push(("to_offset", offset.clone()));
        }
        if let Some(operator) = &self.operator {
            query.push(("operator", operator.clone()));
        }
        query.push(("darwin", "true".to_string()));
        query
    }

    fn departures_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("calling_at", self.to.as_str().to_string()),
            ("station_detail", "calling_at".to_string()),
        ];
        query.extend(self.common_query());
        query
    }

    fn arrivals_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("called_at", self.from.as_str().to_string()),
            ("type", "arrival".to_string()),
        ];
        query.extend(self.common_query());
        query
    }
}

/// Live board API client.
#[derive(Debug, Clone)]
pub struct TransportClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl TransportClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    fn departures_request(&self) -> reqwest::RequestBuilder {
        self.http
            .get(self.config.board_url(&self.config.from))
            .query(&self.config.departures_query())
    }

    fn arrivals_request(&self) -> reqwest::RequestBuilder {
        self.http
            .get(self.config.board_url(&self.config.to))
            .query(&self.config.arrivals_query())
    }

    /// Get the departure board at the origin, filtered to the destination.
    pub async fn get_departures(&self) -> Result<DepartureBoard, FetchError> {
        debug!(from = %self.config.from, to = %self.config.to, "Fetching departures");
        send_json(self.departures_request()).await
    }

    /// Get the arrival board at the destination, filtered to the origin.
    pub async fn get_arrivals(&self) -> Result<ArrivalBoard, FetchError> {
        debug!(from = %self.config.from, to = %self.config.to, "Fetching arrivals");
        send_json(self.arrivals_request()).await
    }
}

impl BoardSource for TransportClient {
    async fn departures(&self) -> Result<DepartureBoard, FetchError> {
        self.get_departures().await
    }

    async fn arrivals(&self) -> Result<ArrivalBoard, FetchError> {
        self.get_arrivals().await
    }
}

/// Send a request and decode a JSON body, mapping failure statuses.
async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, FetchError> {
    let response = request.send().await?;
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(FetchError::Unauthorized);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| FetchError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}
