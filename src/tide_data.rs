//! # NOAA Tide Prediction Fetching
//!
//! This module handles all network operations for fetching tide predictions from
//! NOAA's Tides and Currents data API.
//!
//! ## Data Source
//!
//! ### NOAA CO-OPS Data API
//! - **URL**: https://tidesandcurrents.noaa.gov/api/datagetter
//! - **Station**: 9447130 (Seattle, WA) - configurable in tide-bot.toml
//! - **Product**: `predictions` at `hilo` interval (only the high/low extrema)
//! - **Format**: JSON
//!
//! A request for 30 Aug 2019 looks like:
//!
//! ```text
//! GET /api/datagetter?application=seattletidedata&product=predictions
//!     &begin_date=20190830&end_date=20190830&datum=MLLW&station=9447130
//!     &time_zone=lst_ldt&units=english&interval=hilo&format=json
//! ```
//!
//! and returns:
//!
//! ```text
//! { "predictions" : [ {"t":"2019-08-30 04:39", "v":"11.110", "type":"H"},
//!                     {"t":"2019-08-30 11:23", "v":"-2.062", "type":"L"},
//!                     {"t":"2019-08-30 18:18", "v":"11.894", "type":"H"} ]}
//! ```
//!
//! ## Error Handling
//!
//! - **Network timeouts**: the HTTP client carries a 5 second timeout by default
//! - **Server errors**: any non-2xx status is a fetch failure
//! - **Service errors**: NOAA reports bad stations or dates as a `200` with an
//!   `{"error": {"message": ...}}` body; the message is surfaced as-is
//! - **Parse failures**: anything else that is not a prediction list
//!
//! There is no cache and no retry: every call is a fresh request, and errors
//! propagate through [`TideError`] to the caller.

use crate::config::{NoaaConfig, StationConfig};
use crate::server::PredictionSource;
use crate::PredictionSet;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while fetching tide predictions.
#[derive(Error, Debug)]
pub enum TideError {
    /// HTTP request failed (network, timeout, or non-2xx status)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configured base URL could not be parsed
    #[error("invalid NOAA URL: {0}")]
    InvalidUrl(String),

    /// Response body was not a prediction list
    #[error("unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// NOAA answered with an error object
    #[error("NOAA error: {0}")]
    Service(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NoaaResponse {
    Predictions(PredictionSet),
    Error { error: NoaaErrorBody },
}

#[derive(Deserialize)]
struct NoaaErrorBody {
    message: String,
}

/// Format a timestamp as NOAA's `YYYYMMDD` query date.
///
/// The calendar date is taken in the timestamp's own zone; no conversion to UTC
/// happens, so `2019-05-09T23:30:00-07:00` is `20190509` even though it is
/// already the 10th in UTC.
pub fn ymd<Tz: TimeZone>(t: &DateTime<Tz>) -> String {
    let date = t.date_naive();
    let ymd = format!("{:04}{:02}{:02}", date.year(), date.month(), date.day());
    log::debug!("Date: {}", ymd);
    ymd
}

/// Parse a NOAA response body into a [`PredictionSet`].
pub fn parse_response(body: &str) -> Result<PredictionSet, TideError> {
    match serde_json::from_str::<NoaaResponse>(body)? {
        NoaaResponse::Predictions(set) => Ok(set),
        NoaaResponse::Error { error } => Err(TideError::Service(error.message)),
    }
}

/// Client for the NOAA data API, bound to one station.
///
/// The underlying `reqwest::Client` pools connections, so one `NoaaClient`
/// should be built at startup and shared.
pub struct NoaaClient {
    http: Client,
    base_url: Url,
    station: StationConfig,
    noaa: NoaaConfig,
}

impl NoaaClient {
    pub fn new(station: StationConfig, noaa: NoaaConfig) -> Result<Self, TideError> {
        let base_url = Url::parse(&noaa.base_url)
            .map_err(|e| TideError::InvalidUrl(format!("{}: {}", noaa.base_url, e)))?;
        let http = Client::builder().timeout(noaa.timeout()).build()?;

        Ok(Self {
            http,
            base_url,
            station,
            noaa,
        })
    }

    /// Build the prediction query for one day (`begin_date == end_date`).
    pub fn query_url(&self, date: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("application", &self.station.application)
            .append_pair("product", "predictions")
            .append_pair("begin_date", date)
            .append_pair("end_date", date)
            .append_pair("datum", &self.noaa.datum)
            .append_pair("station", &self.station.id)
            .append_pair("time_zone", &self.noaa.time_zone)
            .append_pair("units", &self.noaa.units)
            .append_pair("interval", &self.noaa.interval)
            .append_pair("format", "json");
        url
    }

    /// Fetch the predictions for the calendar day of `as_of`.
    ///
    /// # Example
    /// ```no_run
    /// use tide_bot_lib::config::Config;
    /// use tide_bot_lib::tide_data::NoaaClient;
    ///
    /// # async fn run() -> Result<(), tide_bot_lib::tide_data::TideError> {
    /// let config = Config::default();
    /// let client = NoaaClient::new(config.station, config.noaa)?;
    /// let today = client.fetch(&chrono::Local::now()).await?;
    /// println!("{} extrema today", today.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch<Tz: TimeZone>(&self, as_of: &DateTime<Tz>) -> Result<PredictionSet, TideError> {
        let url = self.query_url(&ymd(as_of));
        log::debug!("Fetching {}", url);

        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let set = parse_response(&body)?;
        log::info!(
            "Fetched {} predictions for station {}",
            set.len(),
            self.station.id
        );
        Ok(set)
    }
}

#[async_trait]
impl PredictionSource for NoaaClient {
    async fn predictions(&self, as_of: &DateTime<FixedOffset>) -> Result<PredictionSet, TideError> {
        self.fetch(as_of).await
    }
}
