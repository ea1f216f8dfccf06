//! # Tide Bot Core Library
//!
//! This library provides the building blocks for the Seattle tide bot: fetching
//! the day's high/low tide predictions from NOAA, rendering them as a short text
//! post, and publishing that post to Twitter.
//!
//! ## Design Philosophy
//!
//! ### Thin Layers
//! - **Fetch**: one GET against the NOAA Tides and Currents data API per trigger,
//!   no caching and no retries
//! - **Render**: a pure function from (date, predictions) to text
//! - **Publish**: one signed POST to the Twitter API per trigger
//!
//! ### Explicit Dependencies
//! The HTTP front end never reaches for global clients. The prediction source and
//! the publisher are injected into [`server::AppState`] behind the
//! [`server::PredictionSource`] and [`server::Publisher`] traits, so the whole
//! pipeline can be driven with test doubles.
//!
//! ### Data Flow
//! 1. **Trigger**: `GET /tide` (typically from an external scheduler)
//! 2. **Fetch**: NOAA `predictions` product, `hilo` interval, for today
//! 3. **Render**: header line plus one line per prediction
//! 4. **Publish**: post the text, report the outcome in the HTTP status
//!
//! ## Core Types
//!
//! - [`Prediction`]: a single high or low water extremum
//! - [`PredictionSet`]: all extrema for one calendar day

use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod credentials;
pub mod renderer;
pub mod server;
pub mod tide_data;
pub mod twitter;

#[cfg(test)]
mod tests;

/// A single predicted tide extremum, exactly as NOAA reports it.
///
/// Values are kept as the strings NOAA sends (`"11.110"`, not `11.11`) so the
/// rendered post shows the same precision as the source.
///
/// # Example
/// ```
/// use tide_bot_lib::Prediction;
///
/// let high: Prediction =
///     serde_json::from_str(r#"{"t":"2019-08-30 04:39","v":"11.110","type":"H"}"#).unwrap();
/// assert_eq!(high.time, "2019-08-30 04:39");
/// assert_eq!(high.value, "11.110");
/// assert_eq!(high.kind, "H");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Local station time, `YYYY-MM-DD HH:MM`
    #[serde(rename = "t")]
    pub time: String,
    /// Height in feet above the datum, as decimal text
    #[serde(rename = "v")]
    pub value: String,
    /// `H` for high water, `L` for low water
    #[serde(rename = "type")]
    pub kind: String,
}

/// The tide extrema for one calendar day.
///
/// Order is whatever NOAA returns (chronological in practice); no sorting or
/// deduplication is applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionSet {
    pub predictions: Vec<Prediction>,
}

impl PredictionSet {
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}
