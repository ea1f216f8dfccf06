//! # Post Text Rendering
//!
//! Turns a day's predictions into the text that gets posted:
//!
//! ```text
//! Seattle tide predictions for Friday, August 30, 2019
//! 2019-08-30 04:39    11.110 feet    (H)
//! 2019-08-30 11:23    -2.062 feet    (L)
//! 2019-08-30 18:18    11.894 feet    (H)
//! ```
//!
//! Everything here is pure: the same inputs always render the same text.

use crate::{Prediction, PredictionSet};
use chrono::{DateTime, TimeZone};

/// Long-form date used in the header, e.g. "Monday, January 2, 2006"
const HEADER_DATE_FORMAT: &str = "%A, %B %-d, %Y";

/// Render the header line for the day of `as_of` (in its own zone).
pub fn render_header<Tz: TimeZone>(station_name: &str, as_of: &DateTime<Tz>) -> String {
    format!(
        "{} tide predictions for {}",
        station_name,
        as_of.date_naive().format(HEADER_DATE_FORMAT)
    )
}

/// Render one prediction as `<time>    <value> feet    (<type>)`.
pub fn render_line(prediction: &Prediction) -> String {
    format!(
        "{}    {} feet    ({})",
        prediction.time, prediction.value, prediction.kind
    )
}

/// Render the full post: header, then one line per prediction in order.
///
/// An empty set renders the header alone.
pub fn render_message<Tz: TimeZone>(
    station_name: &str,
    as_of: &DateTime<Tz>,
    set: &PredictionSet,
) -> String {
    let mut lines = Vec::with_capacity(set.len() + 1);
    lines.push(render_header(station_name, as_of));
    lines.extend(set.predictions.iter().map(render_line));
    lines.join("\n")
}
