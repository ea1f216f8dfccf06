//! # HTTP Front End
//!
//! Three stateless routes:
//!
//! | Route | Behavior |
//! |---|---|
//! | `/` and anything unmatched | `"<station> Tide : <path>\ntwitter bot."` |
//! | `/health` | `"healthy"`, no dependency checks |
//! | `/tide` | fetch → render → publish |
//!
//! No route restricts methods.
//!
//! ## `/tide` Outcomes
//!
//! - `200`, `Content-Type: application/json`, body `tweeted`: the post went out
//! - `503`: no publisher (startup credential check failed); nothing is fetched
//! - `502`: the NOAA fetch failed (nothing is published) or the post was refused
//!
//! Concurrent `/tide` requests are independent. Two triggers close together
//! will fetch twice and post twice.

use crate::renderer::render_message;
use crate::tide_data::TideError;
use crate::twitter::PublishError;
use crate::PredictionSet;
use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use chrono::{DateTime, FixedOffset, Local};
use std::sync::Arc;

/// Where predictions come from.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    /// Predictions for the calendar day of `as_of`.
    async fn predictions(&self, as_of: &DateTime<FixedOffset>) -> Result<PredictionSet, TideError>;
}

/// Where rendered posts go.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `text`, returning the platform's id for the new post.
    async fn publish(&self, text: &str) -> Result<String, PublishError>;
}

type Clock = Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn PredictionSource>,
    publisher: Option<Arc<dyn Publisher>>,
    station_name: String,
    clock: Clock,
}

impl AppState {
    /// `publisher` is `None` when the startup credential check failed.
    pub fn new(
        source: Arc<dyn PredictionSource>,
        publisher: Option<Arc<dyn Publisher>>,
        station_name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            publisher,
            station_name: station_name.into(),
            clock: Arc::new(|| DateTime::<FixedOffset>::from(Local::now())),
        }
    }

    /// Replace the wall clock used to pick "today".
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<FixedOffset> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handle_root))
        .route("/health", any(handle_health))
        .route("/tide", any(handle_tide))
        .fallback(handle_root)
        .with_state(state)
}

async fn handle_root(State(state): State<AppState>, uri: Uri) -> String {
    format!("{} Tide : {}\ntwitter bot.", state.station_name, uri.path())
}

async fn handle_health() -> &'static str {
    "healthy"
}

async fn handle_tide(State(state): State<AppState>, uri: Uri) -> Response {
    log::info!("Request: {}", uri);

    let Some(publisher) = state.publisher.as_ref() else {
        log::error!("No Twitter client available; credentials were not verified at startup");
        return (StatusCode::SERVICE_UNAVAILABLE, "publisher unavailable").into_response();
    };

    let now = (state.clock)();
    let predictions = match state.source.predictions(&now).await {
        Ok(predictions) => predictions,
        Err(e) => {
            log::error!("Tide prediction fetch failed: {}", e);
            return (StatusCode::BAD_GATEWAY, format!("tide fetch failed: {}", e)).into_response();
        }
    };
    if let Ok(json) = serde_json::to_string(&predictions) {
        log::debug!("{}", json);
    }

    let text = render_message(&state.station_name, &now, &predictions);
    log::info!("Posting:\n{}", text);

    match publisher.publish(&text).await {
        Ok(id) => {
            log::info!("Published post {}", id);
            ([(header::CONTENT_TYPE, "application/json")], "tweeted").into_response()
        }
        Err(e) => {
            log::error!("Publishing failed: {}", e);
            (StatusCode::BAD_GATEWAY, format!("publish failed: {}", e)).into_response()
        }
    }
}
