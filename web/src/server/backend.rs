//! Async client for the workout backend.
//!
//! Routes consumed:
//!   GET  /api/workouts             → every recorded workout
//!   GET  /api/stats                → totals, streak, most active day
//!   POST /api/add_workout          → record a workout, echoes date/duration
//!   GET  /activity_details/{date}  → activities for one day (or `{error}`)

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use heatmap_common::calendar::date_key;
use heatmap_common::detail::DetailResult;
use heatmap_common::protocol::{NewWorkout, Stats, WorkoutAck, WorkoutRecord};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{path}: request failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} returned {status}")]
    Status { path: String, status: StatusCode },

    #[error("{path}: cannot decode response: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl BackendError {
    fn request(path: &str, source: reqwest::Error) -> Self {
        BackendError::Request {
            path: path.to_string(),
            source,
        }
    }

    fn status(path: &str, status: StatusCode) -> Self {
        BackendError::Status {
            path: path.to_string(),
            status,
        }
    }

    fn decode(path: &str, source: reqwest::Error) -> Self {
        BackendError::Decode {
            path: path.to_string(),
            source,
        }
    }
}

/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Cannot create HTTP client")?;
        Ok(BackendClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn workouts(&self) -> Result<Vec<WorkoutRecord>, BackendError> {
        self.get_json("/api/workouts").await
    }

    pub async fn stats(&self) -> Result<Stats, BackendError> {
        self.get_json("/api/stats").await
    }

    pub async fn add_workout(&self, workout: &NewWorkout) -> Result<WorkoutAck, BackendError> {
        let path = "/api/add_workout";
        let resp = self
            .http
            .post(self.url(path))
            .json(workout)
            .send()
            .await
            .map_err(|source| BackendError::request(path, source))?;
        decode(path, resp).await
    }

    /// Detail lookup for one day.
    ///
    /// The backend answers bad requests with an `{error}` body and a
    /// non-success status; that body is returned as
    /// [`DetailResult::Failed`] so the popup can show it.
    pub async fn activity_details(&self, date: NaiveDate) -> Result<DetailResult, BackendError> {
        let path = format!("/activity_details/{}", date_key(date));
        let resp = self
            .http
            .get(self.url(&path))
            .send()
            .await
            .map_err(|source| BackendError::request(&path, source))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json()
                .await
                .map_err(|source| BackendError::Decode { path, source });
        }

        match resp.json::<DetailResult>().await {
            Ok(failed @ DetailResult::Failed { .. }) => {
                debug!("{path} returned {status} with an error body");
                Ok(failed)
            }
            _ => Err(BackendError::Status { path, status }),
        }
    }

    // ── HTTP helpers ─────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| BackendError::request(path, source))?;
        decode(path, resp).await
    }
}

async fn decode<T: DeserializeOwned>(
    path: &str,
    resp: reqwest::Response,
) -> Result<T, BackendError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(BackendError::status(path, status));
    }
    resp.json()
        .await
        .map_err(|source| BackendError::decode(path, source))
}

// ─── Test backend ────────────────────────────────────────────────────────────
