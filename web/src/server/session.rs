//! In-memory view session: the activity map and stats behind the page.
//!
//! The session is fetched once at start-up and then only changes when the
//! backend confirms a new workout.  The lock is never held across an
//! `.await`; every network call happens first and the result is applied
//! afterwards.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use heatmap_common::calendar::{parse_date, DateWindow};
use heatmap_common::error::HeatmapError;
use heatmap_common::grid::HeatmapGrid;
use heatmap_common::intensity::ScaleKind;
use heatmap_common::protocol::{NewWorkout, Stats, WorkoutAck, WorkoutRecord};
use heatmap_common::ActivityMap;

use super::backend::{BackendClient, BackendError};

/// Thread-safe session shared across requests.
pub type SharedSession = Arc<Mutex<ViewSession>>;

#[derive(Debug, Default)]
pub struct ViewSession {
    activity: ActivityMap,
    stats: Option<Stats>,
    loaded: bool,
}

impl ViewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn activity(&self) -> &ActivityMap {
        &self.activity
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    /// Whether the workout list has been fetched at least once.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the activity map with one rebuilt from `workouts`.
    pub fn apply_workouts(&mut self, workouts: &[WorkoutRecord]) {
        self.activity = ActivityMap::from_workouts(workouts);
        self.loaded = true;
    }

    pub fn apply_stats(&mut self, stats: Stats) {
        self.stats = Some(stats);
    }

    /// Add a backend-confirmed workout to its day.
    pub fn apply_ack(&mut self, ack: &WorkoutAck) -> Result<(), HeatmapError> {
        let date = parse_date(&ack.date)?;
        self.activity.record(date, ack.duration as f64);
        Ok(())
    }

    /// Derive a fresh grid.  Level scales see each day as a share of its
    /// year's busiest day.
    pub fn grid(&self, window: DateWindow, scale: ScaleKind) -> HeatmapGrid {
        if scale.is_normalized() {
            HeatmapGrid::build(window, &self.activity.normalized_by_year_max(), scale)
        } else {
            HeatmapGrid::build(window, &self.activity, scale)
        }
    }
}

pub fn lock(session: &SharedSession) -> MutexGuard<'_, ViewSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fetch workouts and stats concurrently.
///
/// A failed fetch is logged and leaves that part of the session as it was.
/// Returns `true` when both fetches succeeded.
pub async fn load(session: &SharedSession, client: &BackendClient) -> bool {
    let (workouts, stats) = tokio::join!(client.workouts(), client.stats());
    let mut ok = true;

    match workouts {
        Ok(workouts) => {
            info!("Loaded {} workout(s) from {}", workouts.len(), client.base_url());
            lock(session).apply_workouts(&workouts);
        }
        Err(e) => {
            warn!("Cannot load workouts, keeping previous heatmap: {e}");
            ok = false;
        }
    }

    match stats {
        Ok(stats) => lock(session).apply_stats(stats),
        Err(e) => {
            warn!("Cannot load stats: {e}");
            ok = false;
        }
    }

    ok
}

/// Post a workout and, once the backend confirms it, fold the echoed
/// date/duration into the map and refresh the stats.
///
/// Nothing in the session changes when the post fails.
pub async fn submit(
    session: &SharedSession,
    client: &BackendClient,
    workout: &NewWorkout,
) -> Result<WorkoutAck, BackendError> {
    let ack = client.add_workout(workout).await?;

    let applied = lock(session).apply_ack(&ack);
    if let Err(e) = applied {
        warn!("Backend echoed an unusable workout date: {e}");
    }

    let stats = client.stats().await;
    match stats {
        Ok(stats) => lock(session).apply_stats(stats),
        Err(e) => warn!("Cannot refresh stats after new workout: {e}"),
    }

    info!("Recorded {} min on {}", ack.duration, ack.date);
    Ok(ack)
}
