//! Request and response shapes of the view's own routes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use heatmap_common::calendar::{parse_date, MonthLabel};
use heatmap_common::grid::HeatmapGrid;
use heatmap_common::intensity::Rgb;
use heatmap_common::protocol::{NewWorkout, Stats, WorkoutAck};

// ─── Page query ──────────────────────────────────────────────────────────────

/// Optional overrides on `/`, `/calendar` and `/api/heatmap`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    pub date: Option<String>,
    pub mode: Option<String>,
    pub scale: Option<String>,
    pub anchor: Option<String>,
    pub labels: Option<String>,
}

// ─── Add-workout form ────────────────────────────────────────────────────────

/// The add-workout form exactly as submitted, so it can be re-rendered
/// with the user's input after a failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkoutForm {
    pub date: String,
    pub duration: String,
    pub exercise_type: String,
}

impl WorkoutForm {
    /// The minimum needed to merge the entry into the map: a real date and
    /// a positive whole number of minutes.
    pub fn to_new_workout(&self) -> Result<NewWorkout, String> {
        let date = parse_date(&self.date).map_err(|e| e.to_string())?;
        let duration: u32 = self
            .duration
            .trim()
            .parse()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| {
                format!("duration must be a positive number of minutes, got `{}`", self.duration)
            })?;
        let exercise_type = self.exercise_type.trim();
        if exercise_type.is_empty() {
            return Err("exercise type is required".into());
        }
        Ok(NewWorkout {
            date: date.format("%Y-%m-%d").to_string(),
            duration,
            exercise_type: exercise_type.to_string(),
        })
    }
}

// ─── JSON heatmap ────────────────────────────────────────────────────────────

/// `GET /api/heatmap`: the built grid for renderers other than the page.
#[derive(Debug, Serialize)]
pub struct HeatmapResponse<'a> {
    pub title: String,
    pub labels: Vec<MonthLabel>,
    pub legend: Vec<Rgb>,
    pub grid: &'a HeatmapGrid,
}

/// `POST /api/workouts`: the saved entry and everything the page redraws.
#[derive(Debug, Serialize)]
pub struct SavedWorkout<'a> {
    pub ack: WorkoutAck,
    pub stats: Option<Stats>,
    pub heatmap: HeatmapResponse<'a>,
    /// Replaces `#workoutCalendar`.
    pub heatmap_html: String,
    /// Replaces `#statsPanel`.
    pub stats_html: String,
}

/// JSON error body, `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn response(status: StatusCode, error: impl Into<String>) -> Response {
        let body = ErrorBody {
            error: error.into(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(date: &str, duration: &str, kind: &str) -> WorkoutForm {
        WorkoutForm {
            date: date.into(),
            duration: duration.into(),
            exercise_type: kind.into(),
        }
    }

    #[test]
    fn test_valid_form() {
        let w = form("2024-01-05", " 25 ", "Run").to_new_workout().unwrap();
        assert_eq!(w.date, "2024-01-05");
        assert_eq!(w.duration, 25);
        assert_eq!(w.exercise_type, "Run");
    }

    #[test]
    fn test_invalid_forms() {
        assert!(form("05/01/2024", "25", "Run").to_new_workout().is_err());
        assert!(form("2024-01-05", "0", "Run").to_new_workout().is_err());
        assert!(form("2024-01-05", "half an hour", "Run").to_new_workout().is_err());
        assert!(form("2024-01-05", "25", "  ").to_new_workout().is_err());
    }
}
