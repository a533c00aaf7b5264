//! Wire types exchanged with the workout backend.
//!
//! Dates stay as strings here: the backend owns their format and the core
//! only uses them as keys.

use serde::{Deserialize, Serialize};

use crate::calendar::{long_date, parse_date};

/// One row of `GET /api/workouts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub date: String,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub exercise_type: String,
}

/// `GET /api/stats`, shown verbatim by the stats panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_workouts: u64,
    pub current_streak: u32,
    pub most_active_day: Option<String>,
}

impl Stats {
    /// `Sat Jan 06 2024`, or `N/A` when there is no (usable) day.
    pub fn most_active_day_label(&self) -> String {
        self.most_active_day
            .as_deref()
            .and_then(|d| parse_date(d).ok())
            .map(long_date)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Body of `POST /api/add_workout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkout {
    pub date: String,
    pub duration: u32,
    pub exercise_type: String,
}

/// What the backend echoes after accepting a workout.  Anything beyond the
/// date and duration is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutAck {
    pub date: String,
    pub duration: u32,
}

/// Health-check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_label() {
        let mut stats = Stats {
            total_workouts: 3,
            current_streak: 2,
            most_active_day: Some("2024-01-06".into()),
        };
        assert_eq!(stats.most_active_day_label(), "Sat Jan 06 2024");
        stats.most_active_day = None;
        assert_eq!(stats.most_active_day_label(), "N/A");
    }

    #[test]
    fn test_ack_ignores_extra_fields() {
        let ack: WorkoutAck = serde_json::from_str(
            r#"{"id": 7, "date": "2024-01-05", "duration": 25, "exercise_type": "run"}"#,
        )
        .unwrap();
        assert_eq!(ack.date, "2024-01-05");
        assert_eq!(ack.duration, 25);
    }

    #[test]
    fn test_stats_null_day() {
        let stats: Stats = serde_json::from_str(
            r#"{"total_workouts": 0, "current_streak": 0, "most_active_day": null}"#,
        )
        .unwrap();
        assert_eq!(stats, Stats::default());
    }
}
