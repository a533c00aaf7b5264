//! Per-day activity totals.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calendar::parse_date;
use crate::protocol::WorkoutRecord;

/// Date → summed raw value (minutes, or a level in [0,1]).
///
/// Absent dates read as 0.  All mutation goes through [`ActivityMap::record`],
/// which only ever adds, so the order workouts arrive in does not matter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityMap {
    days: BTreeMap<NaiveDate, f64>,
}

impl ActivityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum workout durations per date.  Records with an unreadable date are
    /// skipped.
    pub fn from_workouts<'a>(workouts: impl IntoIterator<Item = &'a WorkoutRecord>) -> Self {
        let mut map = Self::new();
        for w in workouts {
            match parse_date(&w.date) {
                Ok(date) => map.record(date, w.duration as f64),
                Err(e) => warn!("Skipping workout with unusable date: {e}"),
            }
        }
        map
    }

    pub fn get(&self, date: NaiveDate) -> f64 {
        self.days.get(&date).copied().unwrap_or(0.0)
    }

    /// Add `amount` to `date`.  Negative and non-finite amounts are ignored.
    pub fn record(&mut self, date: NaiveDate, amount: f64) {
        if !(amount.is_finite() && amount > 0.0) {
            return;
        }
        *self.days.entry(date).or_insert(0.0) += amount;
    }

    /// Fold another map into this one.
    pub fn merge(&mut self, other: &ActivityMap) {
        for (date, value) in other.iter() {
            self.record(date, value);
        }
    }

    /// Rescale each day to its share of the busiest day of the same year,
    /// giving levels in [0,1].
    pub fn normalized_by_year_max(&self) -> ActivityMap {
        let mut yearly_max: BTreeMap<i32, f64> = BTreeMap::new();
        for (date, value) in &self.days {
            let max = yearly_max.entry(date.year()).or_insert(0.0);
            *max = max.max(*value);
        }

        let days = self
            .days
            .iter()
            .filter_map(|(date, value)| {
                let max = yearly_max.get(&date.year()).copied().unwrap_or(0.0);
                (max > 0.0).then(|| (*date, value / max))
            })
            .collect();
        ActivityMap { days }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.days.iter().map(|(d, v)| (*d, *v))
    }

    pub fn total(&self) -> f64 {
        self.days.values().sum()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<(NaiveDate, f64)> for ActivityMap {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        let mut map = ActivityMap::new();
        for (date, value) in iter {
            map.record(date, value);
        }
        map
    }
}
