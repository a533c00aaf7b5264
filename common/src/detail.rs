//! Per-day detail lookups (the popup behind a heatmap cell).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shown when a day has no recorded activities.
pub const NO_ACTIVITIES_LABEL: &str = "No activities recorded";

/// Body of `GET /activity_details/{date}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailResult {
    Found {
        activity_level: f64,
        activities: Vec<String>,
    },
    Failed {
        error: String,
    },
}

impl DetailResult {
    pub fn is_error(&self) -> bool {
        matches!(self, DetailResult::Failed { .. })
    }

    /// Lines for the popup body.
    pub fn lines(&self) -> Vec<String> {
        match self {
            DetailResult::Found { activities, .. } if activities.is_empty() => {
                vec![NO_ACTIVITIES_LABEL.to_string()]
            }
            DetailResult::Found { activities, .. } => activities.clone(),
            DetailResult::Failed { error } => vec![format!("Could not load details: {error}")],
        }
    }
}

/// Identifies one detail request and the date it asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    id: u64,
    pub date: NaiveDate,
}

/// Stale-response suppression for detail popups.
///
/// Lookups are never cancelled; instead each one takes a ticket and only
/// the answer to the newest ticket may update the popup.
#[derive(Debug, Default)]
pub struct DetailTracker {
    issued: u64,
}

impl DetailTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, date: NaiveDate) -> DetailTicket {
        self.issued += 1;
        DetailTicket {
            id: self.issued,
            date,
        }
    }

    /// Whether an answer for `ticket` may still be shown.
    pub fn accept(&self, ticket: &DetailTicket) -> bool {
        ticket.id == self.issued
    }
}
