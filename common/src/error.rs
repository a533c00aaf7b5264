//! Error type for the calendar core.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeatmapError {
    /// Unknown mode/scale/anchor spelling, an unusable reference date, or a
    /// window that falls outside the representable date range.  Fatal to
    /// the render that asked for it.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
}
