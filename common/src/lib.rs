//! Heatmap Common – the workout calendar core shared by the web view.
//!
//! Everything here is pure: "today" is always passed in, never read from
//! the clock.

pub mod activity;
pub mod calendar;
pub mod config;
pub mod detail;
pub mod error;
pub mod grid;
pub mod intensity;
pub mod protocol;

pub use activity::ActivityMap;
pub use calendar::{CalendarCell, DateWindow, LabelLayout, MonthLabel, WeekAnchor, WindowMode};
pub use detail::{DetailResult, DetailTicket, DetailTracker, NO_ACTIVITIES_LABEL};
pub use error::HeatmapError;
pub use grid::{GridCell, HeatmapCell, HeatmapGrid};
pub use intensity::{classify, color_for, Rgb, ScaleKind, Shade};
