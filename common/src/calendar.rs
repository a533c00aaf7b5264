//! Date windows for the activity heatmap.
//!
//! A [`DateWindow`] is the contiguous span of days the grid displays,
//! already aligned to week boundaries.  Two shapes exist:
//!
//! - **rolling-year**: the twelve months ending with the reference month,
//!   with the start pulled back to the week anchor so the first column is
//!   a full week.
//! - **month-grid**: a single calendar month, preceded by blank cells for
//!   the weekdays before the 1st.
//!
//! The reference date is always supplied by the caller.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::HeatmapError;

/// Wire format of a calendar date (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, HeatmapError> {
    let s = s.trim();
    // chrono accepts single-digit months/days; the key format does not.
    if s.len() != 10 {
        return Err(HeatmapError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| HeatmapError::InvalidDate(s.to_string()))
}

/// A reference date supplied as configuration (query parameter or config
/// key).  A bad value is a configuration error, not a data error.
pub fn parse_reference(s: &str) -> Result<NaiveDate, HeatmapError> {
    parse_date(s).map_err(|_| {
        HeatmapError::InvalidConfiguration(format!("invalid reference date `{}`", s.trim()))
    })
}

/// Canonical key for a date, as used by the activity map and the backend.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Human-readable date in the `Sat Jan 06 2024` style.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

// ─── Configuration enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowMode {
    RollingYear,
    MonthGrid,
}

impl WindowMode {
    /// Anchor used when none is configured.
    pub fn default_anchor(self) -> WeekAnchor {
        match self {
            WindowMode::RollingYear => WeekAnchor::Monday,
            WindowMode::MonthGrid => WeekAnchor::Sunday,
        }
    }
}

impl FromStr for WindowMode {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rolling-year" => Ok(WindowMode::RollingYear),
            "month-grid" => Ok(WindowMode::MonthGrid),
            other => Err(HeatmapError::InvalidConfiguration(format!(
                "unknown window mode `{other}` (expected rolling-year or month-grid)"
            ))),
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WindowMode::RollingYear => "rolling-year",
            WindowMode::MonthGrid => "month-grid",
        })
    }
}

/// The weekday shown in the first row/column of every week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekAnchor {
    Monday,
    Sunday,
}

impl WeekAnchor {
    /// Position of `date` within an anchored week (0..=6).
    pub fn offset(self, date: NaiveDate) -> u32 {
        match self {
            WeekAnchor::Monday => date.weekday().num_days_from_monday(),
            WeekAnchor::Sunday => date.weekday().num_days_from_sunday(),
        }
    }

    /// Short weekday names in row order.
    pub fn weekday_names(self) -> [&'static str; 7] {
        match self {
            WeekAnchor::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
            WeekAnchor::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        }
    }
}

impl FromStr for WeekAnchor {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(WeekAnchor::Monday),
            "sunday" | "sun" => Ok(WeekAnchor::Sunday),
            other => Err(HeatmapError::InvalidConfiguration(format!(
                "unknown week anchor `{other}` (expected monday or sunday)"
            ))),
        }
    }
}

impl fmt::Display for WeekAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeekAnchor::Monday => "monday",
            WeekAnchor::Sunday => "sunday",
        })
    }
}

/// How month labels are positioned above a rolling-year grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelLayout {
    /// At the week column containing the 1st of each month.
    #[default]
    DayOffset,
    /// Twelve evenly spaced slots, one per month.
    FixedSlots,
}

impl FromStr for LabelLayout {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day-offset" => Ok(LabelLayout::DayOffset),
            "fixed-slots" => Ok(LabelLayout::FixedSlots),
            other => Err(HeatmapError::InvalidConfiguration(format!(
                "unknown label layout `{other}` (expected day-offset or fixed-slots)"
            ))),
        }
    }
}

impl fmt::Display for LabelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LabelLayout::DayOffset => "day-offset",
            LabelLayout::FixedSlots => "fixed-slots",
        })
    }
}

// ─── Window ──────────────────────────────────────────────────────────────────

/// One position in the window: a padding blank or a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarCell {
    Blank,
    Day(NaiveDate),
}

impl CalendarCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarCell::Blank => None,
            CalendarCell::Day(d) => Some(*d),
        }
    }
}

/// A month caption and the grid column it sits over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub year: i32,
    pub month: u32,
    pub name: &'static str,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub reference: NaiveDate,
    pub mode: WindowMode,
    pub anchor: WeekAnchor,
    /// First real day (inclusive).
    pub start: NaiveDate,
    /// Last real day (inclusive).
    pub end: NaiveDate,
    pub cells: Vec<CalendarCell>,
}

impl DateWindow {
    /// Compute the window for `reference` using the mode's own week anchor.
    pub fn compute(reference: NaiveDate, mode: WindowMode) -> Result<Self, HeatmapError> {
        Self::compute_with_anchor(reference, mode, mode.default_anchor())
    }

    pub fn compute_with_anchor(
        reference: NaiveDate,
        mode: WindowMode,
        anchor: WeekAnchor,
    ) -> Result<Self, HeatmapError> {
        let month_start = first_of_month(reference);
        let end = last_of_month(reference)?;

        let (start, blanks) = match mode {
            WindowMode::RollingYear => {
                let first = month_start
                    .checked_sub_months(Months::new(11))
                    .ok_or_else(|| out_of_range(reference))?;
                let start = first
                    .checked_sub_days(Days::new(anchor.offset(first) as u64))
                    .ok_or_else(|| out_of_range(reference))?;
                (start, 0)
            }
            WindowMode::MonthGrid => (month_start, anchor.offset(month_start) as usize),
        };

        let mut cells = Vec::with_capacity(blanks + (end - start).num_days() as usize + 1);
        cells.extend(std::iter::repeat(CalendarCell::Blank).take(blanks));
        cells.extend(
            start
                .iter_days()
                .take_while(|d| *d <= end)
                .map(CalendarCell::Day),
        );

        Ok(DateWindow {
            reference,
            mode,
            anchor,
            start,
            end,
            cells,
        })
    }

    /// Every real day in the window, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.cells.iter().filter_map(CalendarCell::date)
    }

    pub fn day_count(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.len() - self.day_count()
    }

    /// Number of week columns (rolling-year) or week rows (month-grid).
    pub fn week_count(&self) -> usize {
        self.cells.len().div_ceil(7)
    }

    /// Cell index of `date`, counting leading blanks.
    pub fn slot_of(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        Some(self.leading_blanks() + (date - self.start).num_days() as usize)
    }

    /// Month captions for the grid header.
    pub fn month_labels(&self, layout: LabelLayout) -> Vec<MonthLabel> {
        if self.mode == WindowMode::MonthGrid {
            return vec![label(self.start, 0)];
        }

        match layout {
            LabelLayout::DayOffset => {
                let mut labels = Vec::new();
                let mut first = first_of_month(self.start);
                if first < self.start {
                    first = match first.checked_add_months(Months::new(1)) {
                        Some(d) => d,
                        None => return labels,
                    };
                }
                while first <= self.end {
                    let column = (first - self.start).num_days() as usize / 7;
                    labels.push(label(first, column));
                    first = match first.checked_add_months(Months::new(1)) {
                        Some(d) => d,
                        None => break,
                    };
                }
                labels
            }
            LabelLayout::FixedSlots => {
                let last = first_of_month(self.reference);
                (0..12u32)
                    .filter_map(|slot| {
                        last.checked_sub_months(Months::new(11 - slot))
                            .map(|first| label(first, slot as usize))
                    })
                    .collect()
            }
        }
    }

    /// Caption for the whole window, e.g. `February 2024`.
    pub fn title(&self) -> String {
        match self.mode {
            WindowMode::MonthGrid => {
                format!("{} {}", month_name(self.start.month()), self.start.year())
            }
            WindowMode::RollingYear => format!(
                "{} {} – {} {}",
                month_abbrev(self.start.month()),
                self.start.year(),
                month_abbrev(self.end.month()),
                self.end.year()
            ),
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.day0() as u64)
}

fn last_of_month(date: NaiveDate) -> Result<NaiveDate, HeatmapError> {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

fn out_of_range(reference: NaiveDate) -> HeatmapError {
    HeatmapError::InvalidConfiguration(format!(
        "date window around {reference} is outside the supported calendar range"
    ))
}

fn label(first: NaiveDate, column: usize) -> MonthLabel {
    MonthLabel {
        year: first.year(),
        month: first.month(),
        name: month_abbrev(first.month()),
        column,
    }
}

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `Jan`..`Dec` for months 1..=12.
pub fn month_abbrev(m: u32) -> &'static str {
    month_index(m).map_or("?", |i| MONTH_ABBREVS[i])
}

pub fn month_name(m: u32) -> &'static str {
    month_index(m).map_or("?", |i| MONTH_NAMES[i])
}

fn month_index(m: u32) -> Option<usize> {
    (1..=12).contains(&m).then(|| m as usize - 1)
}

// ─── tests ───────────────────────────────────────────────────────────────
