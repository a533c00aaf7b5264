//! Heatmap grid: a date window joined with the activity map and classified.

use chrono::NaiveDate;
use serde::Serialize;

use crate::activity::ActivityMap;
use crate::calendar::{long_date, CalendarCell, DateWindow};
use crate::intensity::{Rgb, ScaleKind, MAX_BUCKET, PALETTE};

/// One classified day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub raw_value: f64,
    pub bucket: u8,
    /// Week index (column for rolling-year, row for month-grid).
    pub week: usize,
    /// Day within the anchored week (0..=6).
    pub weekday: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridCell {
    Blank,
    Day(HeatmapCell),
}

impl GridCell {
    pub fn day(&self) -> Option<&HeatmapCell> {
        match self {
            GridCell::Blank => None,
            GridCell::Day(c) => Some(c),
        }
    }
}

/// Classify every cell of `window` against `activity`.
///
/// Blanks pass through in place.  The result depends on nothing but the
/// arguments, so rebuilding with unchanged inputs yields the same cells.
pub fn build(window: &DateWindow, activity: &ActivityMap, scale: ScaleKind) -> Vec<GridCell> {
    window
        .cells
        .iter()
        .enumerate()
        .map(|(slot, cell)| match cell {
            CalendarCell::Blank => GridCell::Blank,
            CalendarCell::Day(date) => {
                let raw_value = activity.get(*date);
                GridCell::Day(HeatmapCell {
                    date: *date,
                    raw_value,
                    bucket: scale.classify(raw_value),
                    week: slot / 7,
                    weekday: slot % 7,
                })
            }
        })
        .collect()
}

/// A built grid, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapGrid {
    pub window: DateWindow,
    pub scale: ScaleKind,
    pub cells: Vec<GridCell>,
}

impl HeatmapGrid {
    pub fn build(window: DateWindow, activity: &ActivityMap, scale: ScaleKind) -> Self {
        let cells = build(&window, activity, scale);
        HeatmapGrid { window, scale, cells }
    }

    /// Cell for `date`, if it lies inside the window.
    pub fn cell(&self, date: NaiveDate) -> Option<&HeatmapCell> {
        self.window
            .slot_of(date)
            .and_then(|slot| self.cells.get(slot))
            .and_then(GridCell::day)
    }

    pub fn days(&self) -> impl Iterator<Item = &HeatmapCell> {
        self.cells.iter().filter_map(GridCell::day)
    }

    pub fn weeks(&self) -> usize {
        self.window.week_count()
    }

    pub fn active_days(&self) -> usize {
        self.days().filter(|c| c.bucket > 0).count()
    }

    pub fn color(&self, cell: &HeatmapCell) -> Rgb {
        self.scale.color(cell.raw_value)
    }

    /// Legend swatches from "less" to "more".
    pub fn legend(&self) -> Vec<Rgb> {
        match self.scale {
            ScaleKind::Continuous => (0..=MAX_BUCKET)
                .map(|i| self.scale.color(i as f64 / MAX_BUCKET as f64))
                .collect(),
            _ => PALETTE.to_vec(),
        }
    }
}

/// Hover text for a cell: the long date, then the value in the scale's unit.
pub fn tooltip(cell: &HeatmapCell, scale: ScaleKind) -> String {
    let value = if scale.is_normalized() {
        format!("Activity level: {:.0}%", cell.raw_value * 100.0)
    } else {
        format!("Duration: {} minutes", cell.raw_value)
    };
    format!("{}\n{}", long_date(cell.date), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{parse_date, WindowMode};

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_single_active_day() {
        let window = DateWindow::compute(d("2024-03-31"), WindowMode::RollingYear).unwrap();
        let activity: ActivityMap = [(d("2024-01-05"), 20.0)].into_iter().collect();
        let grid = HeatmapGrid::build(window, &activity, ScaleKind::DurationBucket);

        let cell = grid.cell(d("2024-01-05")).unwrap();
        assert_eq!(cell.bucket, 2);
        assert_eq!(cell.raw_value, 20.0);
        assert_eq!(grid.active_days(), 1);
        assert!(grid
            .days()
            .filter(|c| c.date != d("2024-01-05"))
            .all(|c| c.bucket == 0 && c.raw_value == 0.0));
    }

    #[test]
    fn test_every_day_in_window() {
        let window = DateWindow::compute(d("2024-03-31"), WindowMode::RollingYear).unwrap();
        let grid =
            HeatmapGrid::build(window.clone(), &ActivityMap::new(), ScaleKind::DurationBucket);
        assert_eq!(grid.days().count(), window.day_count());
        assert!(grid.days().all(|c| window.contains(c.date)));
        // Starts on the anchor, so the first cell sits in row 0 of week 0.
        let first = grid.days().next().unwrap();
        assert_eq!((first.week, first.weekday), (0, 0));
    }

    #[test]
    fn test_rebuild_is_identical() {
        let window = DateWindow::compute(d("2024-02-15"), WindowMode::MonthGrid).unwrap();
        let activity: ActivityMap =
            [(d("2024-02-03"), 45.0), (d("2024-02-20"), 90.0)].into_iter().collect();
        let a = build(&window, &activity, ScaleKind::DurationBucket);
        let b = build(&window, &activity, ScaleKind::DurationBucket);
        assert_eq!(a, b);
    }

    #[test]
    fn test_month_grid_blanks_pass_through() {
        let window = DateWindow::compute(d("2024-02-15"), WindowMode::MonthGrid).unwrap();
        let grid = HeatmapGrid::build(window, &ActivityMap::new(), ScaleKind::DurationBucket);
        assert!(grid.cells[..4].iter().all(|c| *c == GridCell::Blank));
        let first = grid.cell(d("2024-02-01")).unwrap();
        // Thursday in a Sunday-anchored week.
        assert_eq!((first.week, first.weekday), (0, 4));
        let last = grid.cell(d("2024-02-29")).unwrap();
        assert_eq!((last.week, last.weekday), (4, 4));
    }

    #[test]
    fn test_out_of_window_lookup() {
        let window = DateWindow::compute(d("2024-02-15"), WindowMode::MonthGrid).unwrap();
        let grid = HeatmapGrid::build(window, &ActivityMap::new(), ScaleKind::DurationBucket);
        assert!(grid.cell(d("2024-03-01")).is_none());
    }

    #[test]
    fn test_tooltips() {
        let cell = HeatmapCell {
            date: d("2024-01-06"),
            raw_value: 20.0,
            bucket: 2,
            week: 0,
            weekday: 0,
        };
        assert_eq!(
            tooltip(&cell, ScaleKind::DurationBucket),
            "Sat Jan 06 2024\nDuration: 20 minutes"
        );

        let level = HeatmapCell { raw_value: 0.5, ..cell };
        assert_eq!(
            tooltip(&level, ScaleKind::NormalizedLevel),
            "Sat Jan 06 2024\nActivity level: 50%"
        );
    }

    #[test]
    fn test_continuous_legend() {
        let window = DateWindow::compute(d("2024-02-15"), WindowMode::MonthGrid).unwrap();
        let grid = HeatmapGrid::build(window, &ActivityMap::new(), ScaleKind::Continuous);
        let legend = grid.legend();
        assert_eq!(legend.len(), 5);
        assert_eq!(legend[0], PALETTE[0]);
        assert_eq!(legend[4], PALETTE[4]);
    }
}
