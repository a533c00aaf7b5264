//! Heatmap grid component – a rolling year of week columns or a single
//! month, coloured by intensity.

use chrono::Datelike;
use maud::{html, Markup};

use heatmap_common::calendar::{date_key, LabelLayout, WindowMode};
use heatmap_common::grid::{tooltip, GridCell, HeatmapCell, HeatmapGrid};

pub fn heatmap_grid(grid: &HeatmapGrid, layout: LabelLayout) -> Markup {
    html! {
        div.heatmap #workoutCalendar {
            @match grid.window.mode {
                WindowMode::RollingYear => { (year_grid(grid, layout)) },
                WindowMode::MonthGrid => { (month_grid(grid)) },
            }
            (legend(grid))
        }
    }
}

/// Weeks as columns, weekdays as rows, month captions on top.
fn year_grid(grid: &HeatmapGrid, layout: LabelLayout) -> Markup {
    let labels = grid.window.month_labels(layout);
    let names = grid.window.anchor.weekday_names();
    let labels_class = match layout {
        LabelLayout::DayOffset => "month-labels by-week",
        LabelLayout::FixedSlots => "month-labels by-slot",
    };

    html! {
        div.calendar-wrapper style=(format!("--weeks: {}", grid.weeks())) {
            h2.calendar-title { (grid.window.title()) }
            div class=(labels_class) {
                @for label in &labels {
                    div.month-label style=(label_style(layout, label.column)) { (label.name) }
                }
            }
            div.calendar-content {
                div.day-labels {
                    // Every other weekday, each spanning two rows.
                    @for (row, name) in names.iter().enumerate().step_by(2).take(3) {
                        div.day-label style=(format!("grid-row: {} / span 2", row + 1)) { (name) }
                    }
                }
                div.calendar-grid {
                    @for cell in grid.days() {
                        (day_cell(grid, cell, placement(cell), html! {}))
                    }
                }
            }
        }
    }
}

/// Classic month calendar: weekday header, leading blanks, numbered days.
fn month_grid(grid: &HeatmapGrid) -> Markup {
    html! {
        div.calendar {
            div.cal-header {
                h2 { (grid.window.title()) }
            }
            div.cal-weekdays {
                @for name in grid.window.anchor.weekday_names() {
                    span { (name) }
                }
            }
            div.cal-grid {
                @for cell in &grid.cells {
                    @match cell {
                        GridCell::Blank => { div.cal-cell.empty {} },
                        GridCell::Day(day) => {
                            (day_cell(grid, day, String::new(), html! {
                                span.cal-day-num { (day.date.day()) }
                            }))
                        },
                    }
                }
            }
        }
    }
}

fn placement(cell: &HeatmapCell) -> String {
    format!("grid-row: {}; grid-column: {};", cell.weekday + 1, cell.week + 1)
}

fn label_style(layout: LabelLayout, column: usize) -> String {
    match layout {
        LabelLayout::DayOffset => format!("grid-column-start: {}", column + 1),
        // The slot container is a fixed 12-column grid.
        LabelLayout::FixedSlots => format!("grid-column: {} / span 1", column + 1),
    }
}

fn day_cell(grid: &HeatmapGrid, cell: &HeatmapCell, placement: String, content: Markup) -> Markup {
    let style = format!("{placement} background-color: {};", grid.color(cell));
    html! {
        div class={ "calendar-day intensity-" (cell.bucket) }
            data-date=(date_key(cell.date))
            data-value=(cell.raw_value)
            title=(tooltip(cell, grid.scale))
            style=(style.trim_start()) {
            (content)
        }
    }
}

fn legend(grid: &HeatmapGrid) -> Markup {
    html! {
        div.calendar-legend {
            span { "Less" }
            @for color in grid.legend() {
                div.legend-item style=(format!("background-color: {color};")) {}
            }
            span { "More" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_common::calendar::{parse_date, DateWindow};
    use heatmap_common::intensity::ScaleKind;
    use heatmap_common::ActivityMap;

    fn grid(reference: &str, mode: WindowMode) -> HeatmapGrid {
        let window = DateWindow::compute(parse_date(reference).unwrap(), mode).unwrap();
        let activity: ActivityMap =
            [(parse_date("2024-02-05").unwrap(), 75.0)].into_iter().collect();
        HeatmapGrid::build(window, &activity, ScaleKind::DurationBucket)
    }

    #[test]
    fn test_year_grid_markup() {
        let year = grid("2024-03-31", WindowMode::RollingYear);
        let html = heatmap_grid(&year, LabelLayout::DayOffset).into_string();
        assert!(html.contains(r#"class="calendar-day intensity-4" data-date="2024-02-05""#));
        assert_eq!(html.matches(r#"class="month-label""#).count(), 12);
        assert!(html.contains(">Mon<") && html.contains(">Wed<") && html.contains(">Fri<"));
        assert!(!html.contains(">Tue<"));
        assert_eq!(html.matches("legend-item").count(), 5);
    }

    #[test]
    fn test_month_grid_markup() {
        let month = grid("2024-02-15", WindowMode::MonthGrid);
        let html = heatmap_grid(&month, LabelLayout::DayOffset).into_string();
        assert_eq!(html.matches(r#"class="cal-cell empty""#).count(), 4);
        assert_eq!(html.matches(r#"data-date="2024-02-"#).count(), 29);
        assert!(html.contains("February 2024"));
    }
}
