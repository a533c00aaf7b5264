//! Detail popup fragment for one day.

use maud::{html, Markup};

use heatmap_common::calendar::{long_date, parse_date};
use heatmap_common::detail::{DetailResult, NO_ACTIVITIES_LABEL};

/// Popup body for the day the caller asked about.  `data-date` echoes the
/// request so the page can drop answers that arrive out of order.
pub fn detail_popup(requested: &str, result: &DetailResult) -> Markup {
    let heading = parse_date(requested)
        .map(long_date)
        .unwrap_or_else(|_| requested.to_string());

    html! {
        div.detail-popup data-date=(requested) {
            h3 { (heading) }
            @match result {
                DetailResult::Found { activity_level, activities } => {
                    p.detail-level { "Activity level: " (format!("{activity_level:.2}")) }
                    @if activities.is_empty() {
                        p.detail-empty { (NO_ACTIVITIES_LABEL) }
                    } @else {
                        ul.detail-activities {
                            @for activity in activities {
                                li { (activity) }
                            }
                        }
                    }
                },
                DetailResult::Failed { .. } => {
                    @for line in result.lines() {
                        p.error { (line) }
                    }
                },
            }
        }
    }
}
