//! Statistics panel, showing the backend's numbers as they arrive.

use maud::{html, Markup};

use heatmap_common::protocol::Stats;

pub fn stats_panel(stats: Option<&Stats>) -> Markup {
    let (total, streak, most_active) = match stats {
        Some(s) => (
            s.total_workouts.to_string(),
            s.current_streak.to_string(),
            s.most_active_day_label(),
        ),
        None => ("N/A".to_string(), "N/A".to_string(), "N/A".to_string()),
    };

    html! {
        section.stats-panel #statsPanel {
            div.stat {
                span.stat-label { "Total Workouts" }
                span.stat-value #totalWorkouts { (total) }
            }
            div.stat {
                span.stat-label { "Current Streak" }
                span.stat-value #currentStreak { (streak) }
            }
            div.stat {
                span.stat-label { "Most Active Day" }
                span.stat-value #mostActiveDay { (most_active) }
            }
        }
    }
}
