//! Top navigation bar component.

use maud::{html, Markup};

use heatmap_common::calendar::WindowMode;

/// Site-wide navigation bar; `current` marks the active view.
pub fn nav(current: WindowMode) -> Markup {
    html! {
        nav.nav-bar {
            div.nav-brand {
                a.nav-logo href="/" { "Workout Heatmap" }
            }
            div.nav-links {
                a.nav-link.active[current == WindowMode::RollingYear] href="/?mode=rolling-year" {
                    "Year"
                }
                a.nav-link.active[current == WindowMode::MonthGrid] href="/?mode=month-grid" {
                    "Month"
                }
            }
        }
    }
}
