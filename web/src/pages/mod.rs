//! Route handlers and the page shell they render into.

pub mod calendar;
pub mod details;
pub mod workouts;

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Stylesheet served at `/style.css`.
pub const STYLE: &str = include_str!("../../style/main.css");

/// Page script: detail popups and saving workouts without a reload.
pub const SCRIPT: &str = include_str!("../../static/heatmap.js");

/// Full HTML document around `body`.
pub fn shell(page_title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page_title) }
                link rel="stylesheet" href="/style.css";
            }
            body {
                (body)
                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}

/// Minimal page for requests that cannot be rendered at all.
pub fn error_page(message: &str) -> Markup {
    shell(
        "Workout Heatmap – error",
        html! {
            main.main-content {
                p.error { "Error: " (message) }
                a.back-link href="/" { "← Back to calendar" }
            }
        },
    )
}
