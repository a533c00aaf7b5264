//! `GET /` and `GET /calendar` – the heatmap page, plus its JSON twin.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use chrono::NaiveDate;
use maud::{html, Markup};
use tracing::debug;

use heatmap_common::calendar::{parse_reference, DateWindow, LabelLayout, WeekAnchor, WindowMode};
use heatmap_common::config::Config;
use heatmap_common::error::HeatmapError;
use heatmap_common::grid::HeatmapGrid;
use heatmap_common::intensity::ScaleKind;
use heatmap_common::protocol::Stats;

use crate::app::AppState;
use crate::components::heatmap_grid::heatmap_grid;
use crate::components::nav::nav;
use crate::components::stats_panel::stats_panel;
use crate::components::workout_form::workout_form;
use crate::model::{ErrorBody, HeatmapResponse, ViewQuery, WorkoutForm};
use crate::pages::{error_page, shell};
use crate::server::session::lock;

/// Everything needed to draw one heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub window: DateWindow,
    pub scale: ScaleKind,
    pub layout: LabelLayout,
}

/// Merge query overrides over the configured defaults.
///
/// Empty parameters count as absent.  An explicit `mode` without an
/// `anchor` uses that mode's own anchor, not the configured one.
pub fn resolve_view(
    config: &Config,
    query: &ViewQuery,
    today: NaiveDate,
) -> Result<ViewSettings, HeatmapError> {
    fn param(v: &Option<String>) -> Option<&str> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    let reference = match param(&query.date) {
        Some(s) => parse_reference(s)?,
        None => today,
    };

    let (mode, anchor) = match param(&query.mode) {
        Some(s) => {
            let mode: WindowMode = s.parse()?;
            (mode, mode.default_anchor())
        }
        None => (config.window_mode, config.anchor()),
    };
    let anchor = match param(&query.anchor) {
        Some(s) => s.parse::<WeekAnchor>()?,
        None => anchor,
    };
    let scale = match param(&query.scale) {
        Some(s) => s.parse()?,
        None => config.scale,
    };
    let layout = match param(&query.labels) {
        Some(s) => s.parse()?,
        None => config.label_layout,
    };

    Ok(ViewSettings {
        window: DateWindow::compute_with_anchor(reference, mode, anchor)?,
        scale,
        layout,
    })
}

/// The grid and stats as they stand, plus whether the session ever loaded.
pub(crate) struct Snapshot {
    pub grid: HeatmapGrid,
    pub stats: Option<Stats>,
    pub loaded: bool,
}

/// Build the grid under the session lock and hand back owned copies, so
/// rendering happens unlocked.
pub(crate) fn snapshot(state: &AppState, view: &ViewSettings) -> Snapshot {
    let session = lock(&state.session);
    Snapshot {
        grid: session.grid(view.window.clone(), view.scale),
        stats: session.stats().cloned(),
        loaded: session.is_loaded(),
    }
}

pub(crate) fn heatmap_response(grid: &HeatmapGrid, layout: LabelLayout) -> HeatmapResponse<'_> {
    HeatmapResponse {
        title: grid.window.title(),
        labels: grid.window.month_labels(layout),
        legend: grid.legend(),
        grid,
    }
}

pub async fn calendar_page(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Response {
    match resolve_view(&state.config, &query, state.today()) {
        Ok(view) => {
            let page = render(&state, &view, &WorkoutForm::default(), None);
            Html(page.into_string()).into_response()
        }
        Err(e) => {
            debug!("Rejected view query {query:?}: {e}");
            let page = error_page(&e.to_string());
            (StatusCode::BAD_REQUEST, Html(page.into_string())).into_response()
        }
    }
}

pub async fn heatmap_json(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Response {
    let view = match resolve_view(&state.config, &query, state.today()) {
        Ok(view) => view,
        Err(e) => return ErrorBody::response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let Snapshot { grid, .. } = snapshot(&state, &view);
    Json(heatmap_response(&grid, view.layout)).into_response()
}

/// The full page for the configured view.  `banner` shows above the
/// heatmap, e.g. after a rejected form submission.
pub fn render(
    state: &AppState,
    view: &ViewSettings,
    form: &WorkoutForm,
    banner: Option<&str>,
) -> Markup {
    let Snapshot { grid, stats, loaded } = snapshot(state, view);
    debug!(
        "Rendering {} ({} active of {} days)",
        grid.window.title(),
        grid.active_days(),
        grid.window.day_count()
    );

    shell(
        &format!("Workout Heatmap – {}", grid.window.title()),
        html! {
            (nav(view.window.mode))
            main.main-content {
                @if let Some(message) = banner {
                    div.banner.banner-error role="alert" { (message) }
                }
                @if !loaded {
                    div.banner { "Workouts could not be loaded from the backend yet." }
                }
                (stats_panel(stats.as_ref()))
                (heatmap_grid(&grid, view.layout))
                (workout_form(form))
            }
            div.detail-popup-host #detailPopup hidden {}
        },
    )
}
