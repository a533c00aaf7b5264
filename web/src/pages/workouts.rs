//! Saving workouts: `POST /api/workouts` for the page script and
//! `POST /workouts` for plain form posts.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum::Form;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::components::heatmap_grid::heatmap_grid;
use crate::components::stats_panel::stats_panel;
use crate::model::{ErrorBody, SavedWorkout, ViewQuery, WorkoutForm};
use crate::pages::calendar::{heatmap_response, render, resolve_view, snapshot, Snapshot};
use crate::pages::error_page;
use crate::server::session;

/// Save a workout and answer with the redrawn heatmap and stats for the
/// view described by the query string, so the page updates in place.
pub async fn add_workout_json(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
    Form(form): Form<WorkoutForm>,
) -> Response {
    let workout = match form.to_new_workout() {
        Ok(workout) => workout,
        Err(message) => {
            debug!("Rejected workout form: {message}");
            return ErrorBody::response(StatusCode::UNPROCESSABLE_ENTITY, message);
        }
    };
    let view = match resolve_view(&state.config, &query, state.today()) {
        Ok(view) => view,
        Err(e) => return ErrorBody::response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let ack = match session::submit(&state.session, &state.backend, &workout).await {
        Ok(ack) => ack,
        Err(e) => {
            warn!("Cannot save workout: {e}");
            return ErrorBody::response(
                StatusCode::BAD_GATEWAY,
                format!("Could not save workout: {e}"),
            );
        }
    };

    let Snapshot { grid, stats, .. } = snapshot(&state, &view);
    Json(SavedWorkout {
        heatmap_html: heatmap_grid(&grid, view.layout).into_string(),
        stats_html: stats_panel(stats.as_ref()).into_string(),
        heatmap: heatmap_response(&grid, view.layout),
        stats,
        ack,
    })
    .into_response()
}

/// Fallback without the page script: valid entries redirect back to the
/// heatmap, anything else re-renders the page with the input kept.
pub async fn add_workout(
    State(state): State<AppState>,
    Form(form): Form<WorkoutForm>,
) -> Response {
    let workout = match form.to_new_workout() {
        Ok(workout) => workout,
        Err(message) => {
            debug!("Rejected workout form: {message}");
            return rerender(&state, StatusCode::UNPROCESSABLE_ENTITY, &form, &message);
        }
    };

    match session::submit(&state.session, &state.backend, &workout).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            warn!("Cannot save workout: {e}");
            rerender(
                &state,
                StatusCode::BAD_GATEWAY,
                &form,
                &format!("Could not save workout: {e}"),
            )
        }
    }
}

fn rerender(state: &AppState, status: StatusCode, form: &WorkoutForm, message: &str) -> Response {
    let page = match resolve_view(&state.config, &ViewQuery::default(), state.today()) {
        Ok(view) => render(state, &view, form, Some(message)),
        Err(e) => error_page(&e.to_string()),
    };
    (status, Html(page.into_string())).into_response()
}
