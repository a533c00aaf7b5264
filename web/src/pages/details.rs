//! `GET /details/{date}` – popup fragment for one heatmap cell.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::{debug, warn};

use heatmap_common::calendar::parse_date;
use heatmap_common::detail::DetailResult;

use crate::app::AppState;
use crate::components::detail_popup::detail_popup;

/// Lookup failures are shown inside the popup rather than as an HTTP
/// error.  An answer overtaken by a newer lookup is dropped with 204.
pub async fn details_fragment(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Response {
    let day = match parse_date(&date) {
        Ok(day) => day,
        Err(e) => return fragment(&date, &failed(e)),
    };

    let ticket = state.detail_tracker().begin(day);
    let result = match state.backend.activity_details(day).await {
        Ok(result) => result,
        Err(e) => {
            warn!("Detail lookup for {date} failed: {e}");
            failed(e)
        }
    };

    if !state.detail_tracker().accept(&ticket) {
        debug!("Dropping superseded details for {date}");
        return StatusCode::NO_CONTENT.into_response();
    }
    fragment(&date, &result)
}

fn failed(error: impl ToString) -> DetailResult {
    DetailResult::Failed {
        error: error.to_string(),
    }
}

fn fragment(date: &str, result: &DetailResult) -> Response {
    Html(detail_popup(date, result).into_string()).into_response()
}
