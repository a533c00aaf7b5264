//! Application state and routing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Result;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use chrono::NaiveDate;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use heatmap_common::config::Config;
use heatmap_common::detail::DetailTracker;
use heatmap_common::protocol::HealthResponse;

use crate::pages::{calendar, details, workouts, STYLE};
use crate::server::backend::BackendClient;
use crate::server::session::{SharedSession, ViewSession};

/// Shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: BackendClient,
    pub session: SharedSession,
    /// Only the newest popup lookup is answered; the page shows one popup.
    pub details: Arc<Mutex<DetailTracker>>,
    pub started: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let backend = BackendClient::new(
            &config.backend_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(AppState {
            config: Arc::new(config),
            backend,
            session: ViewSession::shared(),
            details: Arc::new(Mutex::new(DetailTracker::new())),
            started: Instant::now(),
        })
    }

    /// The configured reference date, or the local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.config
            .reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn detail_tracker(&self) -> MutexGuard<'_, DetailTracker> {
        self.details.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(calendar::calendar_page))
        .route("/calendar", get(calendar::calendar_page))
        .route("/workouts", post(workouts::add_workout))
        .route("/details/{date}", get(details::details_fragment))
        .route("/api/heatmap", get(calendar::heatmap_json))
        .route("/api/workouts", post(workouts::add_workout_json))
        .route("/api/health", get(health))
        .route("/style.css", get(stylesheet))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], STYLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::backend::mock::MockBackend;
    use crate::server::session;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use heatmap_common::calendar::parse_date;
    use tower::ServiceExt;

    async fn app(backend: &MockBackend) -> (AppState, Router) {
        let config = Config {
            backend_url: backend.spawn().await,
            reference_date: Some(parse_date("2024-03-31").unwrap()),
            ..Config::default()
        };
        let state = AppState::new(config).unwrap();
        session::load(&state.session, &state.backend).await;
        (state.clone(), router(state))
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, String) {
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get_path(router: &Router, uri: &str) -> (StatusCode, String) {
        send(router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    fn post_form(body: &str) -> Request<Body> {
        post_form_to("/workouts", body)
    }

    fn post_form_to(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_calendar_page() {
        let backend = MockBackend::with_workouts(&[
            ("2024-01-05", 10, "Run"),
            ("2024-01-05", 5, "Yoga"),
            ("2024-01-06", 45, "Ride"),
        ]);
        let (_, router) = app(&backend).await;

        let (status, html) = get_path(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("data-date=\"2023-03-27\""));
        assert!(html.contains("data-date=\"2024-03-31\""));
        assert!(!html.contains("data-date=\"2024-04-01\""));
        assert!(html.contains("calendar-day intensity-1\" data-date=\"2024-01-05\""));
        assert!(html.contains("calendar-day intensity-3\" data-date=\"2024-01-06\""));
        assert!(html.contains("Sat Jan 06 2024"));
        assert!(!html.contains("could not be loaded"));
    }

    #[tokio::test]
    async fn test_month_view_and_bad_query() {
        let backend = MockBackend::default();
        let (_, router) = app(&backend).await;

        let (status, html) = get_path(&router, "/calendar?mode=month-grid&date=2024-02-10").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("February 2024"));
        assert_eq!(html.matches("cal-cell empty").count(), 4);

        let (status, html) = get_path(&router, "/calendar?mode=weekly").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("weekly"));
    }

    #[tokio::test]
    async fn test_heatmap_json() {
        let backend = MockBackend::with_workouts(&[("2024-03-01", 90, "Ride")]);
        let (_, router) = app(&backend).await;

        let (status, body) = get_path(&router, "/api/heatmap").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["legend"].as_array().unwrap().len(), 5);
        assert_eq!(json["labels"].as_array().unwrap().len(), 12);
        let cells = json["grid"]["cells"].as_array().unwrap();
        assert_eq!(cells.len(), 371);
    }

    #[tokio::test]
    async fn test_details_fragment() {
        let backend = MockBackend::with_workouts(&[("2024-01-05", 30, "Run")]);
        let (_, router) = app(&backend).await;

        let (status, html) = get_path(&router, "/details/2024-01-05").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Fri Jan 05 2024"));
        assert!(html.contains("<li>Run</li>"));

        let (_, html) = get_path(&router, "/details/2024-01-07").await;
        assert!(html.contains("No activities recorded"));

        let (status, html) = get_path(&router, "/details/yesterday").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Could not load details"));

        backend.fail(true);
        let (status, html) = get_path(&router, "/details/2024-01-05").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Could not load details"));
    }

    #[tokio::test]
    async fn test_add_workout_updates_heatmap() {
        let backend = MockBackend::with_workouts(&[("2024-01-05", 10, "Run")]);
        let (state, router) = app(&backend).await;

        let (status, _) =
            send(&router, post_form("date=2024-01-05&duration=50&exercise_type=Ride")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        let day = parse_date("2024-01-05").unwrap();
        assert_eq!(session::lock(&state.session).activity().get(day), 60.0);

        let (_, html) = get_path(&router, "/").await;
        assert!(html.contains("calendar-day intensity-3\" data-date=\"2024-01-05\""));
    }

    #[tokio::test]
    async fn test_rejected_workouts_keep_input() {
        let backend = MockBackend::default();
        let (state, router) = app(&backend).await;

        let (status, html) =
            send(&router, post_form("date=2024-01-05&duration=abc&exercise_type=Run")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("value=\"abc\""));

        backend.fail(true);
        let (status, html) =
            send(&router, post_form("date=2024-01-05&duration=20&exercise_type=Run")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(html.contains("Could not save workout"));
        assert!(session::lock(&state.session).activity().is_empty());
    }

    #[tokio::test]
    async fn test_superseded_detail_lookup_is_dropped() {
        let backend =
            MockBackend::with_workouts(&[("2024-01-05", 30, "Run"), ("2024-01-06", 20, "Ride")]);
        backend.delay_details_for("2024-01-05");
        let (_, router) = app(&backend).await;

        let slow = tokio::spawn({
            let router = router.clone();
            async move { get_path(&router, "/details/2024-01-05").await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (status, html) = get_path(&router, "/details/2024-01-06").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<li>Ride</li>"));

        let (status, body) = slow.await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_api_workout_returns_redrawn_view() {
        let backend = MockBackend::with_workouts(&[("2024-01-05", 10, "Run")]);
        let (state, router) = app(&backend).await;

        let (status, body) = send(
            &router,
            post_form_to(
                "/api/workouts?mode=month-grid&date=2024-01-10",
                "date=2024-01-05&duration=50&exercise_type=Ride",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["ack"]["date"], "2024-01-05");
        assert_eq!(json["ack"]["duration"], 50);
        assert_eq!(json["stats"]["total_workouts"], 2);
        assert_eq!(json["heatmap"]["title"], "January 2024");

        let heatmap_html = json["heatmap_html"].as_str().unwrap();
        assert!(heatmap_html.contains("id=\"workoutCalendar\""));
        assert!(heatmap_html.contains("calendar-day intensity-3\" data-date=\"2024-01-05\""));
        let stats_html = json["stats_html"].as_str().unwrap();
        assert!(stats_html.contains("id=\"statsPanel\""));

        let day = parse_date("2024-01-05").unwrap();
        assert_eq!(session::lock(&state.session).activity().get(day), 60.0);
    }

    #[tokio::test]
    async fn test_api_workout_errors_are_json() {
        let backend = MockBackend::default();
        let (state, router) = app(&backend).await;

        let form = post_form_to("/api/workouts", "date=2024-01-05&duration=0&exercise_type=Run");
        let (status, body) = send(&router, form).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("duration"));

        backend.fail(true);
        let form = post_form_to("/api/workouts", "date=2024-01-05&duration=20&exercise_type=Run");
        let (status, body) = send(&router, form).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("Could not save workout"));
        assert!(session::lock(&state.session).activity().is_empty());
    }

    #[tokio::test]
    async fn test_page_script_saves_in_place() {
        let backend = MockBackend::default();
        let (_, router) = app(&backend).await;

        let (_, html) = get_path(&router, "/").await;
        assert!(html.contains("addEventListener('submit'"));
        assert!(html.contains("fetch('/api/workouts'"));
        assert!(html.contains("id=\"formStatus\""));
    }

    #[tokio::test]
    async fn test_health_and_style() {
        let backend = MockBackend::default();
        let (_, router) = app(&backend).await;

        let (status, body) = get_path(&router, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(health.status, "ok");

        let (status, css) = get_path(&router, "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(css.contains(".calendar-grid"));
    }
}
