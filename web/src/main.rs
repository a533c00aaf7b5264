//! Server entry-point – Axum + maud.
//!
//! Usage: `heatmap-web [config-path]`.  The path may also come from
//! `HEATMAP_CONFIG`; without either, `/etc/heatmap/heatmap.conf` is read
//! when it exists.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use heatmap_common::config::{self, Config};
use heatmap_web::app::{router, AppState};
use heatmap_web::server::session;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

#[tokio::main]
async fn main() -> Result<()> {
    // ── Tracing ──────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heatmap_web=info,tower_http=info".into()),
        )
        .init();

    // ── Configuration ────────────────────────────────────────────────────
    let config = load_config()?;
    info!(
        "Heatmap view: backend={}, mode={}, scale={}",
        config.backend_url, config.window_mode, config.scale
    );
    let addr = config.listen_addr.clone();

    // ── Signal handling ──────────────────────────────────────────────────
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        SHUTDOWN.store(true, Ordering::Relaxed);
    })
    .context("Cannot set signal handler")?;

    // ── Initial load ─────────────────────────────────────────────────────
    let state = AppState::new(config)?;
    if !session::load(&state.session, &state.backend).await {
        warn!("Starting with an incomplete view; the backend can be reached later");
    }

    // ── Serve ────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    info!("Heatmap Web listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("Server error")?;

    info!("Heatmap Web stopped");
    Ok(())
}

/// Explicit paths must exist; the default path is optional.
fn load_config() -> Result<Config> {
    let explicit = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("HEATMAP_CONFIG").ok())
        .map(PathBuf::from);

    match explicit {
        Some(path) => config::load(&path),
        None => {
            let path = PathBuf::from(Config::default_path());
            if path.exists() {
                config::load(&path)
            } else {
                warn!("No config at {}, using defaults", path.display());
                Ok(Config::default())
            }
        }
    }
}

async fn wait_for_shutdown() {
    while !SHUTDOWN.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}
