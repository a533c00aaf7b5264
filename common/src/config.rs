//! Configuration parsing – reads a KEY=VALUE file (`heatmap.conf`).
//!
//! Lines starting with `#` are comments, values may be double-quoted and
//! unknown keys are ignored.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::calendar::{parse_date, LabelLayout, WeekAnchor, WindowMode};
use crate::intensity::ScaleKind;

/// Settings for the web view.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // ── network ──────────────────────────────────────────────────────
    /// Base URL of the workout backend.
    pub backend_url: String,
    /// Address the view listens on.
    pub listen_addr: String,
    pub request_timeout_secs: u64,

    // ── heatmap ──────────────────────────────────────────────────────
    pub window_mode: WindowMode,
    pub scale: ScaleKind,
    /// `None` uses the window mode's own anchor.
    pub week_anchor: Option<WeekAnchor>,
    pub label_layout: LabelLayout,
    /// Fixed "today"; `None` means the local date at render time.
    pub reference_date: Option<NaiveDate>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: "http://127.0.0.1:5000".into(),
            listen_addr: "0.0.0.0:3000".into(),
            request_timeout_secs: 10,
            window_mode: WindowMode::RollingYear,
            scale: ScaleKind::DurationBucket,
            week_anchor: None,
            label_layout: LabelLayout::DayOffset,
            reference_date: None,
        }
    }
}

impl Config {
    /// Default config path.
    pub fn default_path() -> &'static str {
        "/etc/heatmap/heatmap.conf"
    }

    pub fn anchor(&self) -> WeekAnchor {
        self.week_anchor
            .unwrap_or_else(|| self.window_mode.default_anchor())
    }
}

/// Load a `KEY=VALUE` configuration file.
pub fn load(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read config: {}", path.display()))?;
    let config = from_str(&text).with_context(|| format!("Bad config: {}", path.display()))?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Build a [`Config`] from file contents.  Missing keys take defaults;
/// enum-valued keys with unknown spellings are errors.
pub fn from_str(text: &str) -> Result<Config> {
    let map = parse_conf(text);
    let get = |key: &str| -> Option<String> { map.get(key).filter(|v| !v.is_empty()).cloned() };

    let defaults = Config::default();
    let mut config = Config {
        backend_url: get("BACKEND_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.backend_url),
        listen_addr: get("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
        request_timeout_secs: get("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.request_timeout_secs),
        ..defaults
    };

    if let Some(v) = get("WINDOW_MODE") {
        config.window_mode = v.parse()?;
    }
    if let Some(v) = get("SCALE") {
        config.scale = v.parse()?;
    }
    if let Some(v) = get("WEEK_ANCHOR") {
        config.week_anchor = Some(v.parse()?);
    }
    if let Some(v) = get("LABEL_LAYOUT") {
        config.label_layout = v.parse()?;
    }
    if let Some(v) = get("REFERENCE_DATE") {
        config.reference_date = Some(parse_date(&v).context("REFERENCE_DATE")?);
    }

    Ok(config)
}

/// Parse `KEY=VALUE` lines into a map, stripping optional double-quotes.
fn parse_conf(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            let key = key.trim();
            let val = val.trim().trim_matches('"');
            map.insert(key.to_string(), val.to_string());
        }
    }
    map
}

// ─── tests ───────────────────────────────────────────────────────────────
