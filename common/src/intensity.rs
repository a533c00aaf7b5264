//! Intensity classification: raw day value → visual tier → colour.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HeatmapError;

/// Highest intensity bucket.
pub const MAX_BUCKET: u8 = 4;

/// Upper bounds (inclusive) of buckets 1..=3 for raw minutes.
const DURATION_STEPS: [f64; 3] = [15.0, 30.0, 60.0];

/// Upper bounds (inclusive) of buckets 1..=3 for a level in [0,1].
const LEVEL_STEPS: [f64; 3] = [0.25, 0.5, 0.75];

/// Light-to-dark green palette, indexed by bucket.
pub const PALETTE: [Rgb; 5] = [
    Rgb::new(0xeb, 0xed, 0xf0),
    Rgb::new(0x9b, 0xe9, 0xa8),
    Rgb::new(0x40, 0xc4, 0x63),
    Rgb::new(0x30, 0xa1, 0x4e),
    Rgb::new(0x21, 0x6e, 0x39),
];

/// How raw day values are interpreted and coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleKind {
    /// Raw minutes, stepped at 15/30/60.
    #[default]
    DurationBucket,
    /// Level in [0,1], stepped at quarters.
    NormalizedLevel,
    /// Level in [0,1], coloured on a continuous blend.
    Continuous,
}

impl ScaleKind {
    pub fn classify(self, raw: f64) -> u8 {
        classify(raw, self)
    }

    /// Whether raw values are expected to be levels in [0,1].
    pub fn is_normalized(self) -> bool {
        !matches!(self, ScaleKind::DurationBucket)
    }

    pub fn shade(self, raw: f64) -> Shade {
        match self {
            ScaleKind::Continuous => Shade::Level(sanitize(raw)),
            _ => Shade::Bucket(classify(raw, self)),
        }
    }

    pub fn color(self, raw: f64) -> Rgb {
        color_for(self.shade(raw))
    }
}

impl FromStr for ScaleKind {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duration-bucket" | "duration" => Ok(ScaleKind::DurationBucket),
            "normalized-level" | "normalized" => Ok(ScaleKind::NormalizedLevel),
            "continuous" => Ok(ScaleKind::Continuous),
            other => Err(HeatmapError::InvalidConfiguration(format!(
                "unknown scale `{other}` (expected duration-bucket, normalized-level or continuous)"
            ))),
        }
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScaleKind::DurationBucket => "duration-bucket",
            ScaleKind::NormalizedLevel => "normalized-level",
            ScaleKind::Continuous => "continuous",
        })
    }
}

/// Map a raw value to a bucket in `0..=MAX_BUCKET`.
///
/// Bucket 0 is reserved for "no activity".  Each bucket's upper bound is
/// inclusive.  Negative and non-finite values count as no activity.
pub fn classify(raw: f64, kind: ScaleKind) -> u8 {
    let raw = sanitize(raw);
    if raw == 0.0 {
        return 0;
    }
    let steps = match kind {
        ScaleKind::DurationBucket => &DURATION_STEPS,
        ScaleKind::NormalizedLevel | ScaleKind::Continuous => &LEVEL_STEPS,
    };
    steps
        .iter()
        .position(|upper| raw <= *upper)
        .map(|i| i as u8 + 1)
        .unwrap_or(MAX_BUCKET)
}

fn sanitize(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

// ─── Colour ──────────────────────────────────────────────────────────────────

/// An sRGB colour, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Either a discrete tier or a continuous level in [0,1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shade {
    Bucket(u8),
    Level(f64),
}

/// Colour for a bucket or a level.
///
/// Buckets above [`MAX_BUCKET`] saturate.  Levels are clamped to [0,1] and
/// blended linearly from the empty colour to the darkest one.
pub fn color_for(shade: Shade) -> Rgb {
    match shade {
        Shade::Bucket(b) => PALETTE[b.min(MAX_BUCKET) as usize],
        Shade::Level(level) => {
            let t = sanitize(level).min(1.0);
            let (lo, hi) = (PALETTE[0], PALETTE[MAX_BUCKET as usize]);
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            Rgb::new(mix(lo.r, hi.r), mix(lo.g, hi.g), mix(lo.b, hi.b))
        }
    }
}
