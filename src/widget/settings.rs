use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::Context as _;
use regex::Regex;

use crate::animation::host::ObserveSpec;
use crate::animation::sequencer::DEFAULT_LOOP_MS;
use crate::foundation::core::{Axis, Canvas};
use crate::foundation::error::{DynawaveError, DynawaveResult};
use crate::foundation::random::{WaveRandom, random_for_seed};
use crate::wave::generate::WaveConfig;

/// Host attribute names read by [`WaveSettings::from_attributes`].
pub mod attr {
    pub const FACE: &str = "data-wave-face";
    pub const POINTS: &str = "data-wave-points";
    pub const VARIANCE: &str = "data-wave-variance";
    /// Older spelling of [`VARIANCE`], read only when the new one is absent.
    pub const LEGACY_VARIANCE: &str = "data-variance";
    pub const SPEED: &str = "data-wave-speed";
    pub const SEED: &str = "data-wave-seed";
    pub const START_END_ZERO: &str = "data-start-end-zero";
    pub const ANIMATE: &str = "data-wave-animate";
    pub const OBSERVE: &str = "data-wave-observe";
}

pub const DEFAULT_POINT_COUNT: usize = 6;
pub const DEFAULT_VARIANCE: f64 = 3.0;

/// Canvas edge the wave faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Vertical,
            Self::Top | Self::Bottom => Axis::Horizontal,
        }
    }

    /// Mirrored horizontally when rendered.
    pub fn flip_x(self) -> bool {
        self == Self::Right
    }

    /// Mirrored vertically when rendered.
    pub fn flip_y(self) -> bool {
        self == Self::Bottom
    }

    /// Unknown names behave like `top`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Direction {
    type Err = DynawaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(DynawaveError::validation(format!(
                "unknown wave direction '{other}' (expected top, bottom, left or right)"
            ))),
        }
    }
}

/// Per-widget settings, read once when the widget attaches.
///
/// Invalid numbers never fail: they fall back to the documented defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaveSettings {
    pub direction: Direction,
    /// Anchor count, at least 2.
    pub point_count: usize,
    pub variance: f64,
    /// Loop transition duration.
    pub duration_ms: f64,
    /// Seed string for reproducible shapes; `None` for fresh randomness on every attach.
    pub seed: Option<String>,
    pub start_end_zero: bool,
    pub autoplay: bool,
    pub observe: Option<ObserveSpec>,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            direction: Direction::Top,
            point_count: DEFAULT_POINT_COUNT,
            variance: DEFAULT_VARIANCE,
            duration_ms: DEFAULT_LOOP_MS,
            seed: None,
            start_end_zero: false,
            autoplay: false,
            observe: None,
        }
    }
}

static FLOAT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("invalid float prefix regex")
});

/// Leading integer of `s` after optional whitespace and sign (`"12px"` → 12).
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let v: i64 = rest[..len].parse().ok()?;
    Some(if negative { -v } else { v })
}

/// Leading decimal number of `s` after optional whitespace (`"2.5x"` → 2.5).
fn parse_float_prefix(s: &str) -> Option<f64> {
    let m = FLOAT_PREFIX_RE.find(s.trim_start())?;
    m.as_str().parse().ok()
}

fn is_truthy_flag(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "" | "true" | "1" | "yes" | "on"
    )
}

impl WaveSettings {
    /// Read settings from host attributes. `get` returns `None` for absent attributes.
    pub fn from_attributes<'a, F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let direction = get(attr::FACE)
            .filter(|v| !v.is_empty())
            .map(Direction::parse_lenient)
            .unwrap_or_default();

        let point_count = get(attr::POINTS)
            .and_then(parse_int_prefix)
            .map(|n| n.max(2) as usize)
            .unwrap_or(DEFAULT_POINT_COUNT);

        let variance = get(attr::VARIANCE)
            .or_else(|| get(attr::LEGACY_VARIANCE))
            .and_then(parse_float_prefix)
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_VARIANCE);

        let duration_ms = get(attr::SPEED)
            .and_then(parse_float_prefix)
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_LOOP_MS);

        let seed = get(attr::SEED)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string);

        Self {
            direction,
            point_count,
            variance,
            duration_ms,
            seed,
            start_end_zero: get(attr::START_END_ZERO).is_some_and(is_truthy_flag),
            autoplay: get(attr::ANIMATE) == Some("true"),
            observe: get(attr::OBSERVE)
                .filter(|v| !v.is_empty())
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Parse settings JSON (camelCase keys, every key optional).
    pub fn from_json_str(json: &str) -> DynawaveResult<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| DynawaveError::serde(e.to_string()))?;
        Ok(settings.normalized())
    }

    /// Load a settings JSON file.
    pub fn from_path(path: &Path) -> DynawaveResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read wave settings '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Apply the same fallbacks as attribute parsing to programmatically built settings.
    pub fn normalized(mut self) -> Self {
        self.point_count = self.point_count.max(2);
        if !self.variance.is_finite() {
            self.variance = DEFAULT_VARIANCE;
        }
        if !(self.duration_ms.is_finite() && self.duration_ms > 0.0) {
            self.duration_ms = DEFAULT_LOOP_MS;
        }
        if self.seed.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.seed = None;
        }
        self
    }

    pub fn axis(&self) -> Axis {
        self.direction.axis()
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::for_axis(self.axis())
    }

    /// Generation inputs for this widget's canvas.
    pub fn wave_config(&self) -> WaveConfig {
        WaveConfig::for_canvas(self.canvas(), self.axis(), self.point_count, self.variance)
            .with_start_end_zero(self.start_end_zero)
    }

    /// Random source: seeded when a seed is configured.
    pub fn random(&self) -> Box<dyn WaveRandom> {
        random_for_seed(self.seed.as_deref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/settings.rs"]
mod tests;
