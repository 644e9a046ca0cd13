//! Capabilities the sequencer borrows from its host: a frame clock, a render surface and an
//! optional visibility observer. Manual implementations live here too so tools and tests can
//! drive animations without a display.

use std::convert::Infallible;
use std::str::FromStr;

use crate::foundation::core::Axis;
use crate::foundation::error::DynawaveResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameRequest(pub u64);

/// Host frame scheduler (the display refresh loop).
///
/// After `request_frame` the host must call [`crate::Sequencer::on_frame`] once with the
/// returned handle and a monotonic timestamp, unless the request is cancelled first.
pub trait FrameScheduler {
    fn now_ms(&self) -> f64;
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Payload of the completion event fired after every finished transition.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveComplete {
    pub duration_ms: f64,
    pub axis: Axis,
}

/// Where rendered frames and completion events go.
pub trait WaveSurface {
    fn set_path(&mut self, d: &str);
    fn wave_complete(&mut self, event: &WaveComplete);
}

/// When a visibility observer keeps firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserveMode {
    Once,
    Continuous,
}

/// Parsed `"mode:rootMargin"` observation setting.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserveSpec {
    pub mode: ObserveMode,
    pub root_margin: String,
}

impl FromStr for ObserveSpec {
    type Err = Infallible;

    /// Anything other than `once` observes continuously; a missing margin means `0px`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let mode = match parts.next() {
            Some("once") => ObserveMode::Once,
            _ => ObserveMode::Continuous,
        };
        let root_margin = parts.next().unwrap_or("0px").to_string();
        Ok(Self { mode, root_margin })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverOptions {
    pub root_margin: String,
    /// Fraction of the element that must be visible; `0` fires as soon as it fully leaves.
    pub threshold: f64,
}

impl From<&ObserveSpec> for ObserverOptions {
    fn from(spec: &ObserveSpec) -> Self {
        Self {
            root_margin: spec.root_margin.clone(),
            threshold: 0.0,
        }
    }
}

/// Host visibility observer. Visibility changes are reported back through
/// [`crate::Sequencer::on_visibility_change`].
pub trait VisibilityObserver {
    /// Start observing. Returns [`crate::DynawaveError::Unsupported`] when the environment has
    /// no way to observe visibility.
    fn observe(&mut self, options: &ObserverOptions) -> DynawaveResult<()>;
    fn disconnect(&mut self);
}

/// Frame scheduler driven by hand: time only moves when [`ManualScheduler::advance`] is called.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now_ms: f64,
    next_id: u64,
    pending: Option<FrameRequest>,
    cancelled: Vec<FrameRequest>,
}

impl ManualScheduler {
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    /// Move the clock forward and return the new time.
    pub fn advance(&mut self, dt_ms: f64) -> f64 {
        self.now_ms += dt_ms.max(0.0);
        self.now_ms
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Remove and return the outstanding request, as a host does right before firing it.
    pub fn take_pending(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    pub fn cancelled(&self) -> &[FrameRequest] {
        &self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
        self.cancelled.push(request);
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub paths: Vec<String>,
    pub completions: Vec<WaveComplete>,
}

impl RecordingSurface {
    pub fn last_path(&self) -> Option<&str> {
        self.paths.last().map(String::as_str)
    }
}

impl WaveSurface for RecordingSurface {
    fn set_path(&mut self, d: &str) {
        self.paths.push(d.to_string());
    }

    fn wave_complete(&mut self, event: &WaveComplete) {
        self.completions.push(*event);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/host.rs"]
mod tests;
