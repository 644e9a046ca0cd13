use crate::animation::host::{
    FrameRequest, FrameScheduler, ManualScheduler, ObserveMode, ObserveSpec, ObserverOptions,
    VisibilityObserver, WaveComplete, WaveSurface,
};
use crate::foundation::core::CurvePoint;
use crate::foundation::random::WaveRandom;
use crate::wave::codec::parse_path;
use crate::wave::generate::{WaveConfig, generate};
use crate::wave::interpolate::interpolate;

/// Duration used by [`Sequencer::generate_new_wave`] when none is given.
pub const DEFAULT_ONE_OFF_MS: f64 = 800.0;

/// Duration used by [`Sequencer::play`] when none is configured.
pub const DEFAULT_LOOP_MS: f64 = 7500.0;

/// Observable animation state of one wave.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    /// Continuous play is active.
    pub is_animating: bool,
    /// Progress carried over from a paused transition.
    pub elapsed_ms: f64,
    /// Timestamp that corresponds to progress 0 of the running transition.
    pub start_timestamp: Option<f64>,
    pub current_path: String,
    pub target_path: String,
    pub pending_target_path: Option<String>,
    /// A single regenerate transition is running.
    pub is_generating_one_off: bool,
    /// The one outstanding frame request, if any.
    pub frame_request: Option<FrameRequest>,
}

/// Coarse phase derived from [`AnimationState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Idle, with a partially completed transition to resume.
    Paused,
    Playing,
    OneOff,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransitionKind {
    Loop,
    OneOff,
}

#[derive(Clone, Debug)]
struct Transition {
    from: Vec<CurvePoint>,
    to: Vec<CurvePoint>,
    duration_ms: f64,
    kind: TransitionKind,
}

struct Visibility {
    observer: Box<dyn VisibilityObserver>,
    mode: ObserveMode,
}

/// Frame-driven state machine that morphs a wave through current → target → pending shapes.
///
/// All mutation happens through the public methods and [`Sequencer::on_frame`], which the host
/// calls when a requested frame fires. At most one frame request is outstanding at a time.
pub struct Sequencer<S, R> {
    config: WaveConfig,
    default_duration_ms: f64,
    rng: Box<dyn WaveRandom>,
    scheduler: S,
    surface: R,
    state: AnimationState,
    transition: Option<Transition>,
    visibility: Option<Visibility>,
}

impl<S, R> Sequencer<S, R>
where
    S: FrameScheduler,
    R: WaveSurface,
{
    /// Generate the initial current and target shapes. Nothing is rendered until the host asks.
    pub fn new(config: WaveConfig, mut rng: Box<dyn WaveRandom>, scheduler: S, surface: R) -> Self {
        let current_path = generate(&config, rng.as_mut());
        let target_path = generate(&config, rng.as_mut());
        Self {
            config,
            default_duration_ms: DEFAULT_LOOP_MS,
            rng,
            scheduler,
            surface,
            state: AnimationState {
                is_animating: false,
                elapsed_ms: 0.0,
                start_timestamp: None,
                current_path,
                target_path,
                pending_target_path: None,
                is_generating_one_off: false,
                frame_request: None,
            },
            transition: None,
            visibility: None,
        }
    }

    /// Loop duration used when [`Sequencer::play`] gets no explicit duration.
    pub fn with_default_duration(mut self, duration_ms: f64) -> Self {
        self.default_duration_ms = if duration_ms.is_finite() && duration_ms > 0.0 {
            duration_ms
        } else {
            DEFAULT_LOOP_MS
        };
        self
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.is_generating_one_off {
            Phase::OneOff
        } else if self.state.is_animating {
            Phase::Playing
        } else if self.state.elapsed_ms > 0.0 {
            Phase::Paused
        } else {
            Phase::Idle
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    /// Replace the current shape, e.g. with one restored from a seed token.
    ///
    /// Ignored while a transition is running so the running blend keeps its inputs.
    pub fn set_current_path(&mut self, d: impl Into<String>) -> bool {
        if self.transition.is_some() || self.state.frame_request.is_some() {
            return false;
        }
        self.state.current_path = d.into();
        self.state.elapsed_ms = 0.0;
        self.state.start_timestamp = None;
        true
    }

    /// Render the current shape without animating.
    pub fn render_current(&mut self) {
        self.surface.set_path(&self.state.current_path);
    }

    /// Start looping through random shapes. Does nothing if already playing.
    ///
    /// A one-off regenerate that is still running keeps the frame chain, so play is refused
    /// until it finishes.
    #[tracing::instrument(skip(self))]
    pub fn play(&mut self, duration_ms: Option<f64>) {
        if self.state.is_animating {
            return;
        }
        if self.state.is_generating_one_off || self.state.frame_request.is_some() {
            tracing::debug!("play ignored while a one-off transition is running");
            return;
        }
        self.state.is_animating = true;

        let duration_ms = match duration_ms {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => self.default_duration_ms,
        };
        self.continue_loop(duration_ms);
    }

    /// Stop looping and remember how far the running transition got.
    #[tracing::instrument(skip(self))]
    pub fn pause(&mut self) {
        if !self.state.is_animating {
            return;
        }
        self.state.is_animating = false;
        if let Some(request) = self.state.frame_request.take() {
            self.scheduler.cancel_frame(request);
        }

        let now = self.scheduler.now_ms();
        if let Some(start) = self.state.start_timestamp.take() {
            self.state.elapsed_ms = (now - start).max(0.0);
        }
        self.transition = None;
    }

    /// Morph once to the target shape. Ignored while any transition is in flight.
    ///
    /// Durations below 1 ms are raised to 1 ms; `None` or a non-finite duration means 800 ms.
    #[tracing::instrument(skip(self))]
    pub fn generate_new_wave(&mut self, duration_ms: Option<f64>) {
        if self.state.is_generating_one_off
            || self.state.is_animating
            || self.state.frame_request.is_some()
        {
            return;
        }

        let duration_ms = match duration_ms {
            Some(d) if d.is_finite() => d.max(1.0),
            _ => DEFAULT_ONE_OFF_MS,
        };

        self.state.is_generating_one_off = true;
        self.state.pending_target_path = Some(self.generate());

        if !self.begin_transition(duration_ms, TransitionKind::OneOff) {
            self.state.is_generating_one_off = false;
            self.state.pending_target_path = None;
        }
    }

    /// Frame callback. `request` must be the handle returned by the scheduler; stale handles
    /// (from cancelled or superseded requests) are ignored.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) {
        if self.state.frame_request != Some(request) {
            tracing::trace!(?request, "ignoring stale frame");
            return;
        }
        self.state.frame_request = None;

        let Some(transition) = self.transition.take() else {
            return;
        };

        let start = *self
            .state
            .start_timestamp
            .get_or_insert(timestamp_ms - self.state.elapsed_ms);
        let progress = ((timestamp_ms - start) / transition.duration_ms).min(1.0);

        match interpolate(
            &transition.from,
            &transition.to,
            progress,
            self.config.vertical,
            self.config.height,
            self.config.width,
        ) {
            Ok(d) => self.surface.set_path(&d),
            Err(err) => tracing::warn!(%err, "skipping frame"),
        }

        if progress < 1.0 {
            self.transition = Some(transition);
            self.state.frame_request = Some(self.scheduler.request_frame());
            return;
        }

        self.state.elapsed_ms = 0.0;
        self.state.start_timestamp = None;
        self.complete(transition);
    }

    /// Start observing visibility. Leaving the viewport triggers [`Sequencer::generate_new_wave`].
    ///
    /// An observer that reports the environment as unsupported is dropped with a warning; the
    /// animation itself is unaffected.
    pub fn attach_visibility(&mut self, mut observer: Box<dyn VisibilityObserver>, spec: &ObserveSpec) {
        self.detach_visibility();
        match observer.observe(&ObserverOptions::from(spec)) {
            Ok(()) => {
                self.visibility = Some(Visibility {
                    observer,
                    mode: spec.mode,
                })
            }
            Err(err) => tracing::warn!(
                %err,
                "visibility observation unavailable; regeneration on visibility is disabled"
            ),
        }
    }

    pub fn is_observing_visibility(&self) -> bool {
        self.visibility.is_some()
    }

    /// Host report of a visibility transition.
    pub fn on_visibility_change(&mut self, visible: bool) {
        if visible {
            return;
        }
        let Some(mode) = self.visibility.as_ref().map(|v| v.mode) else {
            return;
        };

        self.generate_new_wave(None);

        if mode == ObserveMode::Once {
            self.detach_visibility();
        }
    }

    /// Disconnect the visibility observer, if any.
    pub fn detach_visibility(&mut self) {
        if let Some(mut v) = self.visibility.take() {
            v.observer.disconnect();
        }
    }

    fn generate(&mut self) -> String {
        generate(&self.config, self.rng.as_mut())
    }

    fn continue_loop(&mut self, duration_ms: f64) {
        if self.state.pending_target_path.is_none() {
            self.state.pending_target_path = Some(self.generate());
        }

        // A failed start regenerates both shapes, so the retry always has matching counts.
        if !self.begin_transition(duration_ms, TransitionKind::Loop)
            && !self.begin_transition(duration_ms, TransitionKind::Loop)
        {
            tracing::warn!("could not start wave loop; stopping");
            self.state.is_animating = false;
        }
    }

    /// Parse current/target and request the first frame. On a point-count mismatch both shapes
    /// are regenerated, nothing is scheduled, and `false` is returned.
    fn begin_transition(&mut self, duration_ms: f64, kind: TransitionKind) -> bool {
        let from = parse_path(&self.state.current_path);
        let to = parse_path(&self.state.target_path);

        if from.len() != to.len() || from.is_empty() {
            tracing::warn!(
                from = from.len(),
                to = to.len(),
                "point mismatch; regenerating waves"
            );
            self.state.current_path = self.generate();
            self.state.target_path = self.generate();
            return false;
        }

        tracing::debug!(?kind, duration_ms, points = from.len(), "transition start");
        self.transition = Some(Transition {
            from,
            to,
            duration_ms,
            kind,
        });
        self.state.frame_request = Some(self.scheduler.request_frame());
        true
    }

    fn complete(&mut self, transition: Transition) {
        let next_target = match self.state.pending_target_path.take() {
            Some(d) => d,
            None => self.generate(),
        };
        self.state.current_path = std::mem::replace(&mut self.state.target_path, next_target);

        match transition.kind {
            TransitionKind::Loop => {
                self.state.pending_target_path = Some(self.generate());
                if self.state.is_animating {
                    self.continue_loop(transition.duration_ms);
                }
            }
            TransitionKind::OneOff => {
                self.state.is_generating_one_off = false;
            }
        }

        self.surface.wave_complete(&WaveComplete {
            duration_ms: transition.duration_ms,
            axis: self.config.axis(),
        });
    }
}

impl<R: WaveSurface> Sequencer<ManualScheduler, R> {
    /// Advance the manual clock by `dt_ms` and fire the outstanding frame, if any.
    ///
    /// Returns `false` when no frame was pending.
    pub fn step_frame(&mut self, dt_ms: f64) -> bool {
        let Some(request) = self.scheduler.take_pending() else {
            return false;
        };
        let now = self.scheduler.advance(dt_ms);
        self.on_frame(request, now);
        true
    }
}

impl<S, R> Drop for Sequencer<S, R> {
    fn drop(&mut self) {
        if let Some(mut v) = self.visibility.take() {
            v.observer.disconnect();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sequencer.rs"]
mod tests;
