use crate::animation::host::{FrameRequest, FrameScheduler, VisibilityObserver, WaveSurface};
use crate::animation::sequencer::{Phase, Sequencer};
use crate::wave::codec::{decode_seed, encode_seed, parse_path};
use crate::widget::settings::WaveSettings;
use crate::widget::svg::{HostElement, svg_markup};

/// Facts about the host environment consulted once at attach time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostEnv {
    /// The user asked for reduced motion; autoplay is suppressed.
    pub prefers_reduced_motion: bool,
}

/// One attached wave widget: settings, host presentation attributes and the sequencer.
pub struct WaveWidget<S, R> {
    settings: WaveSettings,
    host: HostElement,
    sequencer: Sequencer<S, R>,
}

impl<S, R> WaveWidget<S, R>
where
    S: FrameScheduler,
    R: WaveSurface,
{
    /// Attach a widget: generate the first two shapes, render the current one, start visibility
    /// observation and autoplay when configured.
    ///
    /// `visibility` may be `None` when the host cannot observe visibility; a configured
    /// observation is then skipped with a warning.
    #[tracing::instrument(skip_all, fields(direction = ?settings.direction, points = settings.point_count))]
    pub fn attach(
        settings: WaveSettings,
        host: HostElement,
        scheduler: S,
        surface: R,
        visibility: Option<Box<dyn VisibilityObserver>>,
        env: HostEnv,
    ) -> Self {
        let settings = settings.normalized();
        let sequencer = Sequencer::new(settings.wave_config(), settings.random(), scheduler, surface)
            .with_default_duration(settings.duration_ms);

        let mut widget = Self {
            settings,
            host,
            sequencer,
        };
        widget.sequencer.render_current();

        if let Some(spec) = widget.settings.observe.clone() {
            match visibility {
                Some(observer) => widget.sequencer.attach_visibility(observer, &spec),
                None => tracing::warn!(
                    "visibility observation is not available in this environment; \
                     wave regeneration on visibility is disabled"
                ),
            }
        }

        if widget.settings.autoplay {
            if env.prefers_reduced_motion {
                tracing::debug!("autoplay suppressed by reduced-motion preference");
            } else {
                widget.sequencer.play(None);
            }
        }

        widget
    }

    pub fn settings(&self) -> &WaveSettings {
        &self.settings
    }

    pub fn sequencer(&self) -> &Sequencer<S, R> {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut Sequencer<S, R> {
        &mut self.sequencer
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    /// Full `<svg>` markup showing the current shape.
    pub fn markup(&self) -> String {
        svg_markup(&self.settings, &self.host, &self.sequencer.state().current_path)
    }

    pub fn play(&mut self, duration_ms: Option<f64>) {
        self.sequencer.play(duration_ms);
    }

    pub fn pause(&mut self) {
        self.sequencer.pause();
    }

    pub fn generate_new_wave(&mut self, duration_ms: Option<f64>) {
        self.sequencer.generate_new_wave(duration_ms);
    }

    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) {
        self.sequencer.on_frame(request, timestamp_ms);
    }

    pub fn on_visibility_change(&mut self, visible: bool) {
        self.sequencer.on_visibility_change(visible);
    }

    /// Token that restores the current shape through [`WaveWidget::restore_seed`].
    pub fn seed_token(&self) -> String {
        encode_seed(&self.sequencer.state().current_path)
    }

    /// Show the shape stored in `token`.
    ///
    /// Returns `false` without touching anything if the token does not decode to a path with
    /// curve segments, or if a transition is running.
    pub fn restore_seed(&mut self, token: &str) -> bool {
        let Some(d) = decode_seed(token) else {
            return false;
        };
        if parse_path(&d).is_empty() {
            return false;
        }
        if !self.sequencer.set_current_path(d) {
            return false;
        }
        self.sequencer.render_current();
        true
    }

    /// Stop animating and release the visibility observer.
    pub fn detach(&mut self) {
        self.sequencer.pause();
        self.sequencer.detach_visibility();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/instance.rs"]
mod tests;
