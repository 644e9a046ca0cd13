use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::animation::host::{ManualScheduler, ObserverOptions, RecordingSurface};
use crate::foundation::error::DynawaveResult;
use crate::widget::settings::attr;

type TestWidget = WaveWidget<ManualScheduler, RecordingSurface>;

fn attach(settings: WaveSettings, env: HostEnv) -> TestWidget {
    WaveWidget::attach(
        settings,
        HostElement::default(),
        ManualScheduler::default(),
        RecordingSurface::default(),
        None,
        env,
    )
}

fn seeded(seed: &str) -> WaveSettings {
    WaveSettings {
        seed: Some(seed.to_string()),
        ..WaveSettings::default()
    }
}

#[test]
fn attach_renders_current_shape() {
    let w = attach(seeded("attach"), HostEnv::default());
    let current = w.sequencer().state().current_path.clone();
    assert_eq!(w.sequencer().surface().last_path(), Some(current.as_str()));
    assert_eq!(parse_path(&current).len(), 6);
    assert_eq!(w.phase(), Phase::Idle);
    assert!(w.markup().contains(&current));
}

#[test]
fn seeded_widgets_match() {
    let a = attach(seeded("same"), HostEnv::default());
    let b = attach(seeded("same"), HostEnv::default());
    assert_eq!(a.sequencer().state(), b.sequencer().state());
}

#[test]
fn autoplay_respects_reduced_motion() {
    let settings = WaveSettings::from_attributes(|name| match name {
        attr::ANIMATE => Some("true"),
        attr::SPEED => Some("500"),
        _ => None,
    });

    let playing = attach(settings.clone(), HostEnv::default());
    assert_eq!(playing.phase(), Phase::Playing);

    let still = attach(
        settings,
        HostEnv {
            prefers_reduced_motion: true,
        },
    );
    assert_eq!(still.phase(), Phase::Idle);
}

#[test]
fn play_uses_configured_duration() {
    let settings = WaveSettings {
        duration_ms: 50.0,
        ..seeded("duration")
    };
    let mut w = attach(settings, HostEnv::default());
    w.play(None);
    while w.sequencer().surface().completions.is_empty() {
        assert!(w.sequencer_mut().step_frame(10.0));
    }
    assert_eq!(w.sequencer().surface().completions[0].duration_ms, 50.0);
}

#[test]
fn seed_token_restores_shape() {
    let a = attach(seeded("keep"), HostEnv::default());
    let token = a.seed_token();

    let mut b = attach(seeded("other"), HostEnv::default());
    assert!(b.restore_seed(&token));
    assert_eq!(
        b.sequencer().state().current_path,
        a.sequencer().state().current_path
    );
    assert_eq!(
        b.sequencer().surface().last_path(),
        Some(a.sequencer().state().current_path.as_str())
    );

    assert!(!b.restore_seed("%%%"));
    assert!(!b.restore_seed(&encode_seed("M 0 0 L 1 1 Z")));
}

#[test]
fn restored_shape_with_other_point_count_heals_on_play() {
    let three = attach(
        WaveSettings {
            point_count: 3,
            ..seeded("three")
        },
        HostEnv::default(),
    );
    let mut six = attach(seeded("six"), HostEnv::default());
    assert!(six.restore_seed(&three.seed_token()));

    six.play(Some(40.0));
    assert_eq!(six.phase(), Phase::Playing);
    assert_eq!(
        parse_path(&six.sequencer().state().current_path).len(),
        6
    );
}

struct FlagObserver {
    connected: Rc<Cell<bool>>,
}

impl VisibilityObserver for FlagObserver {
    fn observe(&mut self, _options: &ObserverOptions) -> DynawaveResult<()> {
        self.connected.set(true);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected.set(false);
    }
}

#[test]
fn observe_attribute_wires_visibility_and_detach_releases_it() {
    let settings = WaveSettings::from_attributes(|name| match name {
        attr::OBSERVE => Some("continuous:0px"),
        _ => None,
    });
    let connected = Rc::new(Cell::new(false));
    let mut w = WaveWidget::attach(
        settings,
        HostElement::default(),
        ManualScheduler::default(),
        RecordingSurface::default(),
        Some(Box::new(FlagObserver {
            connected: connected.clone(),
        })),
        HostEnv::default(),
    );
    assert!(connected.get());

    w.on_visibility_change(false);
    assert_eq!(w.phase(), Phase::OneOff);

    w.detach();
    assert!(!connected.get());
    assert!(!w.sequencer().is_observing_visibility());
}

#[test]
fn missing_observer_is_tolerated() {
    let settings = WaveSettings::from_attributes(|name| match name {
        attr::OBSERVE => Some("once"),
        _ => None,
    });
    let mut w = attach(settings, HostEnv::default());
    assert!(!w.sequencer().is_observing_visibility());
    w.on_visibility_change(false);
    assert_eq!(w.phase(), Phase::Idle);
}
