use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::animation::host::RecordingSurface;
use crate::foundation::core::{Axis, Canvas};
use crate::foundation::error::{DynawaveError, DynawaveResult};
use crate::foundation::random::SeededRandom;
use crate::wave::interpolate::render_points;

type TestSequencer = Sequencer<ManualScheduler, RecordingSurface>;

fn sequencer(seed: &str) -> TestSequencer {
    Sequencer::new(
        WaveConfig::for_canvas(Canvas::WIDE, Axis::Horizontal, 6, 3.0),
        Box::new(SeededRandom::new(seed)),
        ManualScheduler::default(),
        RecordingSurface::default(),
    )
}

fn run_until_complete(seq: &mut TestSequencer, dt_ms: f64, expected: usize) {
    let mut guard = 0;
    while seq.surface().completions.len() < expected {
        assert!(seq.step_frame(dt_ms), "frame chain stalled");
        guard += 1;
        assert!(guard < 10_000);
    }
}

#[test]
fn play_renders_current_shape_first() {
    let mut seq = sequencer("first");
    let current = seq.state().current_path.clone();

    seq.play(Some(100.0));
    assert_eq!(seq.phase(), Phase::Playing);
    assert!(seq.state().pending_target_path.is_some());
    assert!(seq.step_frame(16.0));

    let first = seq.surface().last_path().unwrap();
    let p = parse_path(&current);
    assert_eq!(first, render_points(&p, false, 160.0, 1440.0));
}

#[test]
fn loop_rotates_current_target_pending() {
    let mut seq = sequencer("rotate");
    seq.play(Some(100.0));
    let old_target = seq.state().target_path.clone();
    let old_pending = seq.state().pending_target_path.clone().unwrap();

    run_until_complete(&mut seq, 16.0, 1);

    let st = seq.state();
    assert_eq!(st.current_path, old_target);
    assert_eq!(st.target_path, old_pending);
    assert!(st.pending_target_path.is_some());
    assert_ne!(st.pending_target_path.as_deref(), Some(old_pending.as_str()));

    // Last rendered frame of the cycle is the old target itself.
    assert_eq!(
        parse_path(seq.surface().last_path().unwrap()),
        parse_path(&old_target)
    );

    // The loop continues without an idle gap.
    assert_eq!(seq.phase(), Phase::Playing);
    assert!(st.frame_request.is_some());

    let ev = seq.surface().completions[0];
    assert_eq!(ev.duration_ms, 100.0);
    assert_eq!(ev.axis, Axis::Horizontal);

    run_until_complete(&mut seq, 16.0, 3);
    assert_eq!(seq.surface().completions.len(), 3);
}

#[test]
fn progress_is_monotonic_within_a_cycle() {
    let mut seq = sequencer("mono");
    seq.play(Some(200.0));
    run_until_complete(&mut seq, 7.0, 1);

    // Second control point y moves strictly toward its target or stays equal; check the
    // sequence of blended values is monotonic.
    let ys: Vec<f64> = seq
        .surface()
        .paths
        .iter()
        .map(|d| parse_path(d)[1].control.y)
        .collect();
    let rising = ys.windows(2).all(|w| w[0] <= w[1]);
    let falling = ys.windows(2).all(|w| w[0] >= w[1]);
    assert!(rising || falling);
}

#[test]
fn play_twice_is_noop() {
    let mut seq = sequencer("twice");
    seq.play(Some(100.0));
    let before = seq.state().clone();
    seq.play(Some(50.0));
    assert_eq!(seq.state(), &before);
}

#[test]
fn pause_cancels_and_resume_continues_mid_transition() {
    let mut seq = sequencer("pause");
    seq.play(Some(100.0));
    seq.step_frame(10.0); // t = 10, progress 0
    seq.step_frame(40.0); // t = 50, progress 0.4

    let request = seq.state().frame_request.unwrap();
    seq.pause();
    assert_eq!(seq.phase(), Phase::Paused);
    assert_eq!(seq.state().elapsed_ms, 40.0);
    assert_eq!(seq.state().frame_request, None);
    assert_eq!(seq.scheduler().cancelled(), &[request]);

    // Pausing again is a no-op.
    seq.pause();
    assert_eq!(seq.state().elapsed_ms, 40.0);

    seq.scheduler_mut().advance(1000.0);
    seq.play(Some(100.0));
    seq.step_frame(5.0);

    let from = parse_path(&seq.state().current_path);
    let to = parse_path(&seq.state().target_path);
    let expected = interpolate(&from, &to, 40.0 / 100.0, false, 160.0, 1440.0).unwrap();
    assert_eq!(seq.surface().last_path().unwrap(), expected);
}

#[test]
fn stale_frames_are_ignored() {
    let mut seq = sequencer("stale");
    seq.play(Some(100.0));
    let request = seq.state().frame_request.unwrap();
    seq.pause();

    seq.on_frame(request, 10.0);
    assert!(seq.surface().paths.is_empty());
}

#[test]
fn one_off_rotates_and_clears_pending() {
    let mut seq = sequencer("oneoff");
    let old_target = seq.state().target_path.clone();

    seq.generate_new_wave(None);
    assert_eq!(seq.phase(), Phase::OneOff);
    let pending = seq.state().pending_target_path.clone().unwrap();

    run_until_complete(&mut seq, 100.0, 1);

    let st = seq.state();
    assert_eq!(st.current_path, old_target);
    assert_eq!(st.target_path, pending);
    assert_eq!(st.pending_target_path, None);
    assert_eq!(st.frame_request, None);
    assert_eq!(seq.phase(), Phase::Idle);
    assert_eq!(seq.surface().completions[0].duration_ms, DEFAULT_ONE_OFF_MS);
}

#[test]
fn one_off_is_mutually_exclusive() {
    let mut seq = sequencer("exclusive");
    seq.generate_new_wave(Some(50.0));
    let before = seq.state().clone();

    seq.generate_new_wave(Some(50.0));
    assert_eq!(seq.state(), &before);

    seq.play(Some(50.0));
    assert_eq!(seq.state(), &before);

    run_until_complete(&mut seq, 10.0, 1);
    assert!(!seq.step_frame(10.0));
    assert_eq!(seq.surface().completions.len(), 1);
}

#[test]
fn one_off_refused_while_playing() {
    let mut seq = sequencer("busy");
    seq.play(Some(100.0));
    let before = seq.state().clone();
    seq.generate_new_wave(None);
    assert_eq!(seq.state(), &before);
}

#[test]
fn one_off_duration_has_floor() {
    let mut seq = sequencer("floor");
    seq.generate_new_wave(Some(0.0));
    run_until_complete(&mut seq, 5.0, 1);
    assert_eq!(seq.surface().completions[0].duration_ms, 1.0);
}

#[test]
fn one_off_non_finite_duration_uses_default() {
    for duration in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        let mut seq = sequencer("endless");
        seq.generate_new_wave(Some(duration));
        run_until_complete(&mut seq, 100.0, 1);
        assert_eq!(seq.surface().completions[0].duration_ms, DEFAULT_ONE_OFF_MS);
        assert_eq!(seq.phase(), Phase::Idle);

        seq.play(Some(50.0));
        assert_eq!(seq.phase(), Phase::Playing);
    }
}

#[test]
fn mismatch_during_play_regenerates_and_keeps_going() {
    let mut seq = sequencer("heal");
    assert!(seq.set_current_path("M 0 160 L 0 10 Q 1 2, 3 4 L 1440 160 Z"));

    seq.play(Some(100.0));
    assert_eq!(seq.phase(), Phase::Playing);
    assert!(seq.surface().paths.is_empty());
    assert!(seq.surface().completions.is_empty());
    assert_eq!(parse_path(&seq.state().current_path).len(), 6);
    assert_eq!(parse_path(&seq.state().target_path).len(), 6);

    run_until_complete(&mut seq, 25.0, 1);
}

#[test]
fn mismatch_during_one_off_returns_to_idle() {
    let mut seq = sequencer("heal-once");
    assert!(seq.set_current_path("garbage"));

    seq.generate_new_wave(None);
    assert_eq!(seq.phase(), Phase::Idle);
    assert_eq!(seq.state().frame_request, None);
    assert_eq!(seq.state().pending_target_path, None);
    assert!(seq.surface().completions.is_empty());
    assert_eq!(parse_path(&seq.state().current_path).len(), 6);

    // The regenerated pair animates normally afterwards.
    seq.generate_new_wave(Some(20.0));
    run_until_complete(&mut seq, 10.0, 1);
}

#[test]
fn set_current_path_refused_mid_transition() {
    let mut seq = sequencer("busy-set");
    seq.generate_new_wave(None);
    assert!(!seq.set_current_path("M 0 0 Z"));
}

#[derive(Clone, Default)]
struct TestObserver {
    log: Rc<RefCell<Vec<String>>>,
    unsupported: bool,
}

impl VisibilityObserver for TestObserver {
    fn observe(&mut self, options: &ObserverOptions) -> DynawaveResult<()> {
        if self.unsupported {
            return Err(DynawaveError::unsupported("no observer"));
        }
        self.log
            .borrow_mut()
            .push(format!("observe {}", options.root_margin));
        Ok(())
    }

    fn disconnect(&mut self) {
        self.log.borrow_mut().push("disconnect".to_string());
    }
}

#[test]
fn once_visibility_triggers_then_detaches() {
    let mut seq = sequencer("once");
    let observer = TestObserver::default();
    let log = observer.log.clone();
    seq.attach_visibility(Box::new(observer), &"once:10px".parse().unwrap());
    assert!(seq.is_observing_visibility());

    seq.on_visibility_change(true);
    assert_eq!(seq.phase(), Phase::Idle);

    seq.on_visibility_change(false);
    assert_eq!(seq.phase(), Phase::OneOff);
    assert!(!seq.is_observing_visibility());
    assert_eq!(*log.borrow(), vec!["observe 10px", "disconnect"]);
}

#[test]
fn continuous_visibility_keeps_observing() {
    let mut seq = sequencer("continuous");
    let observer = TestObserver::default();
    let log = observer.log.clone();
    seq.attach_visibility(Box::new(observer), &"continuous".parse().unwrap());

    seq.on_visibility_change(false);
    run_until_complete(&mut seq, 100.0, 1);
    seq.on_visibility_change(false);
    run_until_complete(&mut seq, 100.0, 2);
    assert!(seq.is_observing_visibility());

    drop(seq);
    assert_eq!(*log.borrow(), vec!["observe 0px", "disconnect"]);
}

#[test]
fn unsupported_visibility_degrades() {
    let mut seq = sequencer("headless");
    let observer = TestObserver {
        unsupported: true,
        ..TestObserver::default()
    };
    seq.attach_visibility(Box::new(observer), &"once".parse().unwrap());
    assert!(!seq.is_observing_visibility());

    seq.on_visibility_change(false);
    assert_eq!(seq.phase(), Phase::Idle);

    seq.play(Some(10.0));
    assert!(seq.step_frame(1.0));
}

#[test]
fn vertical_waves_report_vertical_axis() {
    let mut seq = Sequencer::new(
        WaveConfig::for_canvas(Canvas::TALL, Axis::Vertical, 4, 2.0),
        Box::new(SeededRandom::new("tall")),
        ManualScheduler::default(),
        RecordingSurface::default(),
    );
    seq.generate_new_wave(Some(30.0));
    run_until_complete(&mut seq, 10.0, 1);
    assert_eq!(seq.surface().completions[0].axis, Axis::Vertical);
    assert!(
        seq.surface()
            .paths
            .iter()
            .all(|d| parse_path(d).len() == 4 && d.starts_with("M 160 1440"))
    );
}
