use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::mask::metrics::{BlockFace, FontSpec};

fn headline(env: HostEnv) -> Headline {
    let face = BlockFace::new(FontSpec::default());
    let mut cfg = RevealConfig::default();
    cfg.reveal.duration_ms = 1000.0;
    cfg.reveal.delay_ms = 0.0;
    cfg.field.count_desktop = 200;
    Headline::new("Hi\nThere", cfg, env).with_face(Box::new(face.clone()), Box::new(face))
}

fn counter(h: &mut Headline) -> Rc<Cell<u32>> {
    let fired = Rc::new(Cell::new(0));
    let f = fired.clone();
    h.set_on_complete(Box::new(move || f.set(f.get() + 1)));
    fired
}

#[test]
fn without_face_nothing_happens() {
    let mut h = Headline::new("Hi", RevealConfig::default(), HostEnv::default());
    h.on_resize(CssSize::new(300.0, 100.0), 0.0);
    assert_eq!(h.start(0.0), FrameRequest::Idle);
    assert_eq!(h.tick(16.0), FrameRequest::Idle);
    assert!(h.mask().is_none());
    assert!(h.surface().is_none());
}

#[test]
fn zero_width_defers_until_layout() {
    let mut h = headline(HostEnv::default());
    h.on_resize(CssSize::new(0.0, 100.0), 0.0);
    assert!(h.mask().is_none());
    assert_eq!(h.start(0.0), FrameRequest::Idle);
    assert_eq!(h.phase(), Phase::Idle);
    assert_eq!(h.tick(1_000.0), FrameRequest::Idle);

    h.on_resize(CssSize::new(300.0, 120.0), 2_000.0);
    assert!(h.mask().is_some());
    assert_eq!(h.phase(), Phase::Revealing);
    assert_eq!(h.progress(2_000.0), 0.0);
    assert!((h.progress(2_500.0) - 0.5).abs() < 1e-9);
    assert_eq!(h.tick(2_016.0), FrameRequest::NextFrame);
}

#[test]
fn start_before_first_size_runs_from_first_build() {
    let mut h = headline(HostEnv::default());
    let fired = counter(&mut h);
    h.start(0.0);
    assert_eq!(h.phase(), Phase::Idle);

    h.on_resize(CssSize::new(400.0, 160.0), 2_000.0);
    assert_eq!(h.phase(), Phase::Revealing);
    assert_eq!(h.progress(2_000.0), 0.0);
    h.tick(2_500.0);
    assert_eq!(fired.get(), 0);
    h.tick(3_000.0);
    assert_eq!(fired.get(), 1);
    assert_eq!(h.phase(), Phase::Complete);
}

#[test]
fn resize_is_debounced() {
    let mut h = headline(HostEnv::default());
    h.on_resize(CssSize::new(300.0, 120.0), 0.0);
    h.start(0.0);
    h.on_resize(CssSize::new(400.0, 120.0), 10.0);
    h.on_resize(CssSize::new(420.0, 120.0), 50.0);
    assert!(h.timers().is_pending(TimerKind::ResizeDebounce));
    h.tick(100.0);
    assert_eq!(h.mask().map(|m| m.css_size().width), Some(300.0));
    h.tick(140.0);
    assert_eq!(h.mask().map(|m| m.css_size().width), Some(420.0));
    assert_eq!(h.surface().map(|s| s.width()), Some(420));
    assert!(!h.timers().is_pending(TimerKind::ResizeDebounce));
    assert_eq!(h.phase(), Phase::Revealing);
}

#[test]
fn completion_schedules_breathing() {
    let mut h = headline(HostEnv::default());
    let fired = counter(&mut h);
    h.on_resize(CssSize::new(300.0, 120.0), 0.0);
    h.start(0.0);
    let mut now = 0.0;
    while now < 1000.0 {
        now += 16.0;
        h.tick(now);
    }
    assert_eq!(fired.get(), 1);
    assert_eq!(h.phase(), Phase::Complete);
    assert_eq!(h.dom_opacity(), 1.0);
    assert!(matches!(h.request(now), FrameRequest::After(_)));

    let delay = h.config().reveal.breath_start_delay_ms;
    h.tick(now + delay);
    assert_eq!(h.phase(), Phase::Breathing);
    assert!(h.breath().is_running());
    assert_eq!(fired.get(), 1);
}

#[test]
fn hover_retrigger_restarts_the_run() {
    let base = headline(HostEnv::default());
    let mut cfg = *base.config();
    cfg.reveal.retrigger_on_hover = true;
    let face = BlockFace::new(FontSpec::default());
    let mut h = Headline::new("Hi\nThere", cfg, HostEnv::default())
        .with_face(Box::new(face.clone()), Box::new(face));
    let fired = counter(&mut h);
    h.on_resize(CssSize::new(300.0, 120.0), 0.0);
    h.start(0.0);
    h.tick(1_000.0);
    h.tick(1_000.0 + cfg.reveal.breath_start_delay_ms);
    assert_eq!(h.phase(), Phase::Breathing);

    h.on_pointer_move(Point::new(50.0, 50.0), 2_000.0);
    assert_eq!(h.phase(), Phase::Revealing);
    assert_eq!(h.progress(2_000.0), 0.0);
    assert!(!h.breath().is_running());
    h.tick(3_000.0);
    assert_eq!(fired.get(), 2);
}

#[test]
fn offscreen_suspends_and_resumes() {
    let mut h = headline(HostEnv::default());
    h.on_resize(CssSize::new(300.0, 120.0), 0.0);
    h.start(0.0);
    h.tick(200.0);
    h.on_intersection_change(false, 200.0);
    assert_eq!(h.phase(), Phase::Paused);
    assert_eq!(h.tick(5_000.0), FrameRequest::Idle);
    h.on_intersection_change(true, 5_000.0);
    assert_eq!(h.phase(), Phase::Revealing);
    assert!((h.progress(5_000.0) - 0.2).abs() < 1e-9);
}

#[test]
fn hidden_tab_keeps_breathing_sparse() {
    let mut h = headline(HostEnv::default());
    h.on_resize(CssSize::new(300.0, 120.0), 0.0);
    h.start(0.0);
    h.tick(1_000.0);
    h.tick(2_000.0);
    assert_eq!(h.phase(), Phase::Breathing);
    h.on_visibility_change(false, 2_010.0);
    assert_eq!(h.phase(), Phase::Breathing);
    assert_eq!(h.tick(2_020.0), FrameRequest::After(1_000.0));
    assert!(h.timers().is_pending(TimerKind::LowPowerResume));
}

#[test]
fn paused_after_completion_stays_idle_and_keeps_breath_delay() {
    let mut h = headline(HostEnv::default());
    h.on_resize(CssSize::new(300.0, 120.0), 0.0);
    h.start(0.0);
    h.tick(1_000.0);
    assert_eq!(h.phase(), Phase::Complete);
    assert!(h.timers().is_pending(TimerKind::BreathStart));

    h.on_intersection_change(false, 1_000.0);
    assert_eq!(h.phase(), Phase::Paused);
    for now in [1_600.0, 1_601.0, 1_602.0, 1_603.0, 1_604.0, 9_000.0] {
        assert_eq!(h.tick(now), FrameRequest::Idle);
    }
    assert!(h.timers().is_held(TimerKind::BreathStart));

    let delay = h.config().reveal.breath_start_delay_ms;
    h.on_intersection_change(true, 10_000.0);
    assert_eq!(h.phase(), Phase::Complete);
    assert_eq!(h.request(10_000.0), FrameRequest::After(delay));
    h.tick(10_000.0 + delay - 1.0);
    assert_eq!(h.phase(), Phase::Complete);
    h.tick(10_000.0 + delay);
    assert_eq!(h.phase(), Phase::Breathing);
}

#[test]
fn offscreen_breathing_holds_low_power_timeout() {
    let mut h = headline(HostEnv::default());
    h.on_resize(CssSize::new(300.0, 120.0), 0.0);
    h.start(0.0);
    h.tick(1_000.0);
    h.tick(1_600.0);
    assert_eq!(h.phase(), Phase::Breathing);
    h.on_visibility_change(false, 1_610.0);
    assert_eq!(h.tick(1_620.0), FrameRequest::After(1_000.0));

    h.on_intersection_change(false, 1_700.0);
    assert_eq!(h.phase(), Phase::Paused);
    assert_eq!(h.tick(2_620.0), FrameRequest::Idle);
    assert_eq!(h.tick(4_000.0), FrameRequest::Idle);

    // back in view, tab still hidden: sparse breathing resumes where it left off
    h.on_intersection_change(true, 5_000.0);
    assert_eq!(h.phase(), Phase::Breathing);
    assert_eq!(h.request(5_000.0), FrameRequest::After(920.0));
}
