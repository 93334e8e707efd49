use super::*;

fn timing(duration_ms: f64, direction: FillDirection) -> RevealTiming {
    RevealTiming {
        duration_ms,
        delay_ms: 0.0,
        direction,
        ..RevealTiming::default()
    }
}

fn gate(direction: FillDirection, progress: f64) -> WaveGate {
    WaveGate {
        direction,
        ink: Some(Rect::new(100.0, 0.0, 300.0, 50.0)),
        progress,
    }
}

#[test]
fn ltr_wave_sweeps_the_ink_box() {
    assert!(!gate(FillDirection::Ltr, 0.0).admits(100.5));
    let half = gate(FillDirection::Ltr, 0.5);
    assert!(half.admits(199.0));
    assert!(!half.admits(200.0));
    assert_eq!(half.front_x(), Some(200.0));
    assert!(gate(FillDirection::Ltr, 1.0).admits(299.9));
    assert!(gate(FillDirection::Ltr, 1.0).admits(-50.0));
}

#[test]
fn rtl_and_center_waves() {
    let rtl = gate(FillDirection::Rtl, 0.25);
    assert!(rtl.admits(260.0));
    assert!(!rtl.admits(240.0));

    let center = gate(FillDirection::Center, 0.5);
    assert!(center.admits(200.0));
    assert!(center.admits(151.0));
    assert!(!center.admits(149.0));
    assert!(!center.admits(251.0));
    assert!(!gate(FillDirection::Center, 0.0).admits(200.0));
}

#[test]
fn wave_without_ink_waits_for_completion() {
    let g = WaveGate {
        direction: FillDirection::Ltr,
        ink: None,
        progress: 0.7,
    };
    assert!(!g.admits(10.0));
    assert!(WaveGate { progress: 1.0, ..g }.admits(10.0));
}

#[test]
fn dom_opacity_fades_over_trailing_range() {
    assert_eq!(dom_opacity(0.0, 0.83), 0.0);
    assert_eq!(dom_opacity(0.83, 0.83), 0.0);
    assert_eq!(dom_opacity(1.0, 0.83), 1.0);
    let mid = dom_opacity(0.915, 0.83);
    assert!(mid > 0.5 && mid < 1.0, "ease-out is ahead of linear: {mid}");
    assert_eq!(dom_opacity(0.5, 1.0), 0.0);
    assert_eq!(dom_opacity(1.0, 1.0), 1.0);
}

#[test]
fn residue_and_density_ramps() {
    assert_eq!(residue_keep(0.5, 0.9), 1.0);
    assert!((residue_keep(0.95, 0.9) - 0.5).abs() < 1e-9);
    assert_eq!(residue_keep(1.0, 0.9), 0.0);

    assert_eq!(density(0.0, 0.35), 0.35);
    assert!((density(0.5, 0.35) - 1.0).abs() < 1e-12);
    assert!((density(0.9, 0.35) - 1.0).abs() < 1e-12);
}

#[test]
fn frame_parameters_follow_eased_progress() {
    let mut d = RevealDirector::new(timing(1000.0, FillDirection::Ltr));
    let idle = d.frame(0.0, None);
    assert_eq!(idle.dom_opacity, 0.0);
    assert_eq!(idle.tile_size_px, d.timing().tile_start_px);

    d.start(0.0);
    let end = d.frame(1000.0, None);
    assert_eq!(end.tile_size_px, d.timing().tile_end_px);
    assert_eq!(end.dom_opacity, 1.0);
    assert_eq!(end.color_mix(1.0), 0.0);

    let early = d.frame(100.0, None);
    assert!(early.color_mix(1.0) > 0.0);
    assert!(early.draws(0, 100));
    assert!(!early.draws(99, 100));
    assert!(!early.draws(0, 0));
}

#[test]
fn completion_fires_once_per_run() {
    let mut d = RevealDirector::new(timing(1000.0, FillDirection::Ltr));
    d.start(0.0);
    assert_eq!(d.update(500.0), None);
    assert_eq!(d.update(1000.0), Some(DirectorEvent::Completed));
    assert_eq!(d.phase(), Phase::Complete);
    assert_eq!(d.update(1100.0), None);
    assert_eq!(d.finish(1200.0), None);
    assert!(d.enter_breathing());
    assert_eq!(d.progress(5_000.0), 1.0);

    d.start(2_000.0);
    assert_eq!(d.runs(), 2);
    assert_eq!(d.progress(2_000.0), 0.0);
    assert_eq!(d.update(3_000.0), Some(DirectorEvent::Completed));
}

#[test]
fn pause_freezes_phase_and_progress() {
    let mut d = RevealDirector::new(timing(1000.0, FillDirection::Ltr));
    d.pause(0.0);
    assert_eq!(d.phase(), Phase::Idle);

    d.start(0.0);
    d.pause(250.0);
    assert_eq!(d.phase(), Phase::Paused);
    assert_eq!(d.paused_from(), Some(Phase::Revealing));
    assert_eq!(d.update(10_000.0), None);
    assert_eq!(d.progress(10_000.0), 0.25);
    d.resume(10_000.0);
    assert_eq!(d.phase(), Phase::Revealing);
    assert_eq!(d.progress(10_250.0), 0.5);
    assert!(!d.enter_breathing());
}

#[test]
fn finish_from_idle_completes_immediately() {
    let mut d = RevealDirector::new(RevealTiming::default());
    assert_eq!(d.finish(0.0), Some(DirectorEvent::Completed));
    assert_eq!(d.progress(0.0), 1.0);
    assert_eq!(d.frame(0.0, None).dom_opacity, 1.0);
    d.stop();
    assert_eq!(d.phase(), Phase::Idle);
}
