use super::*;

#[test]
fn merge_prefers_urgency() {
    use FrameRequest::*;
    assert_eq!(Idle.merge(NextFrame), NextFrame);
    assert_eq!(After(50.0).merge(After(20.0)), After(20.0));
    assert_eq!(Idle.merge(After(5.0)), After(5.0));
    assert_eq!(Idle.merge(Idle), Idle);
}

#[test]
fn gate_needs_both_signals() {
    let mut g = VisibilityGate::default();
    assert!(g.can_run());
    assert!(g.set_intersecting(false));
    assert!(!g.set_intersecting(false));
    assert!(!g.can_run());
    g.set_intersecting(true);
    g.set_page_visible(false);
    assert!(!g.can_run());
    assert!(g.intersecting() && !g.page_visible());
}

#[test]
fn timers_fire_once_and_cancel() {
    let mut t = Timers::default();
    t.schedule(TimerKind::BreathStart, 600.0);
    t.schedule(TimerKind::ResizeDebounce, 90.0);
    assert_eq!(t.pending(), 2);
    assert_eq!(t.next_in(50.0), Some(40.0));
    assert!(!t.take_due(TimerKind::ResizeDebounce, 89.0));
    assert!(t.take_due(TimerKind::ResizeDebounce, 90.0));
    assert!(!t.take_due(TimerKind::ResizeDebounce, 1_000.0));

    t.schedule(TimerKind::BreathStart, 700.0);
    assert_eq!(t.next_in(100.0), Some(600.0));
    t.schedule(TimerKind::LowPowerResume, f64::NAN);
    assert!(!t.is_pending(TimerKind::LowPowerResume));

    t.cancel_all();
    assert_eq!(t.pending(), 0);
    assert_eq!(t.next_in(0.0), None);
    assert!(!t.take_due(TimerKind::BreathStart, 1e9));
}

#[test]
fn held_timers_are_silent_and_resume_with_remaining_time() {
    let mut t = Timers::default();
    t.schedule(TimerKind::BreathStart, 1500.0);
    t.hold(TimerKind::BreathStart, 1000.0);
    assert!(t.is_held(TimerKind::BreathStart));
    assert!(!t.is_pending(TimerKind::BreathStart));
    assert_eq!(t.next_in(9000.0), None);
    assert!(!t.take_due(TimerKind::BreathStart, 9000.0));

    t.release(TimerKind::BreathStart, 9000.0);
    assert!(!t.is_held(TimerKind::BreathStart));
    assert_eq!(t.next_in(9000.0), Some(500.0));
    assert!(!t.take_due(TimerKind::BreathStart, 9499.0));
    assert!(t.take_due(TimerKind::BreathStart, 9500.0));

    // releasing something never held is a no-op; cancel drops held time
    t.release(TimerKind::LowPowerResume, 0.0);
    assert!(!t.is_pending(TimerKind::LowPowerResume));
    t.schedule(TimerKind::LowPowerResume, 10.0);
    t.hold(TimerKind::LowPowerResume, 5.0);
    t.cancel(TimerKind::LowPowerResume);
    t.release(TimerKind::LowPowerResume, 100.0);
    assert!(!t.is_pending(TimerKind::LowPowerResume));
}

#[test]
fn slow_frames_shrink_budget_to_floor() {
    let cfg = ScheduleConfig::default();
    let mut b = AdaptiveBudget::new(cfg, 1.0);
    let mut now = 0.0;
    for _ in 0..200 {
        now += 40.0;
        b.observe(now);
    }
    assert_eq!(b.budget(), cfg.min_update_budget);

    for _ in 0..400 {
        now += 16.0;
        b.observe(now);
    }
    assert_eq!(b.budget(), 1.0);
}

#[test]
fn stalls_are_ignored() {
    let mut b = AdaptiveBudget::new(ScheduleConfig::default(), 0.8);
    b.observe(0.0);
    b.observe(5_000.0);
    assert_eq!(b.smoothed_interval(), None);
    assert_eq!(b.budget(), 0.8);
    b.reset_clock();
    b.observe(9_000.0);
    b.observe(9_016.0);
    assert_eq!(b.smoothed_interval(), Some(16.0));
}
