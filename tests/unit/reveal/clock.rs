use super::*;

#[test]
fn unstarted_clock_reports_zero() {
    let c = RevealClock::new(100.0, 1000.0);
    assert!(!c.is_started());
    assert_eq!(c.progress(5_000.0), 0.0);
    assert_eq!(c.finishes_at(), None);
}

#[test]
fn progress_is_monotone_and_lands_on_one() {
    let mut c = RevealClock::new(150.0, 2600.0);
    c.start(10.0);
    let mut last = 0.0;
    let mut now = 10.0;
    while now < 4_000.0 {
        let p = c.progress(now);
        assert!(p >= last && p <= 1.0);
        last = p;
        now += 7.3;
    }
    assert_eq!(c.progress(10.0 + 150.0), 0.0);
    assert_eq!(c.progress(10.0 + 150.0 + 2600.0), 1.0);
    assert_eq!(c.progress(1e9), 1.0);
    assert_eq!(c.finishes_at(), Some(2760.0));
}

#[test]
fn pause_resume_preserves_progress() {
    let mut c = RevealClock::new(0.0, 1000.0);
    c.start(0.0);
    c.pause(400.0);
    assert!(c.is_paused());
    assert_eq!(c.progress(9_000.0), 0.4);
    assert_eq!(c.finishes_at(), None);
    assert_eq!(c.resume(3_000.0), 2_600.0);
    assert_eq!(c.progress(3_000.0), 0.4);
    assert_eq!(c.progress(3_600.0), 1.0);
    assert_eq!(c.resume(3_700.0), 0.0);
}

#[test]
fn double_pause_keeps_first_timestamp() {
    let mut c = RevealClock::new(0.0, 1000.0);
    c.start(0.0);
    c.pause(200.0);
    c.pause(700.0);
    c.resume(1_000.0);
    assert_eq!(c.progress(1_000.0), 0.2);
}

#[test]
fn finish_and_zero_duration() {
    let mut c = RevealClock::new(50.0, 1000.0);
    c.finish(20.0);
    assert_eq!(c.progress(20.0), 1.0);

    let mut z = RevealClock::new(0.0, 0.0);
    z.start(0.0);
    assert_eq!(z.progress(0.0), 0.0);
    assert_eq!(z.progress(0.5), 1.0);

    let n = RevealClock::new(f64::NAN, f64::INFINITY);
    assert_eq!(n, RevealClock::new(0.0, 0.0));
}
