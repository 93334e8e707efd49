/// Pausable progress clock of one reveal run.
///
/// All timestamps are host milliseconds (`performance.now()`-style, monotone). Pausing
/// freezes elapsed time; resuming shifts the start reference forward by the paused span so
/// progress continues exactly where it stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealClock {
    delay_ms: f64,
    duration_ms: f64,
    start_ms: Option<f64>,
    paused_at_ms: Option<f64>,
}

impl RevealClock {
    /// Unstarted clock.
    pub fn new(delay_ms: f64, duration_ms: f64) -> Self {
        let finite = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            delay_ms: finite(delay_ms),
            duration_ms: finite(duration_ms),
            start_ms: None,
            paused_at_ms: None,
        }
    }

    /// Start (or restart) the run at `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.start_ms = Some(now_ms);
        self.paused_at_ms = None;
    }

    /// Jump straight to the end of the run.
    pub fn finish(&mut self, now_ms: f64) {
        self.start_ms = Some(now_ms - self.delay_ms - self.duration_ms);
        self.paused_at_ms = None;
    }

    /// Forget the run entirely.
    pub fn reset(&mut self) {
        self.start_ms = None;
        self.paused_at_ms = None;
    }

    /// `true` once started.
    pub fn is_started(&self) -> bool {
        self.start_ms.is_some()
    }

    /// `true` while paused.
    pub fn is_paused(&self) -> bool {
        self.paused_at_ms.is_some()
    }

    /// Freeze elapsed time. No-op when unstarted or already paused.
    pub fn pause(&mut self, now_ms: f64) {
        if self.start_ms.is_some() && self.paused_at_ms.is_none() {
            self.paused_at_ms = Some(now_ms);
        }
    }

    /// Unfreeze; returns the paused span in ms (0 when not paused).
    pub fn resume(&mut self, now_ms: f64) -> f64 {
        let Some(at) = self.paused_at_ms.take() else {
            return 0.0;
        };
        let span = (now_ms - at).max(0.0);
        if let Some(start) = self.start_ms.as_mut() {
            *start += span;
        }
        span
    }

    /// Milliseconds since start, excluding paused spans.
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        let Some(start) = self.start_ms else {
            return 0.0;
        };
        let now = self.paused_at_ms.unwrap_or(now_ms);
        let e = now - start;
        if e.is_finite() { e.max(0.0) } else { 0.0 }
    }

    /// Linear progress in `[0, 1]`: 0 through the delay, exactly 1 at `delay + duration`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.start_ms.is_none() {
            return 0.0;
        }
        let t = self.elapsed(now_ms) - self.delay_ms;
        if t <= 0.0 {
            return 0.0;
        }
        if self.duration_ms <= 0.0 || t >= self.duration_ms {
            return 1.0;
        }
        t / self.duration_ms
    }

    /// Host time at which progress reaches 1, if running.
    pub fn finishes_at(&self) -> Option<f64> {
        if self.paused_at_ms.is_some() {
            return None;
        }
        self.start_ms.map(|s| s + self.delay_ms + self.duration_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/clock.rs"]
mod tests;
