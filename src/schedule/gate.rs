//! Frame pacing: visibility gating, cancellable timeouts, resize debounce and the adaptive
//! particle update budget.

use crate::config::ScheduleConfig;

/// What the headline wants from the host's frame loop next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameRequest {
    /// Call `tick` on the next animation frame.
    NextFrame,
    /// Call `tick` once after this many milliseconds.
    After(f64),
    /// Nothing to do until the next host event.
    Idle,
}

impl FrameRequest {
    /// Prefer the more urgent of two requests.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::NextFrame, _) | (_, Self::NextFrame) => Self::NextFrame,
            (Self::After(a), Self::After(b)) => Self::After(a.min(b)),
            (Self::After(a), Self::Idle) | (Self::Idle, Self::After(a)) => Self::After(a),
            (Self::Idle, Self::Idle) => Self::Idle,
        }
    }
}

/// Page and viewport visibility signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityGate {
    intersecting: bool,
    page_visible: bool,
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self {
            intersecting: true,
            page_visible: true,
        }
    }
}

impl VisibilityGate {
    /// Continuous frames are allowed only when visible and intersecting.
    pub fn can_run(&self) -> bool {
        self.intersecting && self.page_visible
    }

    /// `true` while the element overlaps the viewport.
    pub fn intersecting(&self) -> bool {
        self.intersecting
    }

    /// `true` while the page (tab) is visible.
    pub fn page_visible(&self) -> bool {
        self.page_visible
    }

    /// Record an intersection change; returns `true` if it flipped.
    pub fn set_intersecting(&mut self, v: bool) -> bool {
        std::mem::replace(&mut self.intersecting, v) != v
    }

    /// Record a page-visibility change; returns `true` if it flipped.
    pub fn set_page_visible(&mut self, v: bool) -> bool {
        std::mem::replace(&mut self.page_visible, v) != v
    }
}

/// Named timeouts a headline can have in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Delay between completion and breathing.
    BreathStart,
    /// Next sparse render in low-power mode.
    LowPowerResume,
    /// Trailing edge of the resize debounce.
    ResizeDebounce,
}

impl TimerKind {
    const ALL: [Self; 3] = [Self::BreathStart, Self::LowPowerResume, Self::ResizeDebounce];

    fn slot(self) -> usize {
        match self {
            Self::BreathStart => 0,
            Self::LowPowerResume => 1,
            Self::ResizeDebounce => 2,
        }
    }
}

/// One deadline per [`TimerKind`]; scheduling a kind again replaces its deadline.
///
/// A held timer is disarmed but keeps its remaining time until it is released.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timers {
    due: [Option<f64>; 3],
    held: [Option<f64>; 3],
}

impl Timers {
    /// Arm `kind` to fire at `due_ms`.
    pub fn schedule(&mut self, kind: TimerKind, due_ms: f64) {
        self.due[kind.slot()] = due_ms.is_finite().then_some(due_ms);
        self.held[kind.slot()] = None;
    }

    /// Disarm `kind`, held time included.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.due[kind.slot()] = None;
        self.held[kind.slot()] = None;
    }

    /// Disarm everything.
    pub fn cancel_all(&mut self) {
        self.due = [None; 3];
        self.held = [None; 3];
    }

    /// Disarm `kind` and keep the time it had left at `now_ms`.
    pub fn hold(&mut self, kind: TimerKind, now_ms: f64) {
        if let Some(due) = self.due[kind.slot()].take() {
            self.held[kind.slot()] = Some((due - now_ms).max(0.0));
        }
    }

    /// Re-arm a held `kind` with its remaining time counted from `now_ms`.
    pub fn release(&mut self, kind: TimerKind, now_ms: f64) {
        if let Some(left) = self.held[kind.slot()].take() {
            self.schedule(kind, now_ms + left);
        }
    }

    /// `true` while `kind` is held.
    pub fn is_held(&self, kind: TimerKind) -> bool {
        self.held[kind.slot()].is_some()
    }

    /// `true` while `kind` is armed.
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.due[kind.slot()].is_some()
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.due.iter().flatten().count()
    }

    /// Disarm and return `true` if `kind` is due at `now_ms`.
    pub fn take_due(&mut self, kind: TimerKind, now_ms: f64) -> bool {
        let slot = &mut self.due[kind.slot()];
        match *slot {
            Some(due) if now_ms >= due => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Milliseconds until the earliest armed deadline. Held timers do not count.
    pub fn next_in(&self, now_ms: f64) -> Option<f64> {
        TimerKind::ALL
            .iter()
            .filter_map(|k| self.due[k.slot()])
            .map(|due| (due - now_ms).max(0.0))
            .reduce(f64::min)
    }
}

/// Smoothed frame-interval monitor that widens or narrows the particle update stride.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdaptiveBudget {
    cfg: ScheduleConfig,
    target: f64,
    budget: f64,
    ema_ms: Option<f64>,
    last_ms: Option<f64>,
}

impl AdaptiveBudget {
    /// Intervals longer than this are treated as stalls, not load.
    const STALL_MS: f64 = 250.0;
    const SMOOTHING: f64 = 0.1;
    const SHRINK: f64 = 0.85;
    const GROW: f64 = 0.05;

    /// Start at the configured `target` fraction.
    pub fn new(cfg: ScheduleConfig, target: f64) -> Self {
        let target = if target.is_finite() {
            target.clamp(cfg.min_update_budget.min(1.0), 1.0)
        } else {
            1.0
        };
        Self {
            cfg,
            target,
            budget: target,
            ema_ms: None,
            last_ms: None,
        }
    }

    /// Current fraction of the pool to integrate per frame.
    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Smoothed frame interval, once two frames have been seen.
    pub fn smoothed_interval(&self) -> Option<f64> {
        self.ema_ms
    }

    /// Drop timing history (after a pause).
    pub fn reset_clock(&mut self) {
        self.last_ms = None;
    }

    /// Feed a frame timestamp; returns the updated budget.
    pub fn observe(&mut self, now_ms: f64) -> f64 {
        let prev = self.last_ms.replace(now_ms);
        let Some(prev) = prev else {
            return self.budget;
        };
        let dt = now_ms - prev;
        if !dt.is_finite() || dt <= 0.0 || dt > Self::STALL_MS {
            return self.budget;
        }
        let ema = match self.ema_ms {
            Some(e) => e + (dt - e) * Self::SMOOTHING,
            None => dt,
        };
        self.ema_ms = Some(ema);

        let before = self.budget;
        if ema > self.cfg.slow_frame_ms {
            self.budget = (self.budget * Self::SHRINK).max(self.cfg.min_update_budget);
        } else if ema < self.cfg.fast_frame_ms {
            self.budget = (self.budget + Self::GROW).min(self.target);
        }
        if (before - self.budget).abs() > f64::EPSILON {
            tracing::trace!(ema, budget = self.budget, "update budget adjusted");
        }
        self.budget
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/gate.rs"]
mod tests;
