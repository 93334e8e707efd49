use crate::foundation::core::Point;

/// Upper bound on live holes; the oldest is dropped first.
pub const MAX_HOLES: usize = 64;

/// Temporary pointer-proximity region that respawns avoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hole {
    /// Center in CSS px.
    pub center: Point,
    /// Radius in CSS px.
    pub radius: f64,
    /// Timestamp (ms) after which the hole no longer applies.
    pub expires_at_ms: f64,
}

impl Hole {
    /// `true` while `now_ms` is before the expiry.
    pub fn is_active(&self, now_ms: f64) -> bool {
        now_ms < self.expires_at_ms
    }

    /// `true` when the hole is active and `p` lies strictly inside it.
    pub fn blocks(&self, p: Point, now_ms: f64) -> bool {
        self.is_active(now_ms) && (p - self.center).hypot() < self.radius
    }
}

/// Append-only hole list with lazy pruning.
#[derive(Clone, Debug, Default)]
pub struct HoleList {
    holes: Vec<Hole>,
}

impl HoleList {
    /// Append a hole, evicting the oldest past [`MAX_HOLES`].
    pub fn push(&mut self, hole: Hole) {
        if self.holes.len() >= MAX_HOLES {
            self.holes.remove(0);
        }
        self.holes.push(hole);
    }

    /// Drop expired holes.
    pub fn prune(&mut self, now_ms: f64) {
        self.holes.retain(|h| h.is_active(now_ms));
    }

    /// `true` when any active hole contains `p`.
    pub fn blocks(&self, p: Point, now_ms: f64) -> bool {
        self.holes.iter().any(|h| h.blocks(p, now_ms))
    }

    /// Most recently added hole.
    pub fn last(&self) -> Option<&Hole> {
        self.holes.last()
    }

    /// Number of retained holes, expired ones included until the next prune.
    pub fn len(&self) -> usize {
        self.holes.len()
    }

    /// `true` when no hole is retained.
    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }

    /// Forget every hole.
    pub fn clear(&mut self) {
        self.holes.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/holes.rs"]
mod tests;
