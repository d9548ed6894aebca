use crate::foundation::math::clamp01;

/// Where the controlled scroll position sits relative to a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Before the start marker.
    Before,
    /// Between the markers (inclusive).
    Active,
    /// Past the end marker.
    After,
}

/// Boundary crossing reported when the phase changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerEvent {
    /// Crossed the start moving down.
    Enter,
    /// Crossed the end moving down.
    Leave,
    /// Crossed the end moving up.
    EnterBack,
    /// Crossed the start moving up.
    LeaveBack,
}

impl TriggerEvent {
    /// Events produced by moving from phase `prev` to phase `next`, in crossing order.
    pub fn between(prev: Phase, next: Phase) -> &'static [TriggerEvent] {
        use Phase::{Active, After, Before};
        match (prev, next) {
            (Before, Active) => &[Self::Enter],
            (Before, After) => &[Self::Enter, Self::Leave],
            (Active, After) => &[Self::Leave],
            (After, Active) => &[Self::EnterBack],
            (After, Before) => &[Self::EnterBack, Self::LeaveBack],
            (Active, Before) => &[Self::LeaveBack],
            _ => &[],
        }
    }
}

/// Resolved scroll offsets during which a trigger is active.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollRange {
    /// Scroll offset where the range starts.
    pub start: f64,
    /// Scroll offset where the range ends.
    pub end: f64,
    /// Hold the region in place while active.
    pub pinned: bool,
}

impl ScrollRange {
    /// Length of the range in pixels (never negative).
    pub fn len(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// `true` for a zero-length range.
    pub fn is_empty(&self) -> bool {
        self.len() == 0.0
    }

    /// Normalized progress of `scroll` through the range, clamped to `[0, 1]`.
    ///
    /// A zero-length range steps from 0 to 1 at its start.
    pub fn progress(&self, scroll: f64) -> f64 {
        if self.is_empty() {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        clamp01((scroll - self.start) / (self.end - self.start))
    }

    /// Phase of `scroll` relative to the range.
    pub fn phase(&self, scroll: f64) -> Phase {
        if scroll < self.start {
            Phase::Before
        } else if scroll > self.end.max(self.start) {
            Phase::After
        } else {
            Phase::Active
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/range.rs"]
mod tests;
