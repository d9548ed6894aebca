use crate::{
    foundation::{
        error::{StageError, StageResult},
        math::damp,
    },
    scroll::lock::ScrollLock,
};

/// Smoothing options.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmoothScrollOpts {
    /// Fraction of the remaining distance covered per 60 Hz frame, in `(0, 1]`.
    pub lerp: f64,
    /// Multiplier applied to wheel deltas.
    pub wheel_multiplier: f64,
}

impl Default for SmoothScrollOpts {
    fn default() -> Self {
        Self {
            lerp: 0.08,
            wheel_multiplier: 1.0,
        }
    }
}

impl SmoothScrollOpts {
    /// Check option ranges.
    pub fn validate(&self) -> StageResult<()> {
        if !(self.lerp > 0.0 && self.lerp <= 1.0) {
            return Err(StageError::validation("smooth scroll lerp must be in (0, 1]"));
        }
        if !self.wheel_multiplier.is_finite() {
            return Err(StageError::validation(
                "smooth scroll wheel multiplier must be finite",
            ));
        }
        Ok(())
    }
}

/// Direction of the last scroll movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollDirection {
    /// Toward the end of the page.
    #[default]
    Down,
    /// Toward the top of the page.
    Up,
}

/// Result of one smoothing step.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollFrame {
    /// Smoothed scroll offset.
    pub position: f64,
    /// Offset change during this step.
    pub velocity: f64,
    /// Direction of the last movement.
    pub direction: ScrollDirection,
    /// `true` while still approaching the target.
    pub moving: bool,
}

/// Eased scroll position driven by raw wheel deltas.
///
/// Raw input moves a target; each [`tick`](Self::tick) moves the animated position toward the
/// target with frame-rate independent exponential damping.
#[derive(Clone, Debug)]
pub struct SmoothScroll {
    opts: SmoothScrollOpts,
    lock: ScrollLock,
    target: f64,
    animated: f64,
    limit: f64,
    direction: ScrollDirection,
}

impl SmoothScroll {
    /// Start at offset zero with scrolling limited to `[0, limit]`.
    pub fn new(opts: SmoothScrollOpts, limit: f64) -> StageResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            lock: ScrollLock::new(),
            target: 0.0,
            animated: 0.0,
            limit: limit.max(0.0),
            direction: ScrollDirection::Down,
        })
    }

    /// Handle shared with whoever needs to suspend scrolling.
    pub fn lock(&self) -> &ScrollLock {
        &self.lock
    }

    /// Current smoothed offset.
    pub fn position(&self) -> f64 {
        self.animated
    }

    /// Offset the smoothed position is heading to.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Maximum offset.
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Change the maximum offset, clamping the current state.
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        self.target = self.target.clamp(0.0, self.limit);
        self.animated = self.animated.clamp(0.0, self.limit);
    }

    /// Feed a raw wheel delta. Ignored while scrolling is locked.
    pub fn on_wheel(&mut self, delta: f64) {
        if self.lock.is_locked() || !delta.is_finite() {
            return;
        }
        self.target = (self.target + delta * self.opts.wheel_multiplier).clamp(0.0, self.limit);
    }

    /// Scroll to `offset`, either smoothly or immediately. Ignored while locked.
    pub fn scroll_to(&mut self, offset: f64, immediate: bool) {
        if self.lock.is_locked() || !offset.is_finite() {
            return;
        }
        self.target = offset.clamp(0.0, self.limit);
        if immediate {
            self.update_direction(self.target - self.animated);
            self.animated = self.target;
        }
    }

    fn update_direction(&mut self, delta: f64) {
        if delta > 0.0 {
            self.direction = ScrollDirection::Down;
        } else if delta < 0.0 {
            self.direction = ScrollDirection::Up;
        }
    }

    /// Advance the smoothed position by `dt` seconds.
    ///
    /// While locked the position freezes where it is and any pending target is dropped.
    pub fn tick(&mut self, dt: f64) -> ScrollFrame {
        if self.lock.is_locked() {
            self.target = self.animated;
            return ScrollFrame {
                position: self.animated,
                velocity: 0.0,
                direction: self.direction,
                moving: false,
            };
        }
        let before = self.animated;
        let mut next = damp(self.animated, self.target, self.opts.lerp * 60.0, dt.max(0.0));
        if (next - self.target).abs() < 0.5 {
            next = self.target;
        }
        self.animated = next;
        let velocity = next - before;
        self.update_direction(velocity);
        ScrollFrame {
            position: next,
            velocity,
            direction: self.direction,
            moving: next != self.target,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/smooth.rs"]
mod tests;
