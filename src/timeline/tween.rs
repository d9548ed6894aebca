use crate::{
    animation::{ease::Ease, property::PropertyMap},
    foundation::core::ElementId,
};

/// Default tween duration in seconds.
pub const DEFAULT_DURATION: f64 = 0.5;

/// One declared timeline step: a property transition applied to a set of targets.
///
/// - `from_to`: both ends given.
/// - `to`: start from the value the target holds when the step begins.
/// - `from`: end at the value the target holds when the step begins.
/// - `set`: zero-duration `to`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    /// Animated elements, in stagger order.
    pub targets: Vec<ElementId>,
    /// Explicit start values.
    pub from: PropertyMap,
    /// Explicit end values.
    pub to: PropertyMap,
    /// Duration of each target's transition in seconds.
    pub duration: f64,
    /// Easing curve.
    pub ease: Ease,
    /// Delay between consecutive targets in seconds.
    pub stagger: f64,
}

impl Tween {
    fn new(targets: Vec<ElementId>, from: PropertyMap, to: PropertyMap) -> Self {
        Self {
            targets,
            from,
            to,
            duration: DEFAULT_DURATION,
            ease: Ease::default(),
            stagger: 0.0,
        }
    }

    /// Transition from explicit `from` values to explicit `to` values.
    pub fn from_to(targets: Vec<ElementId>, from: PropertyMap, to: PropertyMap) -> Self {
        Self::new(targets, from, to)
    }

    /// Transition from the current values to `to`.
    pub fn to(targets: Vec<ElementId>, to: PropertyMap) -> Self {
        Self::new(targets, PropertyMap::new(), to)
    }

    /// Transition from `from` to the current values.
    pub fn from(targets: Vec<ElementId>, from: PropertyMap) -> Self {
        Self::new(targets, from, PropertyMap::new())
    }

    /// Jump to `values` without interpolation.
    pub fn set(targets: Vec<ElementId>, values: PropertyMap) -> Self {
        Self::new(targets, PropertyMap::new(), values).duration(0.0)
    }

    /// Override the duration.
    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = secs;
        self
    }

    /// Override the ease.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Override the per-target stagger.
    pub fn stagger(mut self, secs: f64) -> Self {
        self.stagger = secs;
        self
    }

    /// Total time covered by this step: `duration + stagger * (targets - 1)`.
    pub fn span(&self) -> f64 {
        let extra = self.targets.len().saturating_sub(1) as f64;
        self.duration + self.stagger * extra
    }
}
