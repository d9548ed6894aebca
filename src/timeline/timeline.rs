use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::{
        ease::Ease,
        property::{Property, PropertyMap, coerce_map},
        value::Value,
    },
    foundation::{
        core::ElementId,
        error::{StageError, StageResult},
        math::clamp01,
    },
    timeline::{
        position::{Cursor, Position},
        tween::Tween,
    },
};

/// How overlapping steps that write the same property of the same target are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlapPolicy {
    /// Among the steps animating at `t`, the one declared last wins. Between windows, the step
    /// that ended last holds its end value.
    #[default]
    LastDeclared,
    /// Among the steps that have started, the one that started last wins (ties: declared last).
    LatestStart,
}

/// Resolved property values per element.
pub type StyleFrame = BTreeMap<ElementId, PropertyMap>;

/// Time window covered by one declared step (including its stagger).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepSpan {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

#[derive(Clone, Debug)]
struct Segment {
    start: f64,
    duration: f64,
    from: Value,
    to: Value,
    ease: Ease,
    order: usize,
}

impl Segment {
    fn end(&self) -> f64 {
        self.start + self.duration
    }

    fn value_at(&self, t: f64) -> StageResult<Value> {
        if self.duration <= 0.0 {
            let v = if t >= self.start { &self.to } else { &self.from };
            return Ok(v.clone());
        }
        let p = clamp01((t - self.start) / self.duration);
        self.from.interpolate(&self.to, self.ease.apply(p))
    }
}

/// An ordered set of tweens sampled as a pure function of time.
///
/// Sampling never depends on the previous sample, so playing backwards reproduces the forward
/// values exactly.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    policy: OverlapPolicy,
    base: StyleFrame,
    tracks: BTreeMap<(ElementId, Property), Vec<Segment>>,
    steps: Vec<StepSpan>,
    cursor: Cursor,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Values that `to`/`from` steps start from when no earlier step wrote the property.
    pub fn with_base(mut self, base: StyleFrame) -> Self {
        self.base = base;
        self
    }

    /// Overlap resolution in use.
    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.cursor.end
    }

    /// Spans of the declared steps, in declaration order.
    pub fn steps(&self) -> &[StepSpan] {
        &self.steps
    }

    /// `true` when no step has been added.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every element written by at least one step.
    pub fn targets(&self) -> BTreeSet<ElementId> {
        self.tracks.keys().map(|(el, _)| *el).collect()
    }

    /// Append a step at `position` and return its declaration index.
    ///
    /// A step without targets keeps its time slot but writes nothing.
    pub fn add(&mut self, mut tween: Tween, position: Position) -> StageResult<usize> {
        let order = self.steps.len();
        if !(tween.duration.is_finite() && tween.duration >= 0.0) {
            return Err(StageError::animation(format!(
                "step {order}: duration must be finite and >= 0"
            )));
        }
        if !(tween.stagger.is_finite() && tween.stagger >= 0.0) {
            return Err(StageError::animation(format!(
                "step {order}: stagger must be finite and >= 0"
            )));
        }
        let mut seen = BTreeSet::new();
        tween.targets.retain(|el| seen.insert(*el));
        let span = tween.span();
        let Tween {
            targets,
            from,
            to,
            duration,
            ease,
            stagger,
        } = tween;
        let from = coerce_map(from)?;
        let to = coerce_map(to)?;
        if from.is_empty() && to.is_empty() {
            return Err(StageError::animation(format!(
                "step {order}: no properties to animate"
            )));
        }

        let props: BTreeSet<Property> = from.keys().chain(to.keys()).copied().collect();
        let start = position.resolve(self.cursor);

        let mut pending = Vec::with_capacity(targets.len() * props.len());
        for (i, &target) in targets.iter().enumerate() {
            let seg_start = start + stagger * i as f64;
            for &prop in &props {
                let current = self.value_at(target, prop, seg_start)?;
                let a = from.get(&prop).cloned().unwrap_or_else(|| current.clone());
                let b = to.get(&prop).cloned().unwrap_or(current);
                if !a.compatible(&b) {
                    return Err(StageError::animation(format!(
                        "step {order}: {prop} cannot animate from '{a}' to '{b}'"
                    )));
                }
                pending.push((
                    (target, prop),
                    Segment {
                        start: seg_start,
                        duration,
                        from: a,
                        to: b,
                        ease,
                        order,
                    },
                ));
            }
        }
        if targets.is_empty() {
            tracing::debug!(step = order, "timeline step has no targets; writes skipped");
        }

        for (key, seg) in pending {
            self.tracks.entry(key).or_default().push(seg);
        }
        let end = start + span;
        self.steps.push(StepSpan { start, end });
        self.cursor = Cursor {
            end: self.cursor.end.max(end),
            prev_start: start,
            prev_end: end,
        };
        Ok(order)
    }

    fn pick<'a>(&self, segs: &'a [Segment], t: f64) -> Option<&'a Segment> {
        let started = || segs.iter().filter(move |s| s.start <= t);
        let chosen = match self.policy {
            OverlapPolicy::LastDeclared => started()
                .filter(|s| t <= s.end())
                .max_by_key(|s| s.order)
                // Between windows the step that ended last holds its end value.
                .or_else(|| {
                    started().max_by(|a, b| a.end().total_cmp(&b.end()).then(a.order.cmp(&b.order)))
                }),
            OverlapPolicy::LatestStart => {
                started().max_by(|a, b| a.start.total_cmp(&b.start).then(a.order.cmp(&b.order)))
            }
        };
        // Before anything started, the earliest step renders its start value.
        chosen.or_else(|| {
            segs.iter()
                .min_by(|a, b| a.start.total_cmp(&b.start).then(a.order.cmp(&b.order)))
        })
    }

    fn base_value(&self, target: ElementId, prop: Property) -> Value {
        self.base
            .get(&target)
            .and_then(|props| props.get(&prop))
            .cloned()
            .unwrap_or_else(|| prop.initial_value())
    }

    /// Value of one property of one target at time `t`.
    pub fn value_at(&self, target: ElementId, prop: Property, t: f64) -> StageResult<Value> {
        let picked = self
            .tracks
            .get(&(target, prop))
            .and_then(|segs| self.pick(segs, t));
        match picked {
            Some(seg) => seg.value_at(t),
            None => Ok(self.base_value(target, prop)),
        }
    }

    /// Every animated property value at time `t` (seconds).
    pub fn sample(&self, t: f64) -> StageResult<StyleFrame> {
        let mut frame = StyleFrame::new();
        for (&(target, prop), segs) in &self.tracks {
            let Some(seg) = self.pick(segs, t) else {
                continue;
            };
            frame.entry(target).or_default().insert(prop, seg.value_at(t)?);
        }
        Ok(frame)
    }

    /// Sample at normalized progress in `[0, 1]` of the total duration.
    pub fn sample_progress(&self, progress: f64) -> StageResult<StyleFrame> {
        self.sample(clamp01(progress) * self.duration())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/timeline.rs"]
mod tests;
