use std::{collections::BTreeMap, fmt, str::FromStr};

use kurbo::Vec2;

use crate::{
    document::Document,
    foundation::{
        core::ElementId,
        error::{StageError, StageResult},
        math::damp,
    },
    timeline::playhead::PlaybackAction,
    trigger::{
        marker::Marker,
        range::{Phase, ScrollRange, TriggerEvent},
    },
};

/// Decay rate for smoothed scrub: about 99% caught up after the configured lag.
const SCRUB_CATCH_UP: f64 = 4.6;

/// Registry key of a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct TriggerId(pub u64);

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// How a trigger's progress drives its timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawScrub", into = "RawScrub")]
pub enum Scrub {
    /// Not scrubbed; phase changes fire toggle actions instead.
    #[default]
    Off,
    /// Timeline position follows progress exactly (`true`).
    Immediate,
    /// Timeline position catches up with progress over this many seconds (`1`).
    Smooth(f64),
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RawScrub {
    Flag(bool),
    Lag(f64),
}

impl TryFrom<RawScrub> for Scrub {
    type Error = StageError;

    fn try_from(raw: RawScrub) -> StageResult<Self> {
        match raw {
            RawScrub::Flag(false) => Ok(Self::Off),
            RawScrub::Flag(true) => Ok(Self::Immediate),
            RawScrub::Lag(s) if s.is_finite() && s > 0.0 => Ok(Self::Smooth(s)),
            RawScrub::Lag(s) if s == 0.0 => Ok(Self::Immediate),
            RawScrub::Lag(s) => Err(StageError::trigger(format!(
                "scrub lag must be a positive number of seconds, got {s}"
            ))),
        }
    }
}

impl From<Scrub> for RawScrub {
    fn from(value: Scrub) -> Self {
        match value {
            Scrub::Off => Self::Flag(false),
            Scrub::Immediate => Self::Flag(true),
            Scrub::Smooth(s) => Self::Lag(s),
        }
    }
}

impl Scrub {
    /// `true` unless [`Scrub::Off`].
    pub fn is_scrubbed(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Playback actions fired on `enter leave enter-back leave-back`, written
/// `"play none none none"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    /// Fired on [`TriggerEvent::Enter`].
    pub on_enter: PlaybackAction,
    /// Fired on [`TriggerEvent::Leave`].
    pub on_leave: PlaybackAction,
    /// Fired on [`TriggerEvent::EnterBack`].
    pub on_enter_back: PlaybackAction,
    /// Fired on [`TriggerEvent::LeaveBack`].
    pub on_leave_back: PlaybackAction,
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self {
            on_enter: PlaybackAction::Play,
            on_leave: PlaybackAction::None,
            on_enter_back: PlaybackAction::None,
            on_leave_back: PlaybackAction::None,
        }
    }
}

impl ToggleActions {
    /// Action bound to `event`.
    pub fn action_for(&self, event: TriggerEvent) -> PlaybackAction {
        match event {
            TriggerEvent::Enter => self.on_enter,
            TriggerEvent::Leave => self.on_leave,
            TriggerEvent::EnterBack => self.on_enter_back,
            TriggerEvent::LeaveBack => self.on_leave_back,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let actions = s
            .split_whitespace()
            .map(str::parse)
            .collect::<StageResult<Vec<PlaybackAction>>>()?;
        let [on_enter, on_leave, on_enter_back, on_leave_back] = actions[..] else {
            return Err(StageError::trigger(format!(
                "toggle actions '{s}' must name exactly four actions"
            )));
        };
        Ok(Self {
            on_enter,
            on_leave,
            on_enter_back,
            on_leave_back,
        })
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = StageError;

    fn try_from(value: String) -> StageResult<Self> {
        value.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(v: ToggleActions) -> Self {
        format!(
            "{} {} {} {}",
            v.on_enter, v.on_leave, v.on_enter_back, v.on_leave_back
        )
    }
}

/// Where a pinned region is drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum PinState {
    /// In normal flow (before the range).
    Unpinned,
    /// Removed from flow and held at `viewport_top` pixels from the viewport top.
    Pinned {
        /// Fixed distance from the viewport top.
        viewport_top: f64,
    },
    /// Back in flow, shifted down by the pinned distance.
    Released {
        /// Downward shift in pixels.
        offset: f64,
    },
}

/// Registration request for a trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerSpec {
    /// Region whose box the markers refer to. `None` registers an inert trigger.
    pub region: Option<ElementId>,
    /// Start marker.
    pub start: Marker,
    /// End marker.
    pub end: Marker,
    /// Hold the region in place while active.
    pub pin: bool,
    /// Reserve the pinned distance in the layout below the region.
    pub pin_spacing: bool,
    /// Scrub mode.
    pub scrub: Scrub,
}

/// Per-trigger result of one scroll update.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TriggerUpdate {
    /// Trigger key.
    pub id: TriggerId,
    /// Progress computed directly from the scroll position.
    pub progress: f64,
    /// Progress after scrub smoothing.
    pub scrubbed: f64,
    /// Phase after this update.
    pub phase: Phase,
    /// Boundary crossings since the previous update.
    pub events: Vec<TriggerEvent>,
    /// Pin placement, for pinned triggers.
    pub pin: Option<PinState>,
}

#[derive(Clone, Debug)]
struct Trigger {
    spec: TriggerSpec,
    range: Option<ScrollRange>,
    region_top: f64,
    phase: Phase,
    scrubbed: f64,
}

impl Trigger {
    /// Resolve the range with the region moved down by `shift` pixels of upstream pin spacing.
    fn resolve(&self, doc: &Document, shift: f64) -> StageResult<Option<(ScrollRange, f64)>> {
        let Some(el) = self
            .spec
            .region
            .filter(|&r| doc.is_mounted(r))
            .and_then(|r| doc.get(r))
        else {
            return Ok(None);
        };
        let rect = el.rect + Vec2::new(0.0, shift);
        let viewport = doc.viewport();
        let start = self.spec.start.resolve(rect, viewport, None)?;
        let end = self.spec.end.resolve(rect, viewport, Some(start))?;
        let range = ScrollRange {
            start,
            end,
            pinned: self.spec.pin,
        };
        Ok(Some((range, rect.y0)))
    }

    fn spacing(&self) -> f64 {
        if self.spec.pin && self.spec.pin_spacing {
            self.range.map_or(0.0, |r| r.len())
        } else {
            0.0
        }
    }
}

/// Explicit registry of scroll triggers, keyed by [`TriggerId`].
///
/// Registration and teardown are symmetric: every id returned by [`register`](Self::register)
/// stays live until [`kill`](Self::kill)ed, directly or through its region.
#[derive(Clone, Debug, Default)]
pub struct TriggerBinder {
    triggers: BTreeMap<TriggerId, Trigger>,
    next_id: u64,
}

impl TriggerBinder {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger and resolve its range against `doc`.
    ///
    /// A missing or unmounted region is not an error: the trigger is kept but never activates.
    pub fn register(&mut self, spec: TriggerSpec, doc: &Document) -> StageResult<TriggerId> {
        if spec.start.is_relative() {
            return Err(StageError::trigger(
                "start marker cannot be relative ('+=...')",
            ));
        }
        let id = TriggerId(self.next_id);
        let mut trigger = Trigger {
            spec,
            range: None,
            region_top: 0.0,
            phase: Phase::Before,
            scrubbed: 0.0,
        };
        let shift = self.pin_shift(doc, None, trigger.spec.region);
        if let Some((range, top)) = trigger.resolve(doc, shift)? {
            trigger.range = Some(range);
            trigger.region_top = top;
        }
        match trigger.range {
            Some(range) => tracing::debug!(%id, start = range.start, end = range.end, "trigger registered"),
            None => tracing::debug!(%id, "trigger region missing; trigger stays inert"),
        }
        self.next_id += 1;
        self.triggers.insert(id, trigger);
        Ok(id)
    }

    /// Re-resolve every range, e.g. after layout changes.
    ///
    /// Regions are visited top to bottom so pin spacing pushes later regions down.
    pub fn refresh(&mut self, doc: &Document) -> StageResult<()> {
        let top = |t: &Trigger| {
            t.spec
                .region
                .and_then(|r| doc.get(r))
                .map_or(f64::INFINITY, |el| el.rect.y0)
        };
        let mut order: Vec<(TriggerId, f64)> =
            self.triggers.iter().map(|(&id, t)| (id, top(t))).collect();
        order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        for trigger in self.triggers.values_mut() {
            trigger.range = None;
        }
        for (id, _) in order {
            let Some(trigger) = self.triggers.get(&id) else {
                continue;
            };
            let shift = self.pin_shift(doc, Some(id), trigger.spec.region);
            let resolved = trigger.resolve(doc, shift)?;
            if let Some(trigger) = self.triggers.get_mut(&id) {
                trigger.range = resolved.map(|(range, _)| range);
                if let Some((_, top)) = resolved {
                    trigger.region_top = top;
                }
            }
        }
        Ok(())
    }

    /// Spacing added above `region` by resolved pinned triggers whose regions end above it.
    fn pin_shift(&self, doc: &Document, skip: Option<TriggerId>, region: Option<ElementId>) -> f64 {
        let Some(top) = region.and_then(|r| doc.get(r)).map(|el| el.rect.y0) else {
            return 0.0;
        };
        self.triggers
            .iter()
            .filter(|(id, _)| Some(**id) != skip)
            .filter(|(_, t)| {
                t.spec
                    .region
                    .filter(|&r| doc.is_mounted(r))
                    .and_then(|r| doc.get(r))
                    .is_some_and(|el| el.rect.y1 <= top)
            })
            .map(|(_, t)| t.spacing())
            .sum()
    }

    /// Total layout height added by pin spacing.
    pub fn total_pin_spacing(&self) -> f64 {
        self.triggers.values().map(Trigger::spacing).sum()
    }

    /// Number of registered triggers.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.triggers.keys().copied()
    }

    /// `true` while `id` is registered.
    pub fn contains(&self, id: TriggerId) -> bool {
        self.triggers.contains_key(&id)
    }

    /// Resolved range, `None` for unknown or inert triggers.
    pub fn range(&self, id: TriggerId) -> Option<ScrollRange> {
        self.triggers.get(&id).and_then(|t| t.range)
    }

    /// Region of a trigger.
    pub fn region(&self, id: TriggerId) -> Option<ElementId> {
        self.triggers.get(&id).and_then(|t| t.spec.region)
    }

    /// Scrub mode of a trigger.
    pub fn scrub(&self, id: TriggerId) -> Option<Scrub> {
        self.triggers.get(&id).map(|t| t.spec.scrub)
    }

    /// Progress of `scroll` through the trigger's range; a pure function of `scroll`.
    pub fn progress(&self, id: TriggerId, scroll: f64) -> Option<f64> {
        self.range(id).map(|r| r.progress(scroll))
    }

    /// Progress after scrub smoothing as of the last [`update`](Self::update).
    pub fn scrubbed(&self, id: TriggerId) -> Option<f64> {
        self.triggers
            .get(&id)
            .and_then(|t| t.range.map(|_| t.scrubbed))
    }

    /// Extra layout height reserved below a pinned region.
    pub fn pin_spacing(&self, id: TriggerId) -> f64 {
        self.triggers.get(&id).map_or(0.0, Trigger::spacing)
    }

    /// Evaluate every live trigger at `scroll`; `dt` feeds smoothed scrubbing.
    pub fn update(&mut self, scroll: f64, dt: f64) -> Vec<TriggerUpdate> {
        let mut out = Vec::with_capacity(self.triggers.len());
        for (&id, trigger) in &mut self.triggers {
            let Some(range) = trigger.range else {
                continue;
            };
            let progress = range.progress(scroll);
            let phase = range.phase(scroll);
            let events = TriggerEvent::between(trigger.phase, phase).to_vec();
            trigger.phase = phase;

            trigger.scrubbed = match trigger.spec.scrub {
                Scrub::Smooth(lag) => {
                    let next = damp(trigger.scrubbed, progress, SCRUB_CATCH_UP / lag, dt.max(0.0));
                    if (next - progress).abs() < 1e-4 {
                        progress
                    } else {
                        next
                    }
                }
                Scrub::Off | Scrub::Immediate => progress,
            };

            let pin = range.pinned.then(|| match phase {
                Phase::Before => PinState::Unpinned,
                Phase::Active => PinState::Pinned {
                    viewport_top: trigger.region_top - range.start,
                },
                Phase::After => PinState::Released {
                    offset: range.len(),
                },
            });

            out.push(TriggerUpdate {
                id,
                progress,
                scrubbed: trigger.scrubbed,
                phase,
                events,
                pin,
            });
        }
        out
    }

    /// Unregister one trigger. Returns `false` if it was not registered.
    pub fn kill(&mut self, id: TriggerId) -> bool {
        let removed = self.triggers.remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "trigger killed");
        }
        removed
    }

    /// Unregister every trigger whose region is `el` or lies beneath it.
    pub fn kill_within(&mut self, doc: &Document, el: ElementId) -> Vec<TriggerId> {
        let doomed: Vec<TriggerId> = self
            .triggers
            .iter()
            .filter(|(_, t)| t.spec.region.is_some_and(|r| doc.is_within(r, el)))
            .map(|(&id, _)| id)
            .collect();
        for id in &doomed {
            self.kill(*id);
        }
        doomed
    }

    /// Unregister everything; returns how many triggers were removed.
    pub fn kill_all(&mut self) -> usize {
        let n = self.triggers.len();
        self.triggers.clear();
        n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/binder.rs"]
mod tests;
