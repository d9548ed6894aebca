use std::collections::BTreeMap;

use crate::{
    document::Document,
    foundation::{
        core::ElementId,
        error::{StageError, StageResult},
    },
    scene::model::{DriveDef, SceneDef, StepDef, StepDefaults},
    timeline::{
        playhead::{PlaybackEvent, Playhead},
        timeline::{OverlapPolicy, StyleFrame, Timeline},
        tween::{DEFAULT_DURATION, Tween},
    },
    trigger::binder::{ToggleActions, TriggerId, TriggerUpdate},
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Drive {
    /// Time-driven; starts by itself after its delay.
    Autoplay,
    /// Time-driven; armed when the scene at this index completes.
    After(usize),
    Scrub(TriggerId),
    Toggle {
        trigger: TriggerId,
        actions: ToggleActions,
    },
    /// Positioned by the menu machine.
    Manual,
}

#[derive(Clone, Debug)]
pub(crate) struct Scene {
    pub(crate) name: String,
    pub(crate) timeline: Timeline,
    pub(crate) drive: Drive,
    pub(crate) playhead: Playhead,
    /// Seconds left before a time-driven scene starts; `None` when not armed.
    pub(crate) countdown: Option<f64>,
    pub(crate) start_delay: f64,
    pub(crate) unmount_on_complete: Option<String>,
    /// Set once the scene's trigger or targets are gone.
    pub(crate) retired: bool,
}

impl Scene {
    pub(crate) fn build(
        def: &SceneDef,
        doc: &Document,
        base: &StyleFrame,
        policy: OverlapPolicy,
        triggers: &BTreeMap<String, TriggerId>,
        scene_index: &BTreeMap<&str, usize>,
    ) -> StageResult<Self> {
        let mut timeline = Timeline::new(policy).with_base(base.clone());
        for (i, step) in def.steps.iter().enumerate() {
            let targets = doc.select(&step.targets)?;
            if targets.is_empty() {
                tracing::debug!(
                    scene = %def.name,
                    step = i,
                    selector = %step.targets,
                    "no elements match; step writes skipped"
                );
            }
            timeline
                .add(tween(step, targets, def.defaults), step.position)
                .map_err(|e| {
                    StageError::validation(format!("scene '{}' step {i}: {e}", def.name))
                })?;
        }

        let lookup_trigger = |name: &str| {
            triggers.get(name).copied().ok_or_else(|| {
                StageError::validation(format!("scene '{}': unknown trigger '{name}'", def.name))
            })
        };
        let (drive, start_delay) = match &def.drive {
            DriveDef::Autoplay { delay } => (Drive::Autoplay, *delay),
            DriveDef::After { scene, delay } => {
                let idx = scene_index.get(scene.as_str()).copied().ok_or_else(|| {
                    StageError::validation(format!(
                        "scene '{}': unknown scene '{scene}'",
                        def.name
                    ))
                })?;
                (Drive::After(idx), *delay)
            }
            DriveDef::Scrub { trigger } => (Drive::Scrub(lookup_trigger(trigger)?), 0.0),
            DriveDef::Toggle { trigger, actions } => (
                Drive::Toggle {
                    trigger: lookup_trigger(trigger)?,
                    actions: *actions,
                },
                0.0,
            ),
            DriveDef::Manual => (Drive::Manual, 0.0),
        };

        Ok(Self {
            name: def.name.clone(),
            playhead: Playhead::new(timeline.duration()),
            timeline,
            countdown: (drive == Drive::Autoplay).then_some(start_delay),
            drive,
            start_delay,
            unmount_on_complete: def.unmount_on_complete.clone(),
            retired: false,
        })
    }

    /// `true` when the playhead advances with elapsed time.
    pub(crate) fn is_timed(&self) -> bool {
        matches!(
            self.drive,
            Drive::Autoplay | Drive::After(_) | Drive::Toggle { .. }
        )
    }

    /// Apply toggle actions for the boundary crossings of this scene's trigger.
    pub(crate) fn on_trigger(&mut self, update: &TriggerUpdate) {
        if let Drive::Toggle { trigger, actions } = self.drive
            && trigger == update.id
        {
            for &event in &update.events {
                let action = actions.action_for(event);
                tracing::debug!(scene = %self.name, ?event, %action, "toggle action");
                self.playhead.apply(action);
            }
        }
    }

    /// Arm the start countdown of an `After` scene.
    pub(crate) fn arm(&mut self) {
        if self.countdown.is_none() {
            self.countdown = Some(self.start_delay);
        }
    }

    /// Advance a time-driven scene by `dt`.
    pub(crate) fn advance(&mut self, dt: f64) -> Option<PlaybackEvent> {
        let mut step = dt;
        if let Some(left) = self.countdown {
            let left = left - dt;
            if left > 0.0 {
                self.countdown = Some(left);
                return None;
            }
            self.countdown = None;
            tracing::debug!(scene = %self.name, "scene started");
            self.playhead.play();
            step = -left;
        }
        self.playhead.tick(step)
    }
}

fn tween(step: &StepDef, targets: Vec<ElementId>, defaults: StepDefaults) -> Tween {
    if step.set {
        return Tween::set(targets, step.to.clone());
    }
    let tween = match (step.from.is_empty(), step.to.is_empty()) {
        (true, _) => Tween::to(targets, step.to.clone()),
        (false, true) => Tween::from(targets, step.from.clone()),
        (false, false) => Tween::from_to(targets, step.from.clone(), step.to.clone()),
    };
    tween
        .duration(step.duration.or(defaults.duration).unwrap_or(DEFAULT_DURATION))
        .ease(step.ease.or(defaults.ease).unwrap_or_default())
        .stagger(step.stagger)
}
