use std::collections::BTreeMap;

use crate::{
    animation::{
        property::{Property, PropertyMap},
        value::Value,
    },
    foundation::{core::ElementId, error::StageResult},
    timeline::timeline::StyleFrame,
    trigger::binder::PinState,
};

/// Rendering collaborator that receives style and pin updates.
///
/// Ordering contract: within one frame, `apply_styles` and `apply_pin` may be called any number
/// of times, followed by exactly one `end_frame`. Only changed values are pushed, and never for
/// unmounted elements.
pub trait StyleSink {
    /// Write changed properties of one element.
    fn apply_styles(&mut self, el: ElementId, styles: &PropertyMap) -> StageResult<()>;
    /// Change how a pinned region is placed.
    fn apply_pin(&mut self, region: ElementId, state: PinState) -> StageResult<()>;
    /// Called once after the last update of frame `index`.
    fn end_frame(&mut self, _index: u64) -> StageResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and the CLI.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    styles: StyleFrame,
    pins: BTreeMap<ElementId, PinState>,
    updates: BTreeMap<ElementId, usize>,
    frames: u64,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value of every property written so far.
    pub fn styles(&self) -> &StyleFrame {
        &self.styles
    }

    /// Latest value of one property.
    pub fn value(&self, el: ElementId, prop: Property) -> Option<&Value> {
        self.styles.get(&el).and_then(|props| props.get(&prop))
    }

    /// Latest pin state of every pinned region.
    pub fn pins(&self) -> &BTreeMap<ElementId, PinState> {
        &self.pins
    }

    /// Latest pin state of a region.
    pub fn pin(&self, region: ElementId) -> Option<PinState> {
        self.pins.get(&region).copied()
    }

    /// Number of `apply_styles` calls received for `el`.
    pub fn updates_for(&self, el: ElementId) -> usize {
        self.updates.get(&el).copied().unwrap_or(0)
    }

    /// Number of `apply_styles` calls received overall.
    pub fn total_updates(&self) -> usize {
        self.updates.values().sum()
    }

    /// Frames ended so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Forget the update counters, keeping the latest values.
    pub fn reset_counts(&mut self) {
        self.updates.clear();
    }
}

impl StyleSink for RecordingSink {
    fn apply_styles(&mut self, el: ElementId, styles: &PropertyMap) -> StageResult<()> {
        let entry = self.styles.entry(el).or_default();
        for (prop, value) in styles {
            entry.insert(*prop, value.clone());
        }
        *self.updates.entry(el).or_default() += 1;
        Ok(())
    }

    fn apply_pin(&mut self, region: ElementId, state: PinState) -> StageResult<()> {
        self.pins.insert(region, state);
        Ok(())
    }

    fn end_frame(&mut self, _index: u64) -> StageResult<()> {
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
