use crate::{
    animation::{
        ease::Ease,
        property::{Property, PropertyMap},
        value::Value,
    },
    foundation::{
        core::{ElementId, Rgba8},
        error::StageResult,
    },
    timeline::{
        playhead::{PlaybackEvent, Playhead},
        position::Position,
        timeline::{OverlapPolicy, StyleFrame, Timeline},
        tween::Tween,
    },
};

/// Letter color while a menu link is hovered.
pub const HOVER_COLOR: Rgba8 = Rgba8::rgb(0x8e, 0x18, 0x9e);

const HOVER_DURATION: f64 = 0.3;
const HOVER_STAGGER: f64 = 0.05;

/// A short-lived letter color animation on one menu link.
#[derive(Clone, Debug)]
pub(crate) struct Hover {
    pub(crate) link: ElementId,
    pub(crate) timeline: Timeline,
    pub(crate) playhead: Playhead,
    pub(crate) finished: bool,
}

impl Hover {
    /// Animate `letters` toward the hover color (`enter`) or back to white, starting from the
    /// colors currently on screen.
    pub(crate) fn start(
        link: ElementId,
        letters: Vec<ElementId>,
        enter: bool,
        rendered: &StyleFrame,
    ) -> StageResult<Self> {
        let base: StyleFrame = letters
            .iter()
            .filter_map(|el| {
                let color = rendered.get(el)?.get(&Property::Color)?;
                Some((*el, PropertyMap::from([(Property::Color, color.clone())])))
            })
            .collect();
        let target = if enter { HOVER_COLOR } else { Rgba8::WHITE };

        let mut timeline = Timeline::new(OverlapPolicy::LastDeclared).with_base(base);
        timeline.add(
            Tween::to(
                letters,
                PropertyMap::from([(Property::Color, Value::Color(target))]),
            )
            .duration(HOVER_DURATION)
            .stagger(HOVER_STAGGER)
            .ease(Ease::OutQuad),
            Position::default(),
        )?;
        let mut playhead = Playhead::new(timeline.duration());
        playhead.play();
        Ok(Self {
            link,
            timeline,
            playhead,
            finished: false,
        })
    }

    pub(crate) fn advance(&mut self, dt: f64) {
        if self.playhead.tick(dt) == Some(PlaybackEvent::Complete) {
            self.finished = true;
        }
    }

    pub(crate) fn sample(&self) -> StageResult<StyleFrame> {
        self.timeline.sample(self.playhead.time())
    }
}
