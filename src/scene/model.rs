use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    animation::{ease::Ease, property::PropertyMap},
    document::ElementDef,
    foundation::core::Viewport,
    scroll::smooth::SmoothScrollOpts,
    timeline::{position::Position, timeline::OverlapPolicy},
    trigger::{
        binder::{Scrub, ToggleActions},
        marker::{Edge, Marker},
    },
};

/// JSON-facing description of one page: layout, triggers and scenes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDef {
    /// Page name used in logs.
    pub name: String,
    #[serde(default)]
    pub viewport: ViewportDef,
    #[serde(default)]
    pub smooth_scroll: SmoothScrollOpts,
    #[serde(default)]
    pub overlap: OverlapPolicy,
    pub elements: Vec<ElementDef>,
    /// Initial styles by selector; timelines start from these.
    #[serde(default)]
    pub base: BTreeMap<String, PropertyMap>,
    /// Named scroll triggers.
    #[serde(default)]
    pub triggers: BTreeMap<String, TriggerDef>,
    /// Scenes in declaration order; later scenes win when they write the same property.
    #[serde(default)]
    pub scenes: Vec<SceneDef>,
    #[serde(default)]
    pub menu: Option<MenuDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportDef {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportDef {
    fn default() -> Self {
        let v = Viewport::default();
        Self {
            width: v.width,
            height: v.height,
        }
    }
}

impl<'de> Deserialize<'de> for ViewportDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { width: f64, height: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([width, height]) => Ok(Self { width, height }),
            Repr::Obj { width, height } => Ok(Self { width, height }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDef {
    /// Selector of the region; the first match is used.
    pub region: String,
    #[serde(default = "TriggerDef::default_start")]
    pub start: Marker,
    #[serde(default = "TriggerDef::default_end")]
    pub end: Marker,
    #[serde(default)]
    pub pin: bool,
    #[serde(default = "TriggerDef::default_pin_spacing")]
    pub pin_spacing: bool,
    #[serde(default)]
    pub scrub: Scrub,
}

impl TriggerDef {
    fn default_start() -> Marker {
        Marker::Edges {
            region: Edge::Top,
            viewport: Edge::Bottom,
        }
    }

    fn default_end() -> Marker {
        Marker::Edges {
            region: Edge::Bottom,
            viewport: Edge::Top,
        }
    }

    fn default_pin_spacing() -> bool {
        true
    }
}

/// How a scene's timeline position is chosen every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DriveDef {
    /// Plays once after `delay` seconds.
    Autoplay {
        #[serde(default)]
        delay: f64,
    },
    /// Plays once when the named scene completes.
    After {
        scene: String,
        #[serde(default)]
        delay: f64,
    },
    /// Follows the (possibly smoothed) progress of a trigger.
    Scrub { trigger: String },
    /// Time-driven, controlled by a trigger's toggle actions.
    Toggle {
        trigger: String,
        #[serde(default)]
        actions: ToggleActions,
    },
    /// Controlled from code (the menu).
    Manual,
}

/// Values applied to every step that leaves them unset.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StepDefaults {
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub ease: Option<Ease>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDef {
    pub name: String,
    pub drive: DriveDef,
    #[serde(default)]
    pub defaults: StepDefaults,
    /// Elements unmounted once the scene completes (a loading screen).
    #[serde(default)]
    pub unmount_on_complete: Option<String>,
    pub steps: Vec<StepDef>,
}

/// One timeline step. Which of `from` / `to` is given picks the tween kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepDef {
    /// Selector of the animated elements.
    pub targets: String,
    #[serde(default)]
    pub from: PropertyMap,
    #[serde(default)]
    pub to: PropertyMap,
    /// Apply `to` instantly.
    #[serde(default)]
    pub set: bool,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub ease: Option<Ease>,
    #[serde(default)]
    pub stagger: f64,
    #[serde(default)]
    pub position: Position,
}

/// Binding of the menu machine to page elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDef {
    /// Scene played forward to open and in reverse to close.
    pub scene: String,
    /// Link holders, in route order.
    pub links: String,
    /// Per-letter elements inside each link holder.
    #[serde(default = "MenuDef::default_letters")]
    pub letters: String,
    /// Header shown only while the menu is closed.
    #[serde(default)]
    pub header: Option<String>,
}

impl MenuDef {
    fn default_letters() -> String {
        ".letter".to_owned()
    }
}
