#![forbid(unsafe_code)]
//! Headless scroll choreography: smoothed scrolling, scroll triggers with scrub and pinning,
//! declarative timelines, a slide-out menu state machine and contact-form delivery.

pub mod animation;
pub mod config;
pub mod contact;
pub mod document;
pub mod foundation;
pub mod menu;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod stage;
pub mod timeline;
pub mod trigger;

pub use animation::{
    ease::Ease,
    property::{Property, PropertyMap},
    value::Value,
};
pub use config::Settings;
pub use contact::{
    delivery::{DeliveryError, EmailDelivery, EmailJsClient},
    form::{Field, FormSubmission},
    handler::{ContactHandler, Credentials, Notice, SubmitOutcome},
};
pub use document::Document;
pub use foundation::{
    core::{ElementId, Rgba8, Viewport},
    error::{StageError, StageResult},
};
pub use menu::machine::{MenuMachine, MenuState};
pub use render::sink::{RecordingSink, StyleSink};
pub use scene::page::Page;
pub use scroll::{
    frame_loop::{FrameLoop, FrameTick},
    lock::{ScrollLock, ScrollLockGuard},
    smooth::{ScrollFrame, SmoothScroll, SmoothScrollOpts},
};
pub use stage::{FrameReport, HOVER_COLOR, Stage};
pub use timeline::{
    playhead::{PlaybackAction, PlaybackEvent, Playhead},
    position::Position,
    timeline::{OverlapPolicy, StyleFrame, Timeline},
    tween::Tween,
};
pub use trigger::{
    binder::{PinState, Scrub, ToggleActions, TriggerBinder, TriggerId, TriggerSpec, TriggerUpdate},
    marker::Marker,
    range::{Phase, ScrollRange, TriggerEvent},
};
