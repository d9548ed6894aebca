//! Page runtime: owns the document, smooth scroll, trigger registry, scenes and menu, and
//! pushes the resulting styles to a [`StyleSink`](crate::render::sink::StyleSink) every frame.

mod hover;
mod runtime;
mod scenes;

pub use hover::HOVER_COLOR;
pub use runtime::{FrameReport, Stage};
