pub mod playhead;
pub mod position;
pub mod timeline;
pub mod tween;
