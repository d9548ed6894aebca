use std::{fmt, str::FromStr};

use crate::foundation::error::{StageError, StageResult};

/// Boundary reached by a time-driven playhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Reached the end while playing forward.
    Complete,
    /// Reached the start while playing in reverse.
    ReverseComplete,
}

/// Playback control verb, as used by trigger toggle actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackAction {
    /// Play forward from the current time.
    Play,
    /// Stop advancing.
    Pause,
    /// Continue in the current direction.
    Resume,
    /// Play backward from the current time.
    Reverse,
    /// Jump to the start and play forward.
    Restart,
    /// Jump to the start and pause.
    Reset,
    /// Jump to the end and pause.
    Complete,
    /// Do nothing.
    #[default]
    None,
}

impl FromStr for PlaybackAction {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        match s.trim() {
            "play" => Ok(Self::Play),
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "reverse" => Ok(Self::Reverse),
            "restart" => Ok(Self::Restart),
            "reset" => Ok(Self::Reset),
            "complete" => Ok(Self::Complete),
            "none" => Ok(Self::None),
            other => Err(StageError::animation(format!(
                "unknown playback action '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PlaybackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reverse => "reverse",
            Self::Restart => "restart",
            Self::Reset => "reset",
            Self::Complete => "complete",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// Elapsed-time cursor over a timeline of fixed duration.
///
/// Starts paused at zero. Each boundary event is emitted once, when the boundary is reached
/// from inside the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playhead {
    time: f64,
    duration: f64,
    reversed: bool,
    paused: bool,
}

impl Playhead {
    /// Paused playhead at time zero.
    pub fn new(duration: f64) -> Self {
        Self {
            time: 0.0,
            duration: duration.max(0.0),
            reversed: false,
            paused: true,
        }
    }

    /// Current time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Timeline length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Normalized position in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            if self.time > 0.0 { 1.0 } else { 0.0 }
        } else {
            self.time / self.duration
        }
    }

    /// `true` while the playhead is moving.
    pub fn is_playing(&self) -> bool {
        !self.paused
    }

    /// `true` when moving (or last set to move) backward.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Play forward.
    pub fn play(&mut self) {
        self.reversed = false;
        self.paused = false;
    }

    /// Play backward.
    pub fn reverse(&mut self) {
        self.reversed = true;
        self.paused = false;
    }

    /// Stop advancing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue in the current direction.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Apply a playback verb.
    pub fn apply(&mut self, action: PlaybackAction) {
        match action {
            PlaybackAction::Play => self.play(),
            PlaybackAction::Pause => self.pause(),
            PlaybackAction::Resume => self.resume(),
            PlaybackAction::Reverse => self.reverse(),
            PlaybackAction::Restart => {
                self.time = 0.0;
                self.play();
            }
            PlaybackAction::Reset => {
                self.time = 0.0;
                self.reversed = false;
                self.paused = true;
            }
            PlaybackAction::Complete => {
                self.time = self.duration;
                self.paused = true;
            }
            PlaybackAction::None => {}
        }
    }

    /// Advance by `dt` seconds in the current direction.
    pub fn tick(&mut self, dt: f64) -> Option<PlaybackEvent> {
        if self.paused {
            return None;
        }
        let dt = dt.max(0.0);
        if self.reversed {
            if self.time <= 0.0 {
                self.paused = true;
                return None;
            }
            self.time = (self.time - dt).max(0.0);
            if self.time <= 0.0 {
                self.paused = true;
                return Some(PlaybackEvent::ReverseComplete);
            }
        } else {
            if self.time >= self.duration {
                self.paused = true;
                return None;
            }
            self.time = (self.time + dt).min(self.duration);
            if self.time >= self.duration {
                self.paused = true;
                return Some(PlaybackEvent::Complete);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/playhead.rs"]
mod tests;
