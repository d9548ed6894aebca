use std::fmt;

use tokio::sync::watch;

use crate::{
    menu::links::{self, MenuLink},
    scroll::lock::{ScrollLock, ScrollLockGuard},
    timeline::playhead::{PlaybackAction, PlaybackEvent, Playhead},
};

/// Lifecycle of the slide-out menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuState {
    /// Hidden, with the page free to scroll.
    #[default]
    Closed,
    /// Open animation playing.
    Opening,
    /// Fully shown; links accept clicks.
    Open,
    /// Open animation playing in reverse.
    Closing,
}

impl fmt::Display for MenuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
        };
        f.write_str(name)
    }
}

/// Menu state machine driving the menu timeline's playhead.
///
/// `Open` and `Closed` are only entered through [`complete`](Self::complete), which
/// [`tick`](Self::tick) calls when the playhead reaches a boundary. Page scrolling stays locked
/// from the first `open()` until the machine is back in `Closed`.
#[derive(Debug)]
pub struct MenuMachine {
    state: watch::Sender<MenuState>,
    playhead: Playhead,
    lock: ScrollLock,
    guard: Option<ScrollLockGuard>,
}

impl MenuMachine {
    /// Closed machine over an open animation of `duration` seconds.
    pub fn new(duration: f64, lock: ScrollLock) -> Self {
        let (state, _) = watch::channel(MenuState::Closed);
        Self {
            state,
            playhead: Playhead::new(duration),
            lock,
            guard: None,
        }
    }

    /// Current state, as last published to subscribers.
    pub fn state(&self) -> MenuState {
        *self.state.borrow()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<MenuState> {
        self.state.subscribe()
    }

    /// Position of the menu timeline in seconds.
    pub fn time(&self) -> f64 {
        self.playhead.time()
    }

    /// The page header is shown only while the menu is fully closed.
    pub fn header_visible(&self) -> bool {
        self.state() == MenuState::Closed
    }

    /// `true` while this machine holds the page scroll lock.
    pub fn holds_scroll_lock(&self) -> bool {
        self.guard.is_some()
    }

    fn set_state(&self, next: MenuState) {
        let prev = self.state.send_replace(next);
        if prev != next {
            tracing::info!(from = %prev, to = %next, "menu state changed");
        }
    }

    /// Start opening. No-op while `Opening` or `Open`; returns whether anything changed.
    pub fn open(&mut self) -> bool {
        if matches!(self.state(), MenuState::Opening | MenuState::Open) {
            return false;
        }
        if self.guard.is_none() {
            self.guard = Some(self.lock.acquire());
        }
        self.set_state(MenuState::Opening);
        self.playhead.play();
        if self.playhead.time() >= self.playhead.duration() {
            self.complete(PlaybackEvent::Complete);
        }
        true
    }

    /// Start closing. No-op while `Closing` or `Closed`; returns whether anything changed.
    pub fn close(&mut self) -> bool {
        if matches!(self.state(), MenuState::Closing | MenuState::Closed) {
            return false;
        }
        self.set_state(MenuState::Closing);
        self.playhead.reverse();
        if self.playhead.time() <= 0.0 {
            self.complete(PlaybackEvent::ReverseComplete);
        }
        true
    }

    /// Jump straight to `Closed`, rewinding the animation and releasing the scroll lock.
    pub fn force_close(&mut self) {
        self.playhead.apply(PlaybackAction::Reset);
        self.finish_close();
    }

    /// Close the menu for a link click and hand back the route to navigate to.
    pub fn click_link(&mut self, index: usize) -> Option<&'static MenuLink> {
        let link = links::link(index)?;
        self.close();
        Some(link)
    }

    /// Completion signal of the menu animation.
    ///
    /// `Complete` finalizes `Opening`, `ReverseComplete` finalizes `Closing`; any other
    /// combination is stale and ignored.
    pub fn complete(&mut self, event: PlaybackEvent) -> MenuState {
        match (self.state(), event) {
            (MenuState::Opening, PlaybackEvent::Complete) => {
                self.set_state(MenuState::Open);
            }
            (MenuState::Closing, PlaybackEvent::ReverseComplete) => self.finish_close(),
            (state, event) => {
                tracing::debug!(%state, ?event, "stale menu completion ignored");
            }
        }
        self.state()
    }

    /// Advance the animation; returns the new state if it changed.
    pub fn tick(&mut self, dt: f64) -> Option<MenuState> {
        let before = self.state();
        let event = self.playhead.tick(dt)?;
        let after = self.complete(event);
        (after != before).then_some(after)
    }

    fn finish_close(&mut self) {
        self.guard = None;
        self.set_state(MenuState::Closed);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/menu/machine.rs"]
mod tests;
