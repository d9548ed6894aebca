use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::foundation::error::{StageError, StageResult};

/// One display refresh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// 0-based frame counter.
    pub index: u64,
    /// Seconds since the previous frame.
    pub dt: f64,
}

/// Owned per-frame driver.
///
/// The ticking task lives exactly as long as this value: [`stop`](Self::stop) or drop cancels
/// it. Must be started inside a tokio runtime.
#[derive(Debug)]
pub struct FrameLoop {
    rx: mpsc::Receiver<FrameTick>,
    task: Option<JoinHandle<()>>,
}

impl FrameLoop {
    /// Start ticking at `fps` frames per second. Late frames are skipped, not bunched.
    pub fn start(fps: u32) -> StageResult<Self> {
        if fps == 0 {
            return Err(StageError::validation("frame loop fps must be > 0"));
        }
        let period = Duration::from_secs_f64(1.0 / f64::from(fps));
        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last = ticker.tick().await;
            let mut index = 0u64;
            loop {
                let now = ticker.tick().await;
                let dt = now.duration_since(last).as_secs_f64();
                last = now;
                if tx.send(FrameTick { index, dt }).await.is_err() {
                    break;
                }
                index += 1;
            }
        });
        tracing::debug!(fps, "frame loop started");
        Ok(Self {
            rx,
            task: Some(task),
        })
    }

    /// Wait for the next frame; `None` once stopped and drained.
    pub async fn next_frame(&mut self) -> Option<FrameTick> {
        self.rx.recv().await
    }

    /// `true` until stopped.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the ticking task.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("frame loop stopped");
        }
        self.rx.close();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/frame_loop.rs"]
mod tests;
