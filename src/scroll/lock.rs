use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Shared page-scroll suspension counter.
///
/// Scrolling is suspended while at least one [`ScrollLockGuard`] is alive.
#[derive(Clone, Debug, Default)]
pub struct ScrollLock {
    holders: Arc<AtomicUsize>,
}

impl ScrollLock {
    /// New, unlocked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend scrolling until the returned guard is dropped.
    pub fn acquire(&self) -> ScrollLockGuard {
        self.holders.fetch_add(1, Ordering::SeqCst);
        ScrollLockGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    /// `true` while any guard is alive.
    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }
}

/// Keeps scrolling suspended until dropped.
#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::SeqCst);
    }
}
