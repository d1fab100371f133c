//! Per-session turn locks.
//!
//! A session handles one message at a time. A second submission while a
//! turn is in flight is refused rather than queued.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as TurnMutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

/// Held for the duration of a turn; released on drop.
pub type TurnGuard = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<SessionId, Arc<TurnMutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the session, or returns `None` when a turn is already running.
    pub fn try_acquire(&self, id: &SessionId) -> Option<TurnGuard> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // A held lock has a second owner: the guard.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(*id).or_default())
        };
        lock.try_lock_owned().ok()
    }

    pub fn is_locked(&self, id: &SessionId) -> bool {
        let locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .get(id)
            .map(|lock| lock.try_lock().is_err())
            .unwrap_or(false)
    }
}
