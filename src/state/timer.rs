//! Per-session phase timer.
//!
//! A session owns at most one pending timer. Each timer is a tokio task that sleeps, then
//! re-acquires the session lock and runs its callback only if it is still the pending timer.
//! Cancelling aborts the task and invalidates its generation, so a timer that already woke up
//! and is waiting for the lock never applies a stale transition.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::state::{registry::SessionCell, session::Session};

/// Callback run when a timer fires, with the session lock held.
pub type TimerCallback = fn(&Arc<SessionCell>, &mut Session);

#[derive(Debug)]
struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Slot holding the pending timer of a session.
#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<PendingTimer>,
    generation: u64,
}

impl TimerSlot {
    /// Whether a timer is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel the pending timer. Returns `false` when nothing was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Take ownership of the firing timer if `generation` is still the pending one.
    fn claim(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(timer) if timer.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Schedule `callback` to run on `session` after `delay`, replacing any pending timer.
pub fn schedule(
    cell: &Arc<SessionCell>,
    session: &mut Session,
    delay: Duration,
    callback: TimerCallback,
) {
    session.timer.cancel();
    let generation = session.timer.next_generation();
    let session_id = session.session_id;
    let weak = Arc::downgrade(cell);

    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let Some(cell) = weak.upgrade() else {
            return;
        };
        let mut session = cell.lock().await;
        if !session.timer.claim(generation) {
            debug!(session_id, generation, "suppressed superseded timer");
            return;
        }
        debug!(session_id, generation, "timer fired");
        callback(&cell, &mut session);
    });

    session.timer.pending = Some(PendingTimer { generation, handle });
    debug!(session_id, generation, ?delay, "timer scheduled");
}

/// Cancel the pending timer of `session`, if any. Idempotent.
pub fn cancel(session: &mut Session) {
    if session.timer.cancel() {
        debug!(session_id = session.session_id, "timer cancelled");
    }
}
