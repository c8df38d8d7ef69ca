//! Task queue collaborator.
//!
//! Three views of the same keys:
//!
//! - *pending*: FIFO of wire-format keys waiting for a robot (`pop`).
//! - *open*: every key pushed and not yet completed, popped or not.
//! - *completed*: keys whose item was dropped at the station, waiting for
//!   the order processor (`take_completed`).
//!
//! `pop` hands out the raw string because that is what crosses the process
//! boundary; [`TaskQueue::pop_key`] parses it on the spot.

use std::collections::{BTreeSet, VecDeque};

use crate::error::TaskResult;
use crate::key::{TaskGroupKey, TaskKey};

pub trait TaskQueue {
    /// Append a key to the pending FIFO and mark it open.  A key that is
    /// already open is ignored, popped or not.
    fn push(&mut self, key: TaskKey);

    /// Remove the oldest pending key.  `None` means "no work now".
    fn pop(&mut self) -> Option<String>;

    fn is_open(&self, key: &TaskKey) -> bool;

    /// Open keys in key order.
    fn open_keys(&self) -> Vec<TaskKey>;

    /// Close `key` and hand it to the order processor.  Closing a key that
    /// is not open is a no-op and returns `false`.
    fn complete(&mut self, key: TaskKey) -> bool;

    /// Put a popped key back at the tail of the pending FIFO.  A key that is
    /// still pending stays where it is.
    fn requeue(&mut self, key: TaskKey);

    /// Drain completed keys in completion order.
    fn take_completed(&mut self) -> Vec<TaskKey>;

    /// [`pop`](Self::pop) and parse.  A malformed key is consumed and
    /// reported; it is never pushed back.
    fn pop_key(&mut self) -> TaskResult<Option<TaskKey>> {
        self.pop().map(|raw| raw.parse()).transpose()
    }

    /// Open keys belonging to one order at one station.
    fn open_in_group(&self, group: TaskGroupKey) -> Vec<TaskKey> {
        self.open_keys().into_iter().filter(|k| k.group() == group).collect()
    }
}

/// In-process [`TaskQueue`].
#[derive(Debug, Default)]
pub struct MemoryTaskQueue {
    pending:   VecDeque<String>,
    open:      BTreeSet<TaskKey>,
    completed: Vec<TaskKey>,
}

impl MemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a raw string without parsing or marking anything open.
    pub fn push_raw(&mut self, raw: impl Into<String>) {
        self.pending.push_back(raw.into());
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }
}

impl TaskQueue for MemoryTaskQueue {
    fn push(&mut self, key: TaskKey) {
        if !self.open.insert(key) {
            tracing::debug!(task = %key, "task already open, push ignored");
            return;
        }
        self.pending.push_back(key.to_string());
    }

    fn pop(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    fn is_open(&self, key: &TaskKey) -> bool {
        self.open.contains(key)
    }

    fn open_keys(&self) -> Vec<TaskKey> {
        self.open.iter().copied().collect()
    }

    fn complete(&mut self, key: TaskKey) -> bool {
        if !self.open.remove(&key) {
            tracing::warn!(task = %key, "completing a task that is not open");
            return false;
        }
        self.completed.push(key);
        true
    }

    fn requeue(&mut self, key: TaskKey) {
        self.open.insert(key);
        let raw = key.to_string();
        if self.pending.contains(&raw) {
            tracing::debug!(task = %key, "task still pending, requeue ignored");
            return;
        }
        tracing::debug!(task = %key, "task requeued");
        self.pending.push_back(raw);
    }

    fn take_completed(&mut self) -> Vec<TaskKey> {
        std::mem::take(&mut self.completed)
    }
}
