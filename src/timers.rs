// Timer utilities for the UI event loop
//
// Both types hand their results back over an mpsc channel so the event loop
// can `select!` on them alongside keyboard input. Neither ever touches UI
// state directly, and both abort outstanding work when dropped.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delivers a value only after it has stayed unchanged for the whole window.
///
/// Each `push` restarts the window, so a burst of updates yields just the
/// final one.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: None,
        };
        (debouncer, rx)
    }

    pub fn push(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the owner is shutting down
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// Fire-and-forget delayed delivery. Scheduled values are only cancelled
/// when the owner is dropped.
pub struct Deferred<T> {
    tx: mpsc::UnboundedSender<T>,
    tasks: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> Deferred<T> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let deferred = Self {
            tx,
            tasks: Vec::new(),
        };
        (deferred, rx)
    }

    pub fn schedule(&mut self, delay: Duration, value: T) {
        self.tasks.retain(|handle| !handle.is_finished());
        let tx = self.tx.clone();
        self.tasks.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(value);
        }));
    }

    /// Number of scheduled values not yet delivered
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.tasks
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl<T> Drop for Deferred<T> {
    fn drop(&mut self) {
        for handle in self.tasks.drain(..) {
            handle.abort();
        }
    }
}
