//! In-flight operation tracking.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts store operations that are waiting on the server.
///
/// Each operation holds a [`LoadingGuard`] for its whole duration, so the
/// count drops back even when the operation fails or its future is dropped.
#[derive(Debug, Default)]
pub struct LoadingTracker {
    in_flight: AtomicUsize,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks one operation as started until the guard is dropped.
    pub fn start(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard { tracker: self }
    }

    /// Returns true while any operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Keeps one operation counted as in flight.
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    tracker: &'a LoadingTracker,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
