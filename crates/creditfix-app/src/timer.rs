// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Cancellable scheduled tasks on a virtual clock.
//!
//! The owner advances [`TimerQueue`] with elapsed time and routes every due
//! handle back to whoever scheduled it. Nothing runs on its own thread, so a
//! cancelled handle can never fire.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Returns `false` when the handle already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    handle: TimerHandle,
    deadline: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerQueue {
    now: Duration,
    next_handle: u64,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|timer| timer.deadline).min()
    }

    /// Removes the earliest timer due at or before `until` and moves the clock
    /// to its deadline, so anything scheduled while handling it is measured
    /// from the moment it fired. Ties go to the timer scheduled first.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let (position, timer) = self
            .pending
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= until)
            .min_by_key(|(_, timer)| (timer.deadline, timer.handle))?;
        self.pending.swap_remove(position);
        self.now = self.now.max(timer.deadline);
        Some(timer.handle)
    }

    /// Moves the clock forward once every due timer has been popped.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_handle = self.next_handle.saturating_add(1);
        let handle = TimerHandle(self.next_handle);
        self.pending.push(PendingTimer {
            handle,
            deadline: self.now.saturating_add(delay),
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        before != self.pending.len()
    }
}
