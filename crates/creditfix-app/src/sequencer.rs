// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Auto-collapse choreography.
//!
//! When a section's trigger flag rises while the section is fully open, the
//! sequencer walks a fixed list of phases. Each phase is a delay followed by
//! one action; only one timer handle is outstanding at any time, so
//! cancelling the chain means cancelling that one handle.

use std::time::Duration;

use crate::timer::{Scheduler, TimerHandle};
use crate::view::ViewPhase;

/// Vertical correction applied after scrolling a section to the top, so it
/// clears the sticky header.
pub const SCROLL_OFFSET_CORRECTION: i32 = -20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    ScrollIntoView,
    OffsetCorrection,
    HideContent,
    Collapse,
    ScrollToNext,
}

impl Phase {
    pub const ALL: [Self; 5] = [
        Self::ScrollIntoView,
        Self::OffsetCorrection,
        Self::HideContent,
        Self::Collapse,
        Self::ScrollToNext,
    ];

    /// Wait before this phase's action runs, measured from the previous phase.
    pub const fn delay(self) -> Duration {
        match self {
            Self::ScrollIntoView => Duration::from_millis(500),
            Self::OffsetCorrection => Duration::from_millis(100),
            Self::HideContent => Duration::from_millis(500),
            Self::Collapse => Duration::from_millis(300),
            Self::ScrollToNext => Duration::from_millis(500),
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::ScrollIntoView => Some(Self::OffsetCorrection),
            Self::OffsetCorrection => Some(Self::HideContent),
            Self::HideContent => Some(Self::Collapse),
            Self::Collapse => Some(Self::ScrollToNext),
            Self::ScrollToNext => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ScrollIntoView => "scroll into view",
            Self::OffsetCorrection => "offset correction",
            Self::HideContent => "hide content",
            Self::Collapse => "collapse",
            Self::ScrollToNext => "scroll to next section",
        }
    }

    pub fn total_duration() -> Duration {
        Self::ALL.iter().map(|phase| phase.delay()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequencerState {
    Idle,
    Waiting { phase: Phase, handle: TimerHandle },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSequencer {
    state: SequencerState,
    trigger_high: bool,
}

impl Default for PhaseSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseSequencer {
    pub const fn new() -> Self {
        Self {
            state: SequencerState::Idle,
            trigger_high: false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SequencerState::Waiting { .. })
    }

    pub fn pending_phase(&self) -> Option<Phase> {
        match self.state {
            SequencerState::Idle => None,
            SequencerState::Waiting { phase, .. } => Some(phase),
        }
    }

    /// Feeds the current trigger flag and view phase.
    ///
    /// Only a false -> true edge observed while the section is
    /// [`ViewPhase::ExpandedOpen`] starts the chain; an edge seen in any other
    /// phase is consumed without starting. A falling flag cancels a running
    /// chain.
    pub fn observe<S: Scheduler>(
        &mut self,
        trigger: bool,
        view: ViewPhase,
        scheduler: &mut S,
    ) -> TriggerOutcome {
        let rising = trigger && !self.trigger_high;
        self.trigger_high = trigger;

        if !trigger {
            return if self.cancel(scheduler) {
                TriggerOutcome::Cancelled
            } else {
                TriggerOutcome::Ignored
            };
        }

        if rising && view == ViewPhase::ExpandedOpen && !self.is_running() {
            self.wait_for(Phase::ScrollIntoView, scheduler);
            return TriggerOutcome::Started;
        }
        TriggerOutcome::Ignored
    }

    /// Returns the phase whose action is due now, or `None` for a handle this
    /// sequencer does not own (stale or foreign).
    pub fn on_timer<S: Scheduler>(&mut self, handle: TimerHandle, scheduler: &mut S) -> Option<Phase> {
        let SequencerState::Waiting {
            phase,
            handle: pending,
        } = self.state
        else {
            return None;
        };
        if pending != handle {
            return None;
        }

        match phase.next() {
            Some(next) => self.wait_for(next, scheduler),
            None => self.state = SequencerState::Idle,
        }
        Some(phase)
    }

    pub fn cancel<S: Scheduler>(&mut self, scheduler: &mut S) -> bool {
        let SequencerState::Waiting { handle, .. } = self.state else {
            return false;
        };
        scheduler.cancel(handle);
        self.state = SequencerState::Idle;
        true
    }

    fn wait_for<S: Scheduler>(&mut self, phase: Phase, scheduler: &mut S) {
        let handle = scheduler.schedule(phase.delay());
        self.state = SequencerState::Waiting { phase, handle };
    }
}

#[cfg(test)]
mod tests {
    use super::{Phase, PhaseSequencer, TriggerOutcome};
    use crate::timer::{Scheduler, TimerQueue};
    use crate::view::ViewPhase;
    use std::time::Duration;

    fn drain(sequencer: &mut PhaseSequencer, queue: &mut TimerQueue, until: Duration) -> Vec<(Phase, Duration)> {
        let mut fired = Vec::new();
        while let Some(handle) = queue.pop_due(until) {
            if let Some(phase) = sequencer.on_timer(handle, queue) {
                fired.push((phase, queue.now()));
            }
        }
        queue.settle(until);
        fired
    }

    #[test]
    fn phases_fire_in_order_with_individual_delays() {
        let mut queue = TimerQueue::new();
        let mut sequencer = PhaseSequencer::new();

        let outcome = sequencer.observe(true, ViewPhase::ExpandedOpen, &mut queue);
        assert_eq!(outcome, TriggerOutcome::Started);

        let fired = drain(&mut sequencer, &mut queue, Duration::from_millis(5_000));
        let expected = [
            (Phase::ScrollIntoView, 500),
            (Phase::OffsetCorrection, 600),
            (Phase::HideContent, 1_100),
            (Phase::Collapse, 1_400),
            (Phase::ScrollToNext, 1_900),
        ]
        .map(|(phase, millis)| (phase, Duration::from_millis(millis)));
        assert_eq!(fired, expected.to_vec());
        assert!(!sequencer.is_running());
        assert_eq!(Phase::total_duration(), Duration::from_millis(1_900));
    }

    #[test]
    fn steady_true_flag_does_not_refire() {
        let mut queue = TimerQueue::new();
        let mut sequencer = PhaseSequencer::new();

        sequencer.observe(true, ViewPhase::ExpandedOpen, &mut queue);
        drain(&mut sequencer, &mut queue, Duration::from_millis(2_000));

        let again = sequencer.observe(true, ViewPhase::ExpandedOpen, &mut queue);
        assert_eq!(again, TriggerOutcome::Ignored);
        assert_eq!(queue.pending_count(), 0);

        sequencer.observe(false, ViewPhase::ExpandedOpen, &mut queue);
        let fresh = sequencer.observe(true, ViewPhase::ExpandedOpen, &mut queue);
        assert_eq!(fresh, TriggerOutcome::Started);
    }

    #[test]
    fn edge_outside_open_phase_is_consumed() {
        let mut queue = TimerQueue::new();
        let mut sequencer = PhaseSequencer::new();

        let closed = sequencer.observe(true, ViewPhase::Collapsed, &mut queue);
        assert_eq!(closed, TriggerOutcome::Ignored);
        let opened_later = sequencer.observe(true, ViewPhase::ExpandedOpen, &mut queue);
        assert_eq!(opened_later, TriggerOutcome::Ignored);
        assert!(!sequencer.is_running());
    }

    #[test]
    fn falling_flag_cancels_pending_phase() {
        let mut queue = TimerQueue::new();
        let mut sequencer = PhaseSequencer::new();

        sequencer.observe(true, ViewPhase::ExpandedOpen, &mut queue);
        let partial = drain(&mut sequencer, &mut queue, Duration::from_millis(700));
        assert_eq!(partial.len(), 2);
        assert_eq!(sequencer.pending_phase(), Some(Phase::HideContent));

        let outcome = sequencer.observe(false, ViewPhase::ExpandedOpen, &mut queue);
        assert_eq!(outcome, TriggerOutcome::Cancelled);
        assert_eq!(queue.pending_count(), 0);
        assert!(drain(&mut sequencer, &mut queue, Duration::from_millis(5_000)).is_empty());
    }

    #[test]
    fn foreign_handles_are_ignored() {
        let mut queue = TimerQueue::new();
        let mut sequencer = PhaseSequencer::new();
        let foreign = queue.schedule(Duration::from_millis(1));

        sequencer.observe(true, ViewPhase::ExpandedOpen, &mut queue);
        assert_eq!(sequencer.on_timer(foreign, &mut queue), None);
        assert_eq!(sequencer.pending_phase(), Some(Phase::ScrollIntoView));
    }
}
