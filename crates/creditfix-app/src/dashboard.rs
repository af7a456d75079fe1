// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

use crate::events::{EventSink, NoopSink, SectionEvent};
use crate::identity::AssembledReport;
use crate::save_status::SaveStatusMap;
use crate::section::{CountPolicy, SectionCommand, SectionController, SectionKind, SectionSummary};
use crate::timer::TimerQueue;
use crate::view::SectionViewState;
use crate::viewport::Viewport;

/// The negative-items part of the report page: both sections, the
/// save-status map they read, and the clock their sequencers run on.
#[derive(Debug)]
pub struct ReportView<K: EventSink = NoopSink> {
    report: AssembledReport,
    save_status: SaveStatusMap,
    policy: CountPolicy,
    sections: [SectionController; 2],
    timers: TimerQueue,
    sink: K,
}

const fn section_slot(kind: SectionKind) -> usize {
    match kind {
        SectionKind::HardInquiries => 0,
        SectionKind::PublicRecords => 1,
    }
}

impl ReportView<NoopSink> {
    pub fn new(report: AssembledReport, policy: CountPolicy) -> Self {
        Self::with_sink(report, policy, NoopSink)
    }
}

impl<K: EventSink> ReportView<K> {
    pub fn with_sink(report: AssembledReport, policy: CountPolicy, sink: K) -> Self {
        Self {
            report,
            save_status: SaveStatusMap::new(),
            policy,
            sections: SectionKind::ALL.map(SectionController::new),
            timers: TimerQueue::new(),
            sink,
        }
    }

    /// Mounts every section with `view` instead of the collapsed default.
    pub fn with_initial_view(mut self, view: &SectionViewState) -> Self {
        self.sections = SectionKind::ALL.map(|kind| SectionController::with_view(kind, view.clone()));
        self
    }

    pub fn report(&self) -> &AssembledReport {
        &self.report
    }

    pub fn save_status(&self) -> &SaveStatusMap {
        &self.save_status
    }

    pub fn policy(&self) -> CountPolicy {
        self.policy
    }

    pub fn section(&self, kind: SectionKind) -> &SectionController {
        &self.sections[section_slot(kind)]
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn dispatch(&mut self, kind: SectionKind, command: SectionCommand) -> Vec<SectionEvent> {
        let events = self.sections[section_slot(kind)].dispatch(command, &mut self.timers);
        for event in &events {
            match event {
                SectionEvent::DisputeSaved {
                    record_id, status, ..
                } => {
                    self.save_status.insert(record_id.clone(), status.clone());
                }
                SectionEvent::DisputeReset { record_id, .. } => {
                    self.save_status.remove(record_id);
                }
                _ => {}
            }
        }
        self.publish(&events);
        events
    }

    /// Moves the clock forward by `elapsed`, running every phase that comes due
    /// on the way in deadline order.
    pub fn advance<V: Viewport>(&mut self, elapsed: Duration, viewport: &mut V) -> Vec<SectionEvent> {
        let until = self.timers.now().saturating_add(elapsed);
        let mut events = Vec::new();

        while let Some(handle) = self.timers.pop_due(until) {
            for section in &mut self.sections {
                if let Some(fired) = section.on_timer(handle, &mut self.timers, viewport) {
                    events.extend(fired);
                    break;
                }
            }
        }
        self.timers.settle(until);

        self.publish(&events);
        events
    }

    pub fn summary(&self, kind: SectionKind) -> SectionSummary {
        self.section(kind)
            .summarize(&self.report, &self.save_status, self.policy)
    }

    pub fn summaries(&self) -> Vec<SectionSummary> {
        SectionKind::ALL
            .iter()
            .map(|kind| self.summary(*kind))
            .collect()
    }

    /// Cancels every outstanding phase. Runs automatically on drop.
    pub fn teardown(&mut self) -> Vec<SectionEvent> {
        let mut events = Vec::new();
        for section in &mut self.sections {
            events.extend(section.teardown(&mut self.timers));
        }
        self.timers.cancel_all();
        self.publish(&events);
        events
    }

    fn publish(&mut self, events: &[SectionEvent]) {
        for event in events {
            self.sink.emit(event);
        }
    }
}

impl<K: EventSink> Drop for ReportView<K> {
    fn drop(&mut self) {
        self.teardown();
    }
}
