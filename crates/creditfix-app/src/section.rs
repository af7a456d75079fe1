// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::counts::{
    Noun, count_recent, count_unsaved_keyed, inquiry_status_text, public_record_status_text,
};
use crate::events::SectionEvent;
use crate::identity::AssembledReport;
use crate::ids::RecordId;
use crate::save_status::{SaveStatus, SaveStatusMap};
use crate::sequencer::{Phase, PhaseSequencer, SCROLL_OFFSET_CORRECTION, TriggerOutcome};
use crate::timer::{Scheduler, TimerHandle};
use crate::view::{GroupDisputePayload, InquiryGroup, SectionViewState, ViewPhase};
use crate::viewport::{ScrollOutcome, Viewport, section_selector};
use time::Date;

pub const CREDIT_ACCOUNTS_ANCHOR: &str = "credit-accounts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    HardInquiries,
    PublicRecords,
}

impl SectionKind {
    pub const ALL: [Self; 2] = [Self::HardInquiries, Self::PublicRecords];

    pub const fn title(self) -> &'static str {
        match self {
            Self::HardInquiries => "Hard Inquiries",
            Self::PublicRecords => "Public Records",
        }
    }

    pub const fn anchor(self) -> &'static str {
        match self {
            Self::HardInquiries => "hard-inquiries",
            Self::PublicRecords => "public-records",
        }
    }

    /// Section the viewport moves to once this one auto-collapses.
    pub const fn next_section_anchor(self) -> Option<&'static str> {
        match self {
            Self::HardInquiries => Some(CREDIT_ACCOUNTS_ANCHOR),
            Self::PublicRecords => None,
        }
    }

    pub const fn noun(self) -> Noun {
        match self {
            Self::HardInquiries => Noun::INQUIRY,
            Self::PublicRecords => Noun::PUBLIC_RECORD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionCommand {
    HeaderClicked,
    /// Clears both inquiry groups; collapse/expand flags stay as they are.
    Reset,
    GroupSaved {
        group: InquiryGroup,
        saved: bool,
    },
    /// `None` is an explicit clear of the group.
    GroupDisputeSaved {
        group: InquiryGroup,
        payload: Option<GroupDisputePayload>,
    },
    DisputeSaved {
        record_id: RecordId,
        status: SaveStatus,
    },
    DisputeReset {
        record_id: RecordId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountPolicy {
    pub reference_date: Date,
    pub window_months: u32,
}

impl CountPolicy {
    pub const fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            window_months: crate::counts::RECENT_WINDOW_MONTHS,
        }
    }

    pub const fn with_window_months(mut self, window_months: u32) -> Self {
        self.window_months = window_months;
        self
    }
}

/// Everything a section header needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub section: SectionKind,
    pub visible: bool,
    pub phase: ViewPhase,
    pub badge: usize,
    pub total: usize,
    pub recent: Option<usize>,
    pub unsaved: usize,
    pub attention: bool,
    pub status_text: String,
    pub count_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionController {
    kind: SectionKind,
    view: SectionViewState,
    sequencer: PhaseSequencer,
    last_scroll: Option<ScrollOutcome>,
}

impl SectionController {
    pub fn new(kind: SectionKind) -> Self {
        Self::with_view(kind, SectionViewState::default())
    }

    pub fn with_view(kind: SectionKind, view: SectionViewState) -> Self {
        Self {
            kind,
            view,
            sequencer: PhaseSequencer::new(),
            last_scroll: None,
        }
    }

    pub const fn kind(&self) -> SectionKind {
        self.kind
    }

    pub const fn view(&self) -> &SectionViewState {
        &self.view
    }

    pub const fn phase(&self) -> ViewPhase {
        self.view.phase()
    }

    pub const fn sequencer(&self) -> &PhaseSequencer {
        &self.sequencer
    }

    pub fn dispatch<S: Scheduler>(
        &mut self,
        command: SectionCommand,
        scheduler: &mut S,
    ) -> Vec<SectionEvent> {
        let section = self.kind;
        let before = self.phase();
        let mut events = Vec::new();

        match command {
            SectionCommand::HeaderClicked => {
                if self.view.collapsed {
                    self.view.collapsed = false;
                    self.view.expanded = true;
                } else {
                    self.view.expanded = !self.view.expanded;
                }
            }
            SectionCommand::Reset => {
                self.view.recent.clear();
                self.view.older.clear();
                events.push(SectionEvent::SectionReset { section });
            }
            SectionCommand::GroupSaved { group, saved } => {
                self.view.group_mut(group).saved = saved;
                events.push(SectionEvent::GroupSaved {
                    section,
                    group,
                    saved,
                });
            }
            SectionCommand::GroupDisputeSaved {
                group,
                payload: Some(payload),
            } => {
                let selections = payload.selected_inquiries.len();
                self.view.group_mut(group).apply_payload(payload);
                events.push(SectionEvent::GroupDisputeStored {
                    section,
                    group,
                    selections,
                });
            }
            SectionCommand::GroupDisputeSaved {
                group,
                payload: None,
            } => {
                self.view.group_mut(group).clear();
                events.push(SectionEvent::GroupCleared { section, group });
            }
            SectionCommand::DisputeSaved { record_id, status } => {
                events.push(SectionEvent::DisputeSaved {
                    section,
                    record_id,
                    status,
                });
            }
            SectionCommand::DisputeReset { record_id } => {
                events.push(SectionEvent::DisputeReset { section, record_id });
            }
        }

        if self.phase() != before {
            events.push(SectionEvent::ViewChanged {
                section,
                phase: self.phase(),
            });
        }
        self.sync_sequencer(scheduler, &mut events);
        events
    }

    /// Runs the phase owned by `handle`. Returns `None` when the handle
    /// belongs to someone else.
    pub fn on_timer<S: Scheduler, V: Viewport>(
        &mut self,
        handle: TimerHandle,
        scheduler: &mut S,
        viewport: &mut V,
    ) -> Option<Vec<SectionEvent>> {
        let phase = self.sequencer.on_timer(handle, scheduler)?;
        Some(self.apply_phase(phase, viewport))
    }

    /// Cancels any pending phase; the view must not change after this.
    pub fn teardown<S: Scheduler>(&mut self, scheduler: &mut S) -> Vec<SectionEvent> {
        if self.sequencer.cancel(scheduler) {
            vec![SectionEvent::SequenceCancelled { section: self.kind }]
        } else {
            Vec::new()
        }
    }

    fn trigger(&self) -> bool {
        match self.kind {
            SectionKind::HardInquiries => self.view.recent.saved,
            SectionKind::PublicRecords => false,
        }
    }

    fn sync_sequencer<S: Scheduler>(&mut self, scheduler: &mut S, events: &mut Vec<SectionEvent>) {
        let section = self.kind;
        match self.sequencer.observe(self.trigger(), self.phase(), scheduler) {
            TriggerOutcome::Started => {
                self.last_scroll = None;
                events.push(SectionEvent::SequenceStarted { section });
            }
            TriggerOutcome::Cancelled => events.push(SectionEvent::SequenceCancelled { section }),
            TriggerOutcome::Ignored => {}
        }
    }

    fn apply_phase<V: Viewport>(&mut self, phase: Phase, viewport: &mut V) -> Vec<SectionEvent> {
        let section = self.kind;
        let mut events = Vec::new();
        let mut applied = true;

        match phase {
            Phase::ScrollIntoView => {
                let outcome = viewport.scroll_into_view(section);
                applied = outcome == ScrollOutcome::Scrolled;
                self.last_scroll = Some(outcome);
            }
            Phase::OffsetCorrection => {
                applied = self.last_scroll == Some(ScrollOutcome::Scrolled);
                if applied {
                    viewport.scroll_by(SCROLL_OFFSET_CORRECTION);
                }
            }
            Phase::HideContent => {
                self.view.expanded = false;
            }
            Phase::Collapse => {
                self.view.collapsed = true;
            }
            Phase::ScrollToNext => {
                if let Some(anchor) = section.next_section_anchor() {
                    viewport.scroll_to_section(&section_selector(anchor));
                }
            }
        }

        events.push(if applied {
            SectionEvent::PhaseApplied { section, phase }
        } else {
            SectionEvent::ScrollSkipped { section, phase }
        });
        if matches!(phase, Phase::HideContent | Phase::Collapse) {
            events.push(SectionEvent::ViewChanged {
                section,
                phase: self.phase(),
            });
        }
        if phase == Phase::ScrollToNext {
            events.push(SectionEvent::SequenceCompleted { section });
        }
        events
    }

    /// Derives the header for this section from the current inputs. Recomputed
    /// from scratch on every call.
    pub fn summarize(
        &self,
        report: &AssembledReport,
        save_status: &SaveStatusMap,
        policy: CountPolicy,
    ) -> SectionSummary {
        let phase = self.phase();
        match self.kind {
            SectionKind::HardInquiries => {
                let records = report.inquiries();
                let total = records.len();
                let recent = count_recent(records, policy.reference_date, policy.window_months);
                SectionSummary {
                    section: self.kind,
                    visible: true,
                    phase,
                    badge: total,
                    total,
                    recent: Some(recent),
                    unsaved: count_unsaved_keyed(records, save_status),
                    attention: recent > 0,
                    status_text: inquiry_status_text(recent),
                    count_label: Noun::INQUIRY.count_label(total),
                }
            }
            SectionKind::PublicRecords => {
                let records = report.public_records();
                let total = records.len();
                let unsaved = count_unsaved_keyed(records, save_status);
                let badge = if phase == ViewPhase::Collapsed && unsaved > 0 {
                    unsaved
                } else {
                    total
                };
                SectionSummary {
                    section: self.kind,
                    visible: total > 0,
                    phase,
                    badge,
                    total,
                    recent: None,
                    unsaved,
                    attention: unsaved > 0,
                    status_text: public_record_status_text(total, unsaved),
                    count_label: Noun::RECORD.count_label(total),
                }
            }
        }
    }
}
