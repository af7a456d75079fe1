// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::RecordId;
use crate::save_status::SaveStatus;
use crate::section::SectionKind;
use crate::sequencer::Phase;
use crate::view::{InquiryGroup, ViewPhase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionEvent {
    ViewChanged {
        section: SectionKind,
        phase: ViewPhase,
    },
    GroupSaved {
        section: SectionKind,
        group: InquiryGroup,
        saved: bool,
    },
    GroupDisputeStored {
        section: SectionKind,
        group: InquiryGroup,
        selections: usize,
    },
    GroupCleared {
        section: SectionKind,
        group: InquiryGroup,
    },
    SectionReset {
        section: SectionKind,
    },
    DisputeSaved {
        section: SectionKind,
        record_id: RecordId,
        status: SaveStatus,
    },
    DisputeReset {
        section: SectionKind,
        record_id: RecordId,
    },
    SequenceStarted {
        section: SectionKind,
    },
    SequenceCancelled {
        section: SectionKind,
    },
    PhaseApplied {
        section: SectionKind,
        phase: Phase,
    },
    ScrollSkipped {
        section: SectionKind,
        phase: Phase,
    },
    SequenceCompleted {
        section: SectionKind,
    },
}

impl SectionEvent {
    pub const fn section(&self) -> SectionKind {
        match self {
            Self::ViewChanged { section, .. }
            | Self::GroupSaved { section, .. }
            | Self::GroupDisputeStored { section, .. }
            | Self::GroupCleared { section, .. }
            | Self::SectionReset { section }
            | Self::DisputeSaved { section, .. }
            | Self::DisputeReset { section, .. }
            | Self::SequenceStarted { section }
            | Self::SequenceCancelled { section }
            | Self::PhaseApplied { section, .. }
            | Self::ScrollSkipped { section, .. }
            | Self::SequenceCompleted { section } => *section,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::ViewChanged { .. } => "view_changed",
            Self::GroupSaved { .. } => "group_saved",
            Self::GroupDisputeStored { .. } => "group_dispute_stored",
            Self::GroupCleared { .. } => "group_cleared",
            Self::SectionReset { .. } => "section_reset",
            Self::DisputeSaved { .. } => "dispute_saved",
            Self::DisputeReset { .. } => "dispute_reset",
            Self::SequenceStarted { .. } => "sequence_started",
            Self::SequenceCancelled { .. } => "sequence_cancelled",
            Self::PhaseApplied { .. } => "phase_applied",
            Self::ScrollSkipped { .. } => "scroll_skipped",
            Self::SequenceCompleted { .. } => "sequence_completed",
        }
    }
}

/// Receives every event a [`crate::ReportView`] emits.
pub trait EventSink {
    fn emit(&mut self, event: &SectionEvent);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&mut self, _event: &SectionEvent) {}
}

impl EventSink for Vec<SectionEvent> {
    fn emit(&mut self, event: &SectionEvent) {
        self.push(event.clone());
    }
}
