// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::RecordId;

/// What a section currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPhase {
    Collapsed,
    ExpandedHeaderOnly,
    ExpandedOpen,
}

impl ViewPhase {
    pub const fn from_flags(collapsed: bool, expanded: bool) -> Self {
        if collapsed {
            Self::Collapsed
        } else if expanded {
            Self::ExpandedOpen
        } else {
            Self::ExpandedHeaderOnly
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Collapsed => "collapsed",
            Self::ExpandedHeaderOnly => "header only",
            Self::ExpandedOpen => "open",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InquiryGroup {
    Recent,
    Older,
}

impl InquiryGroup {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Older => "older",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquirySelection {
    pub id: RecordId,
    pub bureau: String,
    pub creditor: String,
}

/// What the inquiry editor hands over when a group dispute is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDisputePayload {
    pub selected_inquiries: Vec<InquirySelection>,
    pub reason: String,
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDispute {
    pub reason: String,
    pub instruction: String,
    pub selected_inquiries: Vec<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupState {
    pub saved: bool,
    pub selections: Vec<InquirySelection>,
    pub dispute: Option<GroupDispute>,
}

impl GroupState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn apply_payload(&mut self, payload: GroupDisputePayload) {
        self.dispute = Some(GroupDispute {
            reason: payload.reason,
            instruction: payload.instruction,
            selected_inquiries: payload
                .selected_inquiries
                .iter()
                .map(|selection| selection.id.clone())
                .collect(),
        });
        self.selections = payload.selected_inquiries;
        self.saved = true;
    }
}

/// Per-section view state. The header stays visible while `collapsed` is
/// false, even when `expanded` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionViewState {
    pub collapsed: bool,
    pub expanded: bool,
    pub recent: GroupState,
    pub older: GroupState,
}

impl Default for SectionViewState {
    fn default() -> Self {
        Self {
            collapsed: true,
            expanded: false,
            recent: GroupState::default(),
            older: GroupState::default(),
        }
    }
}

impl SectionViewState {
    pub const fn phase(&self) -> ViewPhase {
        ViewPhase::from_flags(self.collapsed, self.expanded)
    }

    pub fn group(&self, group: InquiryGroup) -> &GroupState {
        match group {
            InquiryGroup::Recent => &self.recent,
            InquiryGroup::Older => &self.older,
        }
    }

    pub fn group_mut(&mut self, group: InquiryGroup) -> &mut GroupState {
        match group {
            InquiryGroup::Recent => &mut self.recent,
            InquiryGroup::Older => &mut self.older,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupDisputePayload, GroupState, InquirySelection, SectionViewState, ViewPhase};
    use crate::ids::RecordId;

    #[test]
    fn phase_follows_flags() {
        assert_eq!(ViewPhase::from_flags(true, true), ViewPhase::Collapsed);
        assert_eq!(ViewPhase::from_flags(false, true), ViewPhase::ExpandedOpen);
        assert_eq!(
            ViewPhase::from_flags(false, false),
            ViewPhase::ExpandedHeaderOnly
        );
        assert_eq!(SectionViewState::default().phase(), ViewPhase::Collapsed);
    }

    #[test]
    fn payload_marks_group_saved_and_keeps_selection_order() {
        let mut group = GroupState::default();
        group.apply_payload(GroupDisputePayload {
            selected_inquiries: vec![
                InquirySelection {
                    id: RecordId::from("INQ-2"),
                    bureau: "EQ".to_owned(),
                    creditor: "ACME".to_owned(),
                },
                InquirySelection {
                    id: RecordId::from("INQ-1"),
                    bureau: "TU".to_owned(),
                    creditor: "ZED".to_owned(),
                },
            ],
            reason: "Not authorized".to_owned(),
            instruction: "Remove".to_owned(),
        });

        assert!(group.saved);
        let dispute = group.dispute.as_ref().map(|d| d.selected_inquiries.clone());
        assert_eq!(
            dispute,
            Some(vec![RecordId::from("INQ-2"), RecordId::from("INQ-1")])
        );

        group.clear();
        assert_eq!(group, GroupState::default());
    }
}
