// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::ids::RecordId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisputePayload {
    pub reason: String,
    pub instruction: String,
    pub violations: Vec<String>,
}

impl DisputePayload {
    pub fn new(reason: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            instruction: instruction.into(),
            violations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reason.trim().is_empty() && self.instruction.trim().is_empty()
    }
}

/// What a dispute editor committed for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Explicit "saved, no dispute" (or an unset flag).
    Flag(bool),
    Dispute(DisputePayload),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        match self {
            Self::Flag(saved) => *saved,
            Self::Dispute(payload) => !payload.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveStatusMap {
    entries: BTreeMap<RecordId, SaveStatus>,
}

impl SaveStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &RecordId) -> Option<&SaveStatus> {
        self.entries.get(id)
    }

    /// Absent ids and unsaved values both read as "not saved".
    pub fn is_saved(&self, id: &RecordId) -> bool {
        self.entries.get(id).is_some_and(SaveStatus::is_saved)
    }

    pub fn insert(&mut self, id: RecordId, status: SaveStatus) -> Option<SaveStatus> {
        self.entries.insert(id, status)
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<SaveStatus> {
        self.entries.remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordId, &SaveStatus)> {
        self.entries.iter()
    }
}

impl FromIterator<(RecordId, SaveStatus)> for SaveStatusMap {
    fn from_iter<I: IntoIterator<Item = (RecordId, SaveStatus)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
