// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Record identity.
//!
//! Report entries carry no reliable primary key. [`identify`] picks the first
//! usable key field and falls back to a positional id. [`AssembledReport`]
//! runs that derivation exactly once per record, in combined report order, so
//! every consumer (list keys, save-status lookups, badge counts) reads the same
//! precomputed [`RecordId`].

use crate::counts::count_total;
use crate::ids::RecordId;
use crate::report::{CreditReport, InquiryRecord, KeyFields, LiabilityRecord, PublicRecord};

pub const SYNTHETIC_ID_PREFIX: &str = "record_";

/// Derives the identifier for `record`.
///
/// `fallback_index` must be the record's absolute position in the combined
/// negative-item ordering, not its position within its own category.
pub fn identify<R: KeyFields + ?Sized>(record: &R, fallback_index: usize) -> RecordId {
    if let Some(id) = record.credit_liability_id() {
        return RecordId::new(id);
    }
    if let Some(code) = record.subscriber_code() {
        return RecordId::new(code);
    }
    RecordId::new(format!("{SYNTHETIC_ID_PREFIX}{fallback_index}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordCategory {
    NegativeAccounts,
    PublicRecords,
    Inquiries,
}

impl RecordCategory {
    /// Order in which categories are concatenated into the combined view.
    pub const COMBINED_ORDER: [Self; 3] = [Self::NegativeAccounts, Self::PublicRecords, Self::Inquiries];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRecord<R> {
    pub id: RecordId,
    pub absolute_index: usize,
    pub record: R,
}

fn key_records<R: KeyFields + Clone>(records: &[R], offset: usize) -> Vec<KeyedRecord<R>> {
    records
        .iter()
        .enumerate()
        .map(|(local_index, record)| {
            let absolute_index = offset + local_index;
            KeyedRecord {
                id: identify(record, absolute_index),
                absolute_index,
                record: record.clone(),
            }
        })
        .collect()
}

/// Report records with identities assigned up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledReport {
    negative_accounts: Vec<KeyedRecord<LiabilityRecord>>,
    public_records: Vec<KeyedRecord<PublicRecord>>,
    inquiries: Vec<KeyedRecord<InquiryRecord>>,
    total_liabilities: usize,
}

impl AssembledReport {
    pub fn from_report(report: &CreditReport) -> Self {
        let negatives = report.negative_accounts().cloned().collect::<Vec<_>>();
        let public_offset = negatives.len();
        let inquiry_offset = public_offset + report.public_records().len();

        let total_liabilities = report
            .credit_response
            .as_ref()
            .map_or(0, |response| count_total(&response.liabilities));

        Self {
            negative_accounts: key_records(&negatives, 0),
            public_records: key_records(report.public_records(), public_offset),
            inquiries: key_records(report.inquiries(), inquiry_offset),
            total_liabilities,
        }
    }

    pub fn negative_accounts(&self) -> &[KeyedRecord<LiabilityRecord>] {
        &self.negative_accounts
    }

    pub fn public_records(&self) -> &[KeyedRecord<PublicRecord>] {
        &self.public_records
    }

    pub fn inquiries(&self) -> &[KeyedRecord<InquiryRecord>] {
        &self.inquiries
    }

    /// All tradelines in the report, derogatory or not.
    pub fn total_liabilities(&self) -> usize {
        self.total_liabilities
    }

    pub fn category_len(&self, category: RecordCategory) -> usize {
        match category {
            RecordCategory::NegativeAccounts => self.negative_accounts.len(),
            RecordCategory::PublicRecords => self.public_records.len(),
            RecordCategory::Inquiries => self.inquiries.len(),
        }
    }

    /// Absolute index of the first record in `category`.
    pub fn offset_of(&self, category: RecordCategory) -> usize {
        RecordCategory::COMBINED_ORDER
            .iter()
            .take_while(|candidate| **candidate != category)
            .map(|candidate| self.category_len(*candidate))
            .sum()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.negative_accounts.iter().any(|keyed| &keyed.id == id)
            || self.public_records.iter().any(|keyed| &keyed.id == id)
            || self.inquiries.iter().any(|keyed| &keyed.id == id)
    }
}
