// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Badge and status-line counts.
//!
//! Everything here is a pure function of its arguments and is recomputed on
//! every call. Nothing caches a result: two calls with the same records,
//! save-status map and reference date must agree, and a save must show up in
//! the very next derivation.

use time::{Date, Month};

use crate::identity::KeyedRecord;
use crate::ids::RecordId;
use crate::report::{InquiryRecord, OneOrMany};
use crate::save_status::SaveStatusMap;

pub const RECENT_WINDOW_MONTHS: u32 = 24;

/// Records that may carry a report date.
pub trait Dated {
    fn report_date(&self) -> Option<Date>;
}

impl Dated for InquiryRecord {
    fn report_date(&self) -> Option<Date> {
        self.date()
    }
}

impl<R: Dated> Dated for KeyedRecord<R> {
    fn report_date(&self) -> Option<Date> {
        self.record.report_date()
    }
}

pub fn shift_date_by_months(date: Date, months: i32) -> Option<Date> {
    let base_month = i32::from(date.month() as u8);
    let total_month = base_month - 1 + months;
    let year = date.year() + total_month.div_euclid(12);
    let month_number = (total_month.rem_euclid(12) + 1) as u8;
    let month = Month::try_from(month_number).ok()?;
    let max_day = last_day_of_month(year, month)?;
    Date::from_calendar_date(year, month, date.day().min(max_day)).ok()
}

fn last_day_of_month(year: i32, month: Month) -> Option<u8> {
    let (next_year, next_month) = if month == Month::December {
        (year + 1, Month::January)
    } else {
        (year, month.next())
    };

    let first_next_month = Date::from_calendar_date(next_year, next_month, 1).ok()?;
    let last = first_next_month.previous_day()?;
    Some(last.day())
}

/// Inclusive lower bound of the recent window ending at `reference`.
pub fn window_start(reference: Date, window_months: u32) -> Date {
    let months = i32::try_from(window_months).unwrap_or(i32::MAX);
    shift_date_by_months(reference, months.saturating_neg()).unwrap_or(Date::MIN)
}

/// Records dated within `[reference - window_months, reference]`.
pub fn count_recent<R: Dated>(records: &[R], reference: Date, window_months: u32) -> usize {
    let start = window_start(reference, window_months);
    records
        .iter()
        .filter_map(Dated::report_date)
        .filter(|date| (start..=reference).contains(date))
        .count()
}

pub fn count_total<T>(records: &OneOrMany<T>) -> usize {
    records.as_slice().len()
}

/// Records whose identifier is missing from `save_status` or maps to an
/// unsaved value.
pub fn count_unsaved<R, F>(records: &[R], save_status: &SaveStatusMap, identify: F) -> usize
where
    F: Fn(usize, &R) -> RecordId,
{
    records
        .iter()
        .enumerate()
        .filter(|(index, record)| !save_status.is_saved(&identify(*index, *record)))
        .count()
}

/// Convenience for records whose ids were assigned at assembly.
pub fn count_unsaved_keyed<R>(records: &[KeyedRecord<R>], save_status: &SaveStatusMap) -> usize {
    count_unsaved(records, save_status, |_, keyed| keyed.id.clone())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Noun {
    pub singular: &'static str,
    pub plural: &'static str,
}

impl Noun {
    pub const INQUIRY: Self = Self {
        singular: "inquiry",
        plural: "inquiries",
    };
    pub const PUBLIC_RECORD: Self = Self {
        singular: "public record",
        plural: "public records",
    };
    pub const RECORD: Self = Self {
        singular: "record",
        plural: "records",
    };
    pub const ACCOUNT: Self = Self {
        singular: "account",
        plural: "accounts",
    };

    pub const fn pluralize(self, count: usize) -> &'static str {
        if count == 1 {
            self.singular
        } else {
            self.plural
        }
    }

    pub fn count_label(self, count: usize) -> String {
        format!("{count} {}", self.pluralize(count))
    }
}

pub fn inquiry_status_text(recent: usize) -> String {
    if recent == 0 {
        return "You have 0 inquiries that affect your credit score".to_owned();
    }
    format!(
        "{} may be impacting your credit score",
        Noun::INQUIRY.count_label(recent)
    )
}

/// "3 inquiries need dispute review". The verb agrees with the count, so a
/// single record reads "1 inquiry needs dispute review".
pub fn unsaved_review_text(unsaved: usize, noun: Noun) -> String {
    let verb = if unsaved == 1 { "needs" } else { "need" };
    format!("{} {verb} dispute review", noun.count_label(unsaved))
}

/// Status line for the public records section. Unsaved records take priority
/// over the total. The verb agrees with the count ("1 public record is", "2
/// public records are"); zero keeps the fixed "There are 0" phrasing.
pub fn public_record_status_text(total: usize, unsaved: usize) -> String {
    if unsaved > 0 {
        return unsaved_review_text(unsaved, Noun::PUBLIC_RECORD);
    }
    if total == 0 {
        return "There are 0 public records impacting your credit score".to_owned();
    }
    let verb = if total == 1 { "is" } else { "are" };
    format!(
        "{} {verb} impacting your credit score",
        Noun::PUBLIC_RECORD.count_label(total)
    )
}

#[cfg(test)]
mod tests {
    use super::{
        Noun, count_recent, count_total, count_unsaved, inquiry_status_text,
        public_record_status_text, shift_date_by_months, unsaved_review_text, window_start,
    };
    use crate::identity::identify;
    use crate::ids::RecordId;
    use crate::report::{InquiryRecord, OneOrMany, PublicRecord};
    use crate::save_status::{SaveStatus, SaveStatusMap};
    use time::{Date, Month};

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid test date")
    }

    fn inquiry(raw_date: &str) -> InquiryRecord {
        InquiryRecord::default().with_date(raw_date)
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let reference = date(2025, Month::June, 18);
        let records = vec![
            inquiry("2023-06-18"),
            inquiry("2023-06-17"),
            inquiry("2025-06-18"),
            inquiry("2025-06-19"),
        ];
        assert_eq!(count_recent(&records, reference, 24), 2);
    }

    #[test]
    fn unparseable_dates_are_excluded() {
        let reference = date(2025, Month::June, 18);
        let records = vec![
            inquiry("soon"),
            InquiryRecord::default(),
            inquiry("2024-12-01"),
        ];
        assert_eq!(count_recent(&records, reference, 24), 1);
    }

    #[test]
    fn window_start_clamps_to_month_end() {
        assert_eq!(
            window_start(date(2024, Month::March, 31), 1),
            date(2024, Month::February, 29)
        );
        assert_eq!(
            shift_date_by_months(date(2025, Month::January, 15), -13),
            Some(date(2023, Month::December, 15))
        );
    }

    #[test]
    fn total_treats_bare_object_as_one_element() {
        let single = OneOrMany::One(inquiry("2024-01-01"));
        let sequence = OneOrMany::Many(vec![inquiry("2024-01-01")]);
        assert_eq!(count_total(&single), count_total(&sequence));
        assert_eq!(count_total(&OneOrMany::<InquiryRecord>::default()), 0);
    }

    #[test]
    fn unsaved_is_total_for_empty_map_and_never_grows_with_saves() {
        let records = vec![
            PublicRecord::default().with_liability_id("PR-1"),
            PublicRecord::default(),
            PublicRecord::default().with_subscriber_code("SUB-2"),
        ];
        let offset = 17;
        let identify_at = |index: usize, record: &PublicRecord| identify(record, offset + index);

        let mut map = SaveStatusMap::new();
        let mut previous = count_unsaved(&records, &map, identify_at);
        assert_eq!(previous, records.len());

        for id in ["PR-1", "record_18", "SUB-2"] {
            map.insert(RecordId::from(id), SaveStatus::Flag(true));
            let current = count_unsaved(&records, &map, identify_at);
            assert!(current <= previous);
            previous = current;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn counts_are_idempotent() {
        let reference = date(2025, Month::June, 18);
        let records = vec![inquiry("2024-05-05"), inquiry("2020-01-01")];
        let map = SaveStatusMap::new();
        let identify_at = |index: usize, record: &InquiryRecord| identify(record, index);
        assert_eq!(
            count_recent(&records, reference, 24),
            count_recent(&records, reference, 24)
        );
        assert_eq!(
            count_unsaved(&records, &map, identify_at),
            count_unsaved(&records, &map, identify_at)
        );
    }

    #[test]
    fn status_phrases_pluralize_on_exactly_one() {
        assert_eq!(
            inquiry_status_text(0),
            "You have 0 inquiries that affect your credit score"
        );
        assert_eq!(
            inquiry_status_text(1),
            "1 inquiry may be impacting your credit score"
        );
        assert_eq!(
            inquiry_status_text(3),
            "3 inquiries may be impacting your credit score"
        );
        assert_eq!(
            unsaved_review_text(1, Noun::PUBLIC_RECORD),
            "1 public record needs dispute review"
        );
        assert_eq!(
            public_record_status_text(3, 2),
            "2 public records need dispute review"
        );
        assert_eq!(
            public_record_status_text(1, 0),
            "1 public record is impacting your credit score"
        );
        assert_eq!(
            public_record_status_text(0, 0),
            "There are 0 public records impacting your credit score"
        );
    }
}
