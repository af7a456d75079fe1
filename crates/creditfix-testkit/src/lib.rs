// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use creditfix_app::{
    Bureau, CreditReport, CreditResponse, InquiryRecord, LiabilityRecord, OneOrMany, PublicRecord,
    ScrollOutcome, SectionKind, Viewport,
};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use time::macros::{date, format_description};
use time::{Date, Duration};

const CREDITORS: [&str; 14] = [
    "Capital Harbor Bank",
    "Northwind Auto Finance",
    "Summit Card Services",
    "Lakeshore Credit Union",
    "Pioneer Mortgage",
    "Bright Path Lending",
    "Evergreen Retail Card",
    "Frontier Wireless",
    "Metro Home Loans",
    "Canyon Student Finance",
    "Heritage Savings",
    "Apex Consumer Credit",
    "Greenleaf Utilities",
    "Sparks Furniture Credit",
];

const PUBLIC_RECORD_TYPES: [&str; 5] = [
    "BankruptcyChapter7",
    "BankruptcyChapter13",
    "CivilJudgment",
    "TaxLienFederal",
    "TaxLienState",
];

const COURTS: [&str; 6] = [
    "US Bankruptcy Court Western District",
    "County Circuit Court",
    "Superior Court of Madison County",
    "District Court of Travis County",
    "US District Court Eastern District",
    "Municipal Court",
];

/// Reference date the fixtures are built around.
pub const fn fixture_reference_date() -> Date {
    date!(2025 - 06 - 18)
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.next_u64() % (span as u64)) as i64
    }
}

/// How many of each record kind a generated report holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportShape {
    pub negative_accounts: usize,
    pub clean_accounts: usize,
    pub public_records: usize,
    pub recent_inquiries: usize,
    pub older_inquiries: usize,
}

impl Default for ReportShape {
    fn default() -> Self {
        Self {
            negative_accounts: 4,
            clean_accounts: 6,
            public_records: 3,
            recent_inquiries: 5,
            older_inquiries: 3,
        }
    }
}

/// Seeded generator for bureau-report JSON in the upstream shape.
#[derive(Debug, Clone)]
pub struct ReportFaker {
    rng: DeterministicRng,
    reference: Date,
}

impl ReportFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            reference: fixture_reference_date(),
        }
    }

    pub fn with_reference(mut self, reference: Date) -> Self {
        self.reference = reference;
        self
    }

    pub fn report_json(&mut self, shape: &ReportShape) -> Value {
        let mut liabilities = Vec::new();
        for index in 0..shape.negative_accounts {
            liabilities.push(self.liability_json(index, true));
        }
        for index in 0..shape.clean_accounts {
            liabilities.push(self.liability_json(shape.negative_accounts + index, false));
        }

        let public_records = (0..shape.public_records)
            .map(|index| self.public_record_json(index))
            .collect::<Vec<_>>();

        let mut inquiries = Vec::new();
        for index in 0..shape.recent_inquiries {
            let days_back = self.rng.int_range(0, 700);
            inquiries.push(self.inquiry_json(index, days_back));
        }
        for index in 0..shape.older_inquiries {
            let days_back = self.rng.int_range(760, 1_800);
            inquiries.push(self.inquiry_json(shape.recent_inquiries + index, days_back));
        }

        json!({
            "CREDIT_RESPONSE": {
                "CREDIT_LIABILITY": liabilities,
                "CREDIT_PUBLIC_RECORD": public_records,
                "CREDIT_INQUIRY": inquiries,
            }
        })
    }

    pub fn report(&mut self, shape: &ReportShape) -> Result<CreditReport> {
        serde_json::from_value(self.report_json(shape)).context("decode generated report")
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn date_text(&self, days_back: i64) -> String {
        let format = format_description!("[year]-[month]-[day]");
        (self.reference - Duration::days(days_back))
            .format(&format)
            .unwrap_or_default()
    }

    fn inquiry_json(&mut self, index: usize, days_back: i64) -> Value {
        let bureau = Bureau::ALL[self.rng.int_n(Bureau::ALL.len())];
        json!({
            "@CreditLiabilityID": format!("INQ{:03}", index + 1),
            "@_Date": self.date_text(days_back),
            "@_Name": self.pick(&CREDITORS),
            "CREDIT_REPOSITORY": { "@_SourceType": bureau.label() },
        })
    }

    // Every third record lacks key fields so it exercises synthetic ids.
    fn public_record_json(&mut self, index: usize) -> Value {
        let filed_days_back = self.rng.int_range(365, 2_500);
        let mut record = json!({
            "@_Type": self.pick(&PUBLIC_RECORD_TYPES),
            "@_CourtName": self.pick(&COURTS),
            "@_FiledDate": self.date_text(filed_days_back),
        });
        if let Some(object) = record.as_object_mut() {
            match index % 3 {
                0 => {
                    object.insert(
                        "@CreditLiabilityID".to_owned(),
                        Value::from(format!("PR{:03}", index + 1)),
                    );
                }
                1 => {
                    object.insert(
                        "@_SubscriberCode".to_owned(),
                        Value::from(format!("SUB{:05}", self.rng.int_range(10_000, 99_999))),
                    );
                }
                _ => {}
            }
        }
        record
    }

    fn liability_json(&mut self, index: usize, derogatory: bool) -> Value {
        json!({
            "@CreditLiabilityID": format!("TRADE{:03}", index + 1),
            "@_Name": self.pick(&CREDITORS),
            "@_DerogatoryDataIndicator": if derogatory { "Y" } else { "N" },
        })
    }
}

/// Demo report whose inquiry dates are laid out relative to `reference`.
pub fn demo_report(reference: Date) -> Result<CreditReport> {
    ReportFaker::new(7)
        .with_reference(reference)
        .report(&ReportShape::default())
}

pub fn inquiry_on(date: &str) -> InquiryRecord {
    InquiryRecord::default().with_date(date)
}

pub fn report_with(
    negative_accounts: usize,
    public_records: Vec<PublicRecord>,
    inquiries: Vec<InquiryRecord>,
) -> CreditReport {
    let liabilities = (0..negative_accounts)
        .map(|index| {
            LiabilityRecord::default()
                .with_liability_id(format!("TRADE{:03}", index + 1))
                .with_derogatory(true)
        })
        .collect::<Vec<_>>();
    CreditReport {
        credit_response: Some(CreditResponse {
            inquiries: OneOrMany::Many(inquiries),
            public_records: OneOrMany::Many(public_records),
            liabilities: OneOrMany::Many(liabilities),
        }),
    }
}

pub fn temp_report_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("report.json");
    Ok((dir, path))
}

pub fn write_report(path: &Path, report: &Value) -> Result<()> {
    let raw = serde_json::to_string_pretty(report).context("encode report fixture")?;
    std::fs::write(path, raw).with_context(|| format!("write report fixture {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportCall {
    ScrollIntoView(SectionKind),
    ScrollBy(i32),
    ScrollToSection(String),
}

/// Viewport double that records every scroll request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingViewport {
    pub calls: Vec<ViewportCall>,
    pub detached: bool,
}

impl RecordingViewport {
    pub fn detached() -> Self {
        Self {
            calls: Vec::new(),
            detached: true,
        }
    }

    pub fn section_scrolls(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ViewportCall::ScrollToSection(selector) => Some(selector.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Viewport for RecordingViewport {
    fn scroll_into_view(&mut self, section: SectionKind) -> ScrollOutcome {
        self.calls.push(ViewportCall::ScrollIntoView(section));
        if self.detached {
            ScrollOutcome::Skipped
        } else {
            ScrollOutcome::Scrolled
        }
    }

    fn scroll_by(&mut self, dy: i32) {
        self.calls.push(ViewportCall::ScrollBy(dy));
    }

    fn scroll_to_section(&mut self, selector: &str) {
        self.calls
            .push(ViewportCall::ScrollToSection(selector.to_owned()));
    }
}
