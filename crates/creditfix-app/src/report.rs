// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Typed view of the bureau report payload.
//!
//! The upstream document is a JSON rendering of a MISMO-style XML report: any
//! collection may arrive as a bare object or an array, attribute values may be
//! strings, numbers or junk. Every field here is optional and every accessor
//! hands back an explicit `Option`, so a malformed entry degrades to "absent"
//! instead of failing the whole report.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::Date;
use time::macros::format_description;

/// A report collection that may hold a single bare entry or a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Many(items)
    }
}

// Elements that cannot be read as `T` (strings, numbers in a record list) are
// dropped; null reads as an empty collection.
impl<'de, T: DeserializeOwned> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => Self::Many(Vec::new()),
            Value::Array(items) => Self::Many(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            ),
            other => serde_json::from_value(other).map_or_else(|_| Self::default(), Self::One),
        })
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }))
}

fn lenient_response<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<CreditResponse>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Parses `YYYY-MM-DD`, or the calendar part of an RFC 3339 style timestamp.
pub fn parse_report_date(raw: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    let trimmed = raw.trim();
    if let Ok(date) = Date::parse(trimmed, &format) {
        return Some(date);
    }

    let prefix = trimmed.get(..10)?;
    let rest = trimmed.get(10..)?;
    if !rest.starts_with(['T', 't', ' ']) {
        return None;
    }
    Date::parse(prefix, &format).ok()
}

/// Attributes every record may carry that identify it across the report.
pub trait KeyFields {
    fn credit_liability_id(&self) -> Option<&str>;
    fn subscriber_code(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bureau {
    TransUnion,
    Equifax,
    Experian,
}

impl Bureau {
    pub const ALL: [Self; 3] = [Self::TransUnion, Self::Equifax, Self::Experian];

    pub const fn code(self) -> &'static str {
        match self {
            Self::TransUnion => "TU",
            Self::Equifax => "EQ",
            Self::Experian => "EX",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TransUnion => "TransUnion",
            Self::Equifax => "Equifax",
            Self::Experian => "Experian",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "tu" | "transunion" | "trans union" => Some(Self::TransUnion),
            "eq" | "equifax" => Some(Self::Equifax),
            "ex" | "xp" | "experian" => Some(Self::Experian),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreditRepository {
    #[serde(rename = "@_SourceType", default, deserialize_with = "lenient_string")]
    source_type: Option<String>,
}

impl CreditRepository {
    pub fn bureau(&self) -> Option<Bureau> {
        non_empty(&self.source_type).and_then(Bureau::parse)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InquiryRecord {
    #[serde(rename = "@CreditLiabilityID", default, deserialize_with = "lenient_string")]
    credit_liability_id: Option<String>,
    #[serde(rename = "@_SubscriberCode", default, deserialize_with = "lenient_string")]
    subscriber_code: Option<String>,
    #[serde(rename = "@_Date", default, deserialize_with = "lenient_string")]
    date: Option<String>,
    #[serde(rename = "@_Name", default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(rename = "CREDIT_REPOSITORY", default)]
    repositories: OneOrMany<CreditRepository>,
}

impl InquiryRecord {
    pub fn with_liability_id(mut self, value: impl Into<String>) -> Self {
        self.credit_liability_id = Some(value.into());
        self
    }

    pub fn with_subscriber_code(mut self, value: impl Into<String>) -> Self {
        self.subscriber_code = Some(value.into());
        self
    }

    pub fn with_date(mut self, value: impl Into<String>) -> Self {
        self.date = Some(value.into());
        self
    }

    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn with_bureau(mut self, bureau: Bureau) -> Self {
        let repository = CreditRepository {
            source_type: Some(bureau.label().to_owned()),
        };
        let mut repositories = std::mem::take(&mut self.repositories).into_vec();
        repositories.push(repository);
        self.repositories = OneOrMany::Many(repositories);
        self
    }

    pub fn raw_date(&self) -> Option<&str> {
        non_empty(&self.date)
    }

    pub fn date(&self) -> Option<Date> {
        self.raw_date().and_then(parse_report_date)
    }

    pub fn creditor(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn bureau(&self) -> Option<Bureau> {
        self.repositories
            .as_slice()
            .iter()
            .find_map(CreditRepository::bureau)
    }
}

impl KeyFields for InquiryRecord {
    fn credit_liability_id(&self) -> Option<&str> {
        non_empty(&self.credit_liability_id)
    }

    fn subscriber_code(&self) -> Option<&str> {
        non_empty(&self.subscriber_code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PublicRecord {
    #[serde(rename = "@CreditLiabilityID", default, deserialize_with = "lenient_string")]
    credit_liability_id: Option<String>,
    #[serde(rename = "@_SubscriberCode", default, deserialize_with = "lenient_string")]
    subscriber_code: Option<String>,
    #[serde(rename = "@_Type", default, deserialize_with = "lenient_string")]
    record_type: Option<String>,
    #[serde(rename = "@_CourtName", default, deserialize_with = "lenient_string")]
    court_name: Option<String>,
    #[serde(rename = "@_FiledDate", default, deserialize_with = "lenient_string")]
    filed_date: Option<String>,
}

impl PublicRecord {
    pub fn with_liability_id(mut self, value: impl Into<String>) -> Self {
        self.credit_liability_id = Some(value.into());
        self
    }

    pub fn with_subscriber_code(mut self, value: impl Into<String>) -> Self {
        self.subscriber_code = Some(value.into());
        self
    }

    pub fn with_type(mut self, value: impl Into<String>) -> Self {
        self.record_type = Some(value.into());
        self
    }

    pub fn with_court_name(mut self, value: impl Into<String>) -> Self {
        self.court_name = Some(value.into());
        self
    }

    pub fn with_filed_date(mut self, value: impl Into<String>) -> Self {
        self.filed_date = Some(value.into());
        self
    }

    pub fn record_type(&self) -> Option<&str> {
        non_empty(&self.record_type)
    }

    pub fn court_name(&self) -> Option<&str> {
        non_empty(&self.court_name)
    }

    pub fn filed_date(&self) -> Option<Date> {
        non_empty(&self.filed_date).and_then(parse_report_date)
    }
}

impl KeyFields for PublicRecord {
    fn credit_liability_id(&self) -> Option<&str> {
        non_empty(&self.credit_liability_id)
    }

    fn subscriber_code(&self) -> Option<&str> {
        non_empty(&self.subscriber_code)
    }
}

/// A tradeline. Only the derogatory ones take part in the combined negative-item
/// ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LiabilityRecord {
    #[serde(rename = "@CreditLiabilityID", default, deserialize_with = "lenient_string")]
    credit_liability_id: Option<String>,
    #[serde(rename = "@_SubscriberCode", default, deserialize_with = "lenient_string")]
    subscriber_code: Option<String>,
    #[serde(rename = "@_Name", default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(
        rename = "@_DerogatoryDataIndicator",
        default,
        deserialize_with = "lenient_string"
    )]
    derogatory_indicator: Option<String>,
}

impl LiabilityRecord {
    pub fn with_liability_id(mut self, value: impl Into<String>) -> Self {
        self.credit_liability_id = Some(value.into());
        self
    }

    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn with_derogatory(mut self, derogatory: bool) -> Self {
        self.derogatory_indicator = Some(if derogatory { "Y" } else { "N" }.to_owned());
        self
    }

    pub fn creditor(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn is_negative(&self) -> bool {
        non_empty(&self.derogatory_indicator)
            .is_some_and(|flag| flag.eq_ignore_ascii_case("y") || flag.eq_ignore_ascii_case("true"))
    }
}

impl KeyFields for LiabilityRecord {
    fn credit_liability_id(&self) -> Option<&str> {
        non_empty(&self.credit_liability_id)
    }

    fn subscriber_code(&self) -> Option<&str> {
        non_empty(&self.subscriber_code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreditResponse {
    #[serde(rename = "CREDIT_INQUIRY", default)]
    pub inquiries: OneOrMany<InquiryRecord>,
    #[serde(rename = "CREDIT_PUBLIC_RECORD", default)]
    pub public_records: OneOrMany<PublicRecord>,
    #[serde(rename = "CREDIT_LIABILITY", default)]
    pub liabilities: OneOrMany<LiabilityRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreditReport {
    #[serde(rename = "CREDIT_RESPONSE", default, deserialize_with = "lenient_response")]
    pub credit_response: Option<CreditResponse>,
}

impl CreditReport {
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn inquiries(&self) -> &[InquiryRecord] {
        self.credit_response
            .as_ref()
            .map(|response| response.inquiries.as_slice())
            .unwrap_or_default()
    }

    pub fn public_records(&self) -> &[PublicRecord] {
        self.credit_response
            .as_ref()
            .map(|response| response.public_records.as_slice())
            .unwrap_or_default()
    }

    pub fn liabilities(&self) -> &[LiabilityRecord] {
        self.credit_response
            .as_ref()
            .map(|response| response.liabilities.as_slice())
            .unwrap_or_default()
    }

    pub fn negative_accounts(&self) -> impl Iterator<Item = &LiabilityRecord> {
        self.liabilities()
            .iter()
            .filter(|liability| liability.is_negative())
    }
}
