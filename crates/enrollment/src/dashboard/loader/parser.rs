use super::dates::parse_datetime;
use crate::dashboard::dataset::{ColumnLayout, ColumnSlot, ContractColumn, LoadDiagnostics};
use crate::dashboard::domain::CandidateRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Contract columns as read from one CSV row, before typing.
#[derive(Debug, Deserialize)]
pub(crate) struct CandidateRow {
    #[serde(rename = "Entering Year", default, deserialize_with = "empty_string_as_none")]
    entering_year: Option<String>,
    #[serde(rename = "Entering Grade", default, deserialize_with = "empty_string_as_none")]
    entering_grade: Option<String>,
    #[serde(
        rename = "Candidate Status",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    candidate_status: Option<String>,
    #[serde(
        rename = "Candidate Decision",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    candidate_decision: Option<String>,
    #[serde(rename = "Gender", default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(rename = "International", default, deserialize_with = "empty_string_as_none")]
    international: Option<String>,
    #[serde(rename = "Financial Aid", default, deserialize_with = "empty_string_as_none")]
    financial_aid: Option<String>,
    #[serde(
        rename = "Inquiry Date Submitted",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    inquiry_submitted: Option<String>,
    #[serde(
        rename = "Application Date Submitted",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    application_submitted: Option<String>,
    #[serde(
        rename = "Candidate decision date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    candidate_decision_date: Option<String>,
    #[serde(
        rename = "School Decision Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    school_decision_date: Option<String>,
}

impl CandidateRow {
    /// Types the row, recording every cell that had to be dropped.
    pub(crate) fn into_record(
        self,
        extra: Vec<String>,
        diagnostics: &mut LoadDiagnostics,
    ) -> CandidateRecord {
        let entering_year = match self.entering_year.as_deref() {
            None => {
                diagnostics.missing_year += 1;
                None
            }
            Some(raw) => {
                let parsed = parse_year(raw);
                if parsed.is_none() {
                    diagnostics.unparsable_year += 1;
                }
                parsed
            }
        };

        let mut date = |column: ContractColumn, raw: Option<String>| -> Option<NaiveDateTime> {
            let raw = raw?;
            let parsed = parse_datetime(&raw);
            if parsed.is_none() {
                *diagnostics
                    .unparsable_dates
                    .entry(column.header())
                    .or_insert(0) += 1;
            }
            parsed
        };

        let inquiry_submitted = date(ContractColumn::InquiryDateSubmitted, self.inquiry_submitted);
        let application_submitted = date(
            ContractColumn::ApplicationDateSubmitted,
            self.application_submitted,
        );
        let candidate_decision_date = date(
            ContractColumn::CandidateDecisionDate,
            self.candidate_decision_date,
        );
        let school_decision_date =
            date(ContractColumn::SchoolDecisionDate, self.school_decision_date);

        CandidateRecord {
            entering_year,
            entering_grade: self.entering_grade,
            candidate_status: self.candidate_status,
            candidate_decision: self.candidate_decision,
            gender: self.gender,
            international: self.international,
            financial_aid: self.financial_aid,
            inquiry_submitted,
            application_submitted,
            candidate_decision_date,
            school_decision_date,
            extra,
        }
    }
}

/// Pulls the non-contract cells out of a raw record, in layout order.
pub(crate) fn extra_values(layout: &ColumnLayout, record: &csv::StringRecord) -> Vec<String> {
    let mut extra = vec![String::new(); layout.extra_len()];
    for (slot, value) in layout.slots().iter().zip(record.iter()) {
        if let ColumnSlot::Extra(index) = slot {
            extra[*index] = value.to_string();
        }
    }
    extra
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts integral years, including the `2023.0` shape spreadsheet tools
/// write for numeric columns with blanks.
fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }

    let (whole, fraction) = trimmed.split_once('.')?;
    if fraction.chars().all(|c| c == '0') {
        whole.parse::<i32>().ok()
    } else {
        None
    }
}

#[cfg(test)]
pub(crate) fn parse_year_for_tests(raw: &str) -> Option<i32> {
    parse_year(raw)
}
