use super::domain::CandidateRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Columns every enrollment export must carry, matched by exact header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractColumn {
    EnteringYear,
    EnteringGrade,
    CandidateStatus,
    CandidateDecision,
    Gender,
    International,
    FinancialAid,
    InquiryDateSubmitted,
    ApplicationDateSubmitted,
    CandidateDecisionDate,
    SchoolDecisionDate,
}

impl ContractColumn {
    pub const fn all() -> [Self; 11] {
        [
            Self::EnteringYear,
            Self::EnteringGrade,
            Self::CandidateStatus,
            Self::CandidateDecision,
            Self::Gender,
            Self::International,
            Self::FinancialAid,
            Self::InquiryDateSubmitted,
            Self::ApplicationDateSubmitted,
            Self::CandidateDecisionDate,
            Self::SchoolDecisionDate,
        ]
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::EnteringYear => "Entering Year",
            Self::EnteringGrade => "Entering Grade",
            Self::CandidateStatus => "Candidate Status",
            Self::CandidateDecision => "Candidate Decision",
            Self::Gender => "Gender",
            Self::International => "International",
            Self::FinancialAid => "Financial Aid",
            Self::InquiryDateSubmitted => "Inquiry Date Submitted",
            Self::ApplicationDateSubmitted => "Application Date Submitted",
            Self::CandidateDecisionDate => "Candidate decision date",
            Self::SchoolDecisionDate => "School Decision Date",
        }
    }

    pub fn from_header(value: &str) -> Option<Self> {
        Self::all().into_iter().find(|column| column.header() == value)
    }

    pub const fn is_date(self) -> bool {
        matches!(
            self,
            Self::InquiryDateSubmitted
                | Self::ApplicationDateSubmitted
                | Self::CandidateDecisionDate
                | Self::SchoolDecisionDate
        )
    }
}

/// Where a source column lands in [`CandidateRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSlot {
    Contract(ContractColumn),
    /// Index into [`CandidateRecord::extra`].
    Extra(usize),
}

/// Source header order, kept so exports reproduce the original layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    headers: Vec<String>,
    slots: Vec<ColumnSlot>,
}

impl ColumnLayout {
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut layout = Self::default();
        let mut extra = 0;
        for header in headers {
            let header = header.into();
            let slot = match ContractColumn::from_header(&header) {
                Some(column) => ColumnSlot::Contract(column),
                None => {
                    extra += 1;
                    ColumnSlot::Extra(extra - 1)
                }
            };
            layout.headers.push(header);
            layout.slots.push(slot);
        }
        layout
    }

    /// Layout holding exactly the contract columns, in contract order.
    pub fn contract_only() -> Self {
        Self::from_headers(ContractColumn::all().map(ContractColumn::header))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn slots(&self) -> &[ColumnSlot] {
        &self.slots
    }

    pub fn missing_columns(&self) -> Vec<&'static str> {
        ContractColumn::all()
            .into_iter()
            .filter(|column| !self.slots.contains(&ColumnSlot::Contract(*column)))
            .map(ContractColumn::header)
            .collect()
    }

    pub fn extra_len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, ColumnSlot::Extra(_)))
            .count()
    }
}

/// Per-load data-quality counters. Bad cells are kept as missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadDiagnostics {
    pub rows: usize,
    pub missing_year: usize,
    pub unparsable_year: usize,
    pub unparsable_dates: BTreeMap<&'static str, usize>,
}

impl LoadDiagnostics {
    pub fn unparsable_date_total(&self) -> usize {
        self.unparsable_dates.values().sum()
    }
}

/// Immutable candidate table produced by the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    layout: ColumnLayout,
    records: Vec<CandidateRecord>,
    diagnostics: LoadDiagnostics,
}

impl Dataset {
    pub fn new(
        layout: ColumnLayout,
        records: Vec<CandidateRecord>,
        diagnostics: LoadDiagnostics,
    ) -> Self {
        Self {
            layout,
            records,
            diagnostics,
        }
    }

    /// Builds a dataset from already-typed records with the contract layout.
    pub fn from_records(records: Vec<CandidateRecord>) -> Self {
        let diagnostics = LoadDiagnostics {
            rows: records.len(),
            ..LoadDiagnostics::default()
        };
        Self::new(ColumnLayout::contract_only(), records, diagnostics)
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn diagnostics(&self) -> &LoadDiagnostics {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
