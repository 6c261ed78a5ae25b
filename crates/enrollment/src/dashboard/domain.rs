use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Position of a candidate in the admissions funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Inquiry,
    Applicant,
    FileComplete,
    Decision,
    Contract,
}

impl PipelineStage {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Inquiry,
            Self::Applicant,
            Self::FileComplete,
            Self::Decision,
            Self::Contract,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Inquiry => "Inquiry",
            Self::Applicant => "Applicant",
            Self::FileComplete => "File Complete",
            Self::Decision => "Decision",
            Self::Contract => "Contract",
        }
    }

    /// Exact-label match; anything else is not a pipeline stage.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|stage| stage.label() == value)
    }

    /// Every stage past the initial inquiry counts as an application.
    pub const fn is_application(self) -> bool {
        !matches!(self, Self::Inquiry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeLevel {
    Kindergarten,
    Grade1,
    Grade2,
    Grade3,
    Grade4,
    Grade5,
    Grade6,
    Grade7,
    Grade8,
    Grade9,
    Grade10,
    Grade11,
    Grade12,
}

impl GradeLevel {
    pub const fn ordered() -> [Self; 13] {
        [
            Self::Kindergarten,
            Self::Grade1,
            Self::Grade2,
            Self::Grade3,
            Self::Grade4,
            Self::Grade5,
            Self::Grade6,
            Self::Grade7,
            Self::Grade8,
            Self::Grade9,
            Self::Grade10,
            Self::Grade11,
            Self::Grade12,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Kindergarten => "Kindergarten",
            Self::Grade1 => "Grade 1",
            Self::Grade2 => "Grade 2",
            Self::Grade3 => "Grade 3",
            Self::Grade4 => "Grade 4",
            Self::Grade5 => "Grade 5",
            Self::Grade6 => "Grade 6",
            Self::Grade7 => "Grade 7",
            Self::Grade8 => "Grade 8",
            Self::Grade9 => "Grade 9",
            Self::Grade10 => "Grade 10",
            Self::Grade11 => "Grade 11",
            Self::Grade12 => "Grade 12",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|grade| grade.label() == value)
    }
}

/// Sort key placing canonical grades first (in canonical order) and any
/// unrecognised label after them, alphabetically.
pub fn grade_sort_key(label: &str) -> (usize, String) {
    match GradeLevel::parse(label) {
        Some(grade) => (grade as usize, String::new()),
        None => (GradeLevel::ordered().len(), label.to_string()),
    }
}

/// Same policy as [`grade_sort_key`] for candidate status labels.
pub fn status_sort_key(label: &str) -> (usize, String) {
    match PipelineStage::parse(label) {
        Some(stage) => (stage as usize, String::new()),
        None => (PipelineStage::ordered().len(), label.to_string()),
    }
}

/// Calendar months in academic-year order (August first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcademicMonth {
    August,
    September,
    October,
    November,
    December,
    January,
    February,
    March,
    April,
    May,
    June,
    July,
}

impl AcademicMonth {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::August,
            Self::September,
            Self::October,
            Self::November,
            Self::December,
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
        }
    }

    pub fn from_date(date: &NaiveDateTime) -> Self {
        // month0: January = 0; academic order starts at August (7).
        let index = (date.month0() as usize + 5) % 12;
        Self::ordered()[index]
    }
}

/// One candidate row. Optional fields are `None` when the source cell is
/// empty or could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    pub entering_year: Option<i32>,
    pub entering_grade: Option<String>,
    pub candidate_status: Option<String>,
    pub candidate_decision: Option<String>,
    pub gender: Option<String>,
    pub international: Option<String>,
    pub financial_aid: Option<String>,
    pub inquiry_submitted: Option<NaiveDateTime>,
    pub application_submitted: Option<NaiveDateTime>,
    pub candidate_decision_date: Option<NaiveDateTime>,
    pub school_decision_date: Option<NaiveDateTime>,
    /// Values of non-contract columns, aligned with the dataset layout.
    pub extra: Vec<String>,
}

const SECONDS_PER_DAY: i64 = 86_400;

impl CandidateRecord {
    pub fn stage(&self) -> Option<PipelineStage> {
        self.candidate_status.as_deref().and_then(PipelineStage::parse)
    }

    pub fn is_accepted(&self) -> bool {
        self.candidate_decision.as_deref() == Some("Accepted")
    }

    /// Whole days from application to school decision, rounded down. Negative
    /// when the decision predates the application, even by part of a day.
    pub fn decision_latency_days(&self) -> Option<i64> {
        match (self.application_submitted, self.school_decision_date) {
            (Some(applied), Some(decided)) => {
                Some((decided - applied).num_seconds().div_euclid(SECONDS_PER_DAY))
            }
            _ => None,
        }
    }
}
