use super::super::domain::PipelineStage;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCount {
    pub stage: PipelineStage,
    pub stage_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineCounts {
    pub stages: Vec<StageCount>,
    pub total_inquiries: usize,
    pub total_applications: usize,
    pub total_contracts: usize,
    pub total_accepted: usize,
}

impl PipelineCounts {
    pub fn stage(&self, stage: PipelineStage) -> usize {
        self.stages
            .iter()
            .find(|entry| entry.stage == stage)
            .map_or(0, |entry| entry.count)
    }
}

/// Percentages, unclamped. A zero denominator yields 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateMetrics {
    pub acceptance_rate: f64,
    pub yield_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelEntry {
    pub stage: PipelineStage,
    pub stage_label: &'static str,
    pub count: usize,
    /// Share of the first funnel stage, in percent.
    pub percent_of_initial: f64,
}

/// A label with its count; used for every one-dimensional breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledCount {
    pub label: String,
    pub count: usize,
}

impl LabeledCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Dense grade × status matrix. Only observed grades and statuses get a row
/// or column; cells without observations hold 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn get(&self, row: &str, column: &str) -> Option<usize> {
        let r = self.row_labels.iter().position(|label| label == row)?;
        let c = self.column_labels.iter().position(|label| label == column)?;
        Some(self.counts[r][c])
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionLatency {
    pub year: i32,
    pub average_days: f64,
    pub pairs: usize,
    /// Pairs where the school decision predates the application.
    pub negative_pairs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyComparisonEntry {
    pub month: &'static str,
    pub inquiries: usize,
    pub applications: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearComparison {
    pub year: i32,
    pub months: Vec<MonthlyComparisonEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distributions {
    pub gender: Vec<LabeledCount>,
    pub international: Vec<LabeledCount>,
    pub financial_aid: Vec<LabeledCount>,
}
