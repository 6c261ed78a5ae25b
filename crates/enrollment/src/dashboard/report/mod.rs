mod breakdowns;
mod summary;
mod timeline;
pub mod views;

pub use breakdowns::{
    distributions, inquiries_by_grade, inquiries_by_month, status_by_grade, value_counts,
};
pub use summary::{funnel_series, pipeline_counts, rate_metrics};
pub use timeline::{application_timeline, decision_latency_by_year, year_over_year};

use super::filter::FilteredTable;
use serde::Serialize;
use tracing::debug;
use views::{
    CrossTab, DecisionLatency, Distributions, FunnelEntry, LabeledCount, PipelineCounts,
    RateMetrics, YearComparison,
};

/// Every aggregate the dashboard shows, recomputed from one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub selected_years: Vec<i32>,
    pub row_count: usize,
    pub pipeline: PipelineCounts,
    pub rates: RateMetrics,
    pub funnel: Vec<FunnelEntry>,
    pub status_by_grade: CrossTab,
    pub inquiries_by_grade: Vec<LabeledCount>,
    pub inquiries_by_month: Vec<LabeledCount>,
    pub application_timeline: Vec<LabeledCount>,
    pub decision_latency: Vec<DecisionLatency>,
    pub year_over_year: Vec<YearComparison>,
    pub distributions: Distributions,
}

impl DashboardReport {
    pub fn build(table: &FilteredTable<'_>) -> Self {
        let rows = table.rows();
        let pipeline = pipeline_counts(rows);
        let rates = rate_metrics(&pipeline);
        let funnel = funnel_series(&pipeline);

        debug!(
            rows = rows.len(),
            years = ?table.years(),
            inquiries = pipeline.total_inquiries,
            applications = pipeline.total_applications,
            "building dashboard report"
        );

        Self {
            selected_years: table.years().iter().copied().collect(),
            row_count: rows.len(),
            rates,
            funnel,
            pipeline,
            status_by_grade: status_by_grade(rows),
            inquiries_by_grade: inquiries_by_grade(rows),
            inquiries_by_month: inquiries_by_month(rows),
            application_timeline: application_timeline(rows),
            decision_latency: decision_latency_by_year(rows),
            year_over_year: year_over_year(rows),
            distributions: distributions(rows),
        }
    }
}
