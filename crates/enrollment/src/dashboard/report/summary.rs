use super::super::domain::{CandidateRecord, PipelineStage};
use super::views::{FunnelEntry, PipelineCounts, RateMetrics, StageCount};
use std::collections::HashMap;

/// Rows per pipeline stage plus the headline totals. A row with an
/// unrecognised status counts toward no stage.
pub fn pipeline_counts(rows: &[&CandidateRecord]) -> PipelineCounts {
    let mut per_stage: HashMap<PipelineStage, usize> = HashMap::new();
    let mut total_accepted = 0;

    for record in rows {
        if let Some(stage) = record.stage() {
            *per_stage.entry(stage).or_insert(0) += 1;
        }
        if record.is_accepted() {
            total_accepted += 1;
        }
    }

    let count = |stage: PipelineStage| per_stage.get(&stage).copied().unwrap_or(0);
    let total_applications = PipelineStage::ordered()
        .into_iter()
        .filter(|stage| stage.is_application())
        .map(count)
        .sum();

    PipelineCounts {
        stages: PipelineStage::ordered()
            .into_iter()
            .map(|stage| StageCount {
                stage,
                stage_label: stage.label(),
                count: count(stage),
            })
            .collect(),
        total_inquiries: count(PipelineStage::Inquiry),
        total_applications,
        total_contracts: count(PipelineStage::Contract),
        total_accepted,
    }
}

pub fn rate_metrics(counts: &PipelineCounts) -> RateMetrics {
    RateMetrics {
        acceptance_rate: percentage(counts.total_accepted, counts.total_applications),
        yield_rate: percentage(counts.total_contracts, counts.total_accepted),
    }
}

/// Stage counts in funnel order, each a share of the first stage.
pub fn funnel_series(counts: &PipelineCounts) -> Vec<FunnelEntry> {
    let initial = counts.stage(PipelineStage::Inquiry);
    counts
        .stages
        .iter()
        .map(|entry| FunnelEntry {
            stage: entry.stage,
            stage_label: entry.stage_label,
            count: entry.count,
            percent_of_initial: percentage(entry.count, initial),
        })
        .collect()
}

fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}
