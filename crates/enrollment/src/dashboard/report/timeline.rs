use super::super::domain::{AcademicMonth, CandidateRecord};
use super::views::{DecisionLatency, LabeledCount, MonthlyComparisonEntry, YearComparison};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Applications per `YYYY-MM` of `Application Date Submitted`, ascending.
/// Rows without an application date are left out.
pub fn application_timeline(rows: &[&CandidateRecord]) -> Vec<LabeledCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for date in rows.iter().filter_map(|record| record.application_submitted) {
        *counts.entry(date.format("%Y-%m").to_string()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(month, count)| LabeledCount::new(month, count))
        .collect()
}

/// Mean days from application to school decision per entering year. Years
/// without a single complete pair are omitted.
pub fn decision_latency_by_year(rows: &[&CandidateRecord]) -> Vec<DecisionLatency> {
    #[derive(Default)]
    struct Acc {
        total_days: i64,
        pairs: usize,
        negative_pairs: usize,
    }

    let mut by_year: BTreeMap<i32, Acc> = BTreeMap::new();
    for record in rows {
        let (Some(year), Some(days)) = (record.entering_year, record.decision_latency_days())
        else {
            continue;
        };
        let acc = by_year.entry(year).or_default();
        acc.total_days += days;
        acc.pairs += 1;
        if days < 0 {
            acc.negative_pairs += 1;
        }
    }

    by_year
        .into_iter()
        .map(|(year, acc)| {
            if acc.negative_pairs > 0 {
                warn!(
                    year,
                    rows = acc.negative_pairs,
                    "school decision date precedes application date"
                );
            }
            DecisionLatency {
                year,
                average_days: acc.total_days as f64 / acc.pairs as f64,
                pairs: acc.pairs,
                negative_pairs: acc.negative_pairs,
            }
        })
        .collect()
}

/// Inquiries and applications per academic month for each entering year,
/// zero-filled so years line up month by month.
pub fn year_over_year(rows: &[&CandidateRecord]) -> Vec<YearComparison> {
    let mut by_year: BTreeMap<i32, HashMap<AcademicMonth, (usize, usize)>> = BTreeMap::new();
    for record in rows {
        let Some(year) = record.entering_year else {
            continue;
        };
        let months = by_year.entry(year).or_default();
        if let Some(date) = &record.inquiry_submitted {
            months.entry(AcademicMonth::from_date(date)).or_default().0 += 1;
        }
        if let Some(date) = &record.application_submitted {
            months.entry(AcademicMonth::from_date(date)).or_default().1 += 1;
        }
    }

    by_year
        .into_iter()
        .map(|(year, months)| YearComparison {
            year,
            months: AcademicMonth::ordered()
                .into_iter()
                .map(|month| {
                    let (inquiries, applications) =
                        months.get(&month).copied().unwrap_or_default();
                    MonthlyComparisonEntry {
                        month: month.label(),
                        inquiries,
                        applications,
                    }
                })
                .collect(),
        })
        .collect()
}
