use super::super::domain::{
    grade_sort_key, status_sort_key, AcademicMonth, CandidateRecord, PipelineStage,
};
use super::views::{CrossTab, Distributions, LabeledCount};
use std::collections::{BTreeMap, HashMap};

/// Grade × status counts over rows that carry both values.
pub fn status_by_grade(rows: &[&CandidateRecord]) -> CrossTab {
    let mut cells: HashMap<(&str, &str), usize> = HashMap::new();
    for record in rows {
        if let (Some(grade), Some(status)) = (
            record.entering_grade.as_deref(),
            record.candidate_status.as_deref(),
        ) {
            *cells.entry((grade, status)).or_insert(0) += 1;
        }
    }

    let mut row_labels: Vec<&str> = cells.keys().map(|(grade, _)| *grade).collect();
    row_labels.sort_by_key(|label| grade_sort_key(label));
    row_labels.dedup();

    let mut column_labels: Vec<&str> = cells.keys().map(|(_, status)| *status).collect();
    column_labels.sort_by_key(|label| status_sort_key(label));
    column_labels.dedup();

    let counts = row_labels
        .iter()
        .map(|grade| {
            column_labels
                .iter()
                .map(|status| cells.get(&(*grade, *status)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    CrossTab {
        row_labels: row_labels.into_iter().map(str::to_string).collect(),
        column_labels: column_labels.into_iter().map(str::to_string).collect(),
        counts,
    }
}

/// Inquiry-status rows per grade. Only observed grades appear, canonical
/// levels first in canonical order, unrecognised labels after them.
pub fn inquiries_by_grade(rows: &[&CandidateRecord]) -> Vec<LabeledCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in inquiries(rows) {
        if let Some(grade) = record.entering_grade.as_deref() {
            *counts.entry(grade).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<LabeledCount> = counts
        .into_iter()
        .map(|(grade, count)| LabeledCount::new(grade, count))
        .collect();
    entries.sort_by_key(|entry| grade_sort_key(&entry.label));
    entries
}

/// Inquiry-status rows per month of `Inquiry Date Submitted`, zero-filled to
/// all twelve months in academic-year order.
pub fn inquiries_by_month(rows: &[&CandidateRecord]) -> Vec<LabeledCount> {
    let mut counts: HashMap<AcademicMonth, usize> = HashMap::new();
    for date in inquiries(rows).filter_map(|record| record.inquiry_submitted.as_ref()) {
        *counts.entry(AcademicMonth::from_date(date)).or_insert(0) += 1;
    }

    AcademicMonth::ordered()
        .into_iter()
        .map(|month| LabeledCount::new(month.label(), counts.get(&month).copied().unwrap_or(0)))
        .collect()
}

pub fn distributions(rows: &[&CandidateRecord]) -> Distributions {
    Distributions {
        gender: value_counts(rows, |record| record.gender.as_deref()),
        international: value_counts(rows, |record| record.international.as_deref()),
        financial_aid: value_counts(rows, |record| record.financial_aid.as_deref()),
    }
}

/// Frequency of each observed value, most frequent first; ties by label.
/// Missing values are not counted.
pub fn value_counts<'a, F>(rows: &[&'a CandidateRecord], field: F) -> Vec<LabeledCount>
where
    F: Fn(&'a CandidateRecord) -> Option<&'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in rows.iter().copied() {
        if let Some(value) = field(record) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<LabeledCount> = counts
        .into_iter()
        .map(|(label, count)| LabeledCount::new(label, count))
        .collect();
    // Stable sort keeps the BTreeMap's label order among equal counts.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

fn inquiries<'a>(rows: &'a [&'a CandidateRecord]) -> impl Iterator<Item = &'a CandidateRecord> {
    rows.iter()
        .copied()
        .filter(|record| record.stage() == Some(PipelineStage::Inquiry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(grade: &str, status: &str) -> CandidateRecord {
        CandidateRecord {
            entering_grade: Some(grade.to_string()),
            candidate_status: Some(status.to_string()),
            ..CandidateRecord::default()
        }
    }

    fn inquiry_on(month: u32, day: u32) -> CandidateRecord {
        CandidateRecord {
            inquiry_submitted: NaiveDate::from_ymd_opt(2023, month, day)
                .and_then(|date| date.and_hms_opt(9, 0, 0)),
            ..row("Grade 3", "Inquiry")
        }
    }

    #[test]
    fn cross_tab_is_dense_over_observed_labels() {
        let records = vec![
            row("Grade 1", "Inquiry"),
            row("Grade 1", "Inquiry"),
            row("Grade 2", "Applicant"),
        ];
        let rows: Vec<&CandidateRecord> = records.iter().collect();
        let table = status_by_grade(&rows);

        assert_eq!(table.row_labels, vec!["Grade 1", "Grade 2"]);
        assert_eq!(table.column_labels, vec!["Inquiry", "Applicant"]);
        assert_eq!(table.get("Grade 1", "Inquiry"), Some(2));
        assert_eq!(table.get("Grade 2", "Applicant"), Some(1));
        assert_eq!(table.get("Grade 1", "Applicant"), Some(0));
        assert_eq!(table.get("Grade 2", "Inquiry"), Some(0));
        assert_eq!(table.get("Grade 5", "Inquiry"), None);
    }

    #[test]
    fn cross_tab_orders_rows_by_grade_level() {
        let records = vec![
            row("Grade 10", "Contract"),
            row("Pre-K", "Mystery"),
            row("Kindergarten", "Inquiry"),
            row("Grade 9", "Decision"),
        ];
        let rows: Vec<&CandidateRecord> = records.iter().collect();
        let table = status_by_grade(&rows);

        assert_eq!(
            table.row_labels,
            vec!["Kindergarten", "Grade 9", "Grade 10", "Pre-K"]
        );
        assert_eq!(
            table.column_labels,
            vec!["Inquiry", "Decision", "Contract", "Mystery"]
        );
    }

    #[test]
    fn grade_inquiries_only_list_observed_grades() {
        let records = vec![
            row("Grade 12", "Inquiry"),
            row("Kindergarten", "Inquiry"),
            row("Grade 12", "Inquiry"),
            row("Grade 4", "Applicant"),
        ];
        let rows: Vec<&CandidateRecord> = records.iter().collect();
        assert_eq!(
            inquiries_by_grade(&rows),
            vec![
                LabeledCount::new("Kindergarten", 1),
                LabeledCount::new("Grade 12", 2),
            ]
        );
    }

    #[test]
    fn monthly_inquiries_are_zero_filled() {
        let mut records = vec![
            inquiry_on(9, 1),
            inquiry_on(9, 30),
            inquiry_on(1, 5),
            row("Grade 1", "Inquiry"),
        ];
        records.push(CandidateRecord {
            inquiry_submitted: NaiveDate::from_ymd_opt(2023, 9, 2)
                .and_then(|date| date.and_hms_opt(0, 0, 0)),
            ..row("Grade 1", "Applicant")
        });
        let rows: Vec<&CandidateRecord> = records.iter().collect();
        let months = inquiries_by_month(&rows);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0], LabeledCount::new("August", 0));
        assert_eq!(months[1], LabeledCount::new("September", 2));
        assert_eq!(months[5], LabeledCount::new("January", 1));
        assert_eq!(months[11].label, "July");
        assert_eq!(months.iter().map(|m| m.count).sum::<usize>(), 3);
    }

    #[test]
    fn distributions_skip_missing_values() {
        let records = vec![
            CandidateRecord {
                gender: Some("Female".into()),
                international: Some("No".into()),
                ..CandidateRecord::default()
            },
            CandidateRecord {
                gender: Some("Male".into()),
                ..CandidateRecord::default()
            },
            CandidateRecord {
                gender: Some("Female".into()),
                financial_aid: Some("Yes".into()),
                ..CandidateRecord::default()
            },
            CandidateRecord::default(),
        ];
        let rows: Vec<&CandidateRecord> = records.iter().collect();
        let dist = distributions(&rows);

        assert_eq!(
            dist.gender,
            vec![LabeledCount::new("Female", 2), LabeledCount::new("Male", 1)]
        );
        assert_eq!(dist.international, vec![LabeledCount::new("No", 1)]);
        assert_eq!(dist.financial_aid, vec![LabeledCount::new("Yes", 1)]);
    }

    #[test]
    fn empty_input_gives_empty_breakdowns() {
        assert!(status_by_grade(&[]).is_empty());
        assert!(inquiries_by_grade(&[]).is_empty());
        assert!(inquiries_by_month(&[]).iter().all(|m| m.count == 0));
        assert!(distributions(&[]).gender.is_empty());
    }
}
