use enrollment::dashboard::domain::CandidateRecord;
use enrollment::dashboard::filter::{available_years, default_years, DEFAULT_YEAR_WINDOW};
use enrollment::dashboard::report::views::LabeledCount;
use enrollment::dashboard::report::{pipeline_counts, rate_metrics};
use enrollment::dashboard::{
    export_csv_bytes, DashboardReport, Dataset, DatasetCache, DatasetLoader, FilteredTable,
    YearSelection,
};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/candidates.csv")
}

fn fixture() -> Dataset {
    DatasetLoader::from_path(fixture_path()).expect("fixture loads")
}

fn report_for(dataset: &Dataset, years: &[i32]) -> DashboardReport {
    let table = FilteredTable::select(
        dataset,
        &YearSelection::explicit(years.iter().copied()),
        DEFAULT_YEAR_WINDOW,
    );
    DashboardReport::build(&table)
}

#[test]
fn fixture_loads_every_row_and_flags_bad_dates() {
    let dataset = fixture();
    assert_eq!(dataset.len(), 9);
    assert_eq!(dataset.diagnostics().unparsable_date_total(), 1);
    assert_eq!(available_years(&dataset), vec![2021, 2022, 2023, 2024]);
    assert_eq!(
        default_years(&dataset, DEFAULT_YEAR_WINDOW),
        vec![2022, 2023, 2024]
    );
}

#[test]
fn single_year_report_matches_hand_counts() {
    let dataset = fixture();
    let report = report_for(&dataset, &[2023]);

    assert_eq!(report.selected_years, vec![2023]);
    assert_eq!(report.row_count, 5);
    assert_eq!(report.pipeline.total_inquiries, 2);
    assert_eq!(report.pipeline.total_applications, 3);
    assert_eq!(report.pipeline.total_contracts, 1);
    assert_eq!(report.pipeline.total_accepted, 2);
    assert!((report.rates.acceptance_rate - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.rates.yield_rate, 50.0);

    assert_eq!(
        report.inquiries_by_grade,
        vec![LabeledCount::new("Grade 1", 2)]
    );
    let september = &report.inquiries_by_month[1];
    let october = &report.inquiries_by_month[2];
    assert_eq!((september.label.as_str(), september.count), ("September", 1));
    assert_eq!((october.label.as_str(), october.count), ("October", 1));

    assert_eq!(
        report.status_by_grade.row_labels,
        vec!["Kindergarten", "Grade 1", "Grade 2"]
    );
    assert_eq!(
        report.status_by_grade.column_labels,
        vec!["Inquiry", "Applicant", "Decision", "Contract"]
    );
    assert_eq!(report.status_by_grade.get("Grade 2", "Decision"), Some(1));
    assert_eq!(report.status_by_grade.get("Grade 1", "Contract"), Some(0));

    let timeline: Vec<_> = report
        .application_timeline
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(timeline, vec!["2022-09", "2022-10", "2022-11"]);

    assert_eq!(report.decision_latency.len(), 1);
    assert_eq!(report.decision_latency[0].year, 2023);
    assert_eq!(report.decision_latency[0].average_days, 71.0);

    assert_eq!(
        report.distributions.gender,
        vec![LabeledCount::new("Female", 3), LabeledCount::new("Male", 2)]
    );
}

#[test]
fn unknown_status_rows_stay_out_of_stage_counts() {
    let dataset = fixture();
    let report = report_for(&dataset, &[2024]);

    assert_eq!(report.row_count, 2);
    assert_eq!(report.pipeline.total_inquiries, 1);
    assert_eq!(report.pipeline.total_applications, 0);
    assert_eq!(
        report.funnel.iter().map(|entry| entry.count).sum::<usize>(),
        1
    );
    assert_eq!(report.status_by_grade.get("Grade 3", "Withdrawn"), Some(1));

    let latency = &report.decision_latency[0];
    assert_eq!(latency.average_days, -9.0);
    assert_eq!(latency.negative_pairs, 1);
}

#[test]
fn empty_selection_produces_zero_report() {
    let dataset = fixture();
    let report = report_for(&dataset, &[]);

    assert_eq!(report.row_count, 0);
    assert_eq!(report.pipeline.total_inquiries, 0);
    assert_eq!(report.pipeline.total_applications, 0);
    assert_eq!(report.rates.acceptance_rate, 0.0);
    assert_eq!(report.rates.yield_rate, 0.0);
    assert!(report.funnel.iter().all(|entry| entry.count == 0));
    assert!(report.status_by_grade.is_empty());
    assert!(report.inquiries_by_grade.is_empty());
    assert_eq!(report.inquiries_by_month.len(), 12);
    assert!(report.inquiries_by_month.iter().all(|m| m.count == 0));
    assert!(report.application_timeline.is_empty());
    assert!(report.decision_latency.is_empty());
    assert!(report.year_over_year.is_empty());
    assert!(report.distributions.financial_aid.is_empty());
}

#[test]
fn three_row_example_from_admissions_office() {
    let records = vec![
        CandidateRecord {
            entering_year: Some(2023),
            candidate_status: Some("Inquiry".into()),
            ..CandidateRecord::default()
        },
        CandidateRecord {
            entering_year: Some(2023),
            candidate_status: Some("Contract".into()),
            candidate_decision: Some("Accepted".into()),
            ..CandidateRecord::default()
        },
        CandidateRecord {
            entering_year: Some(2022),
            candidate_status: Some("Inquiry".into()),
            ..CandidateRecord::default()
        },
    ];
    let dataset = Dataset::from_records(records);
    let table = FilteredTable::new(&dataset, [2023].into_iter().collect());
    let counts = pipeline_counts(table.rows());
    let rates = rate_metrics(&counts);

    assert_eq!(counts.total_inquiries, 1);
    assert_eq!(counts.total_applications, 1);
    assert_eq!(counts.total_accepted, 1);
    assert_eq!(counts.total_contracts, 1);
    assert_eq!(rates.acceptance_rate, 100.0);
    assert_eq!(rates.yield_rate, 100.0);
}

#[test]
fn export_then_reload_round_trips_selected_rows() {
    let dataset = fixture();
    let table = FilteredTable::select(&dataset, &YearSelection::Default, DEFAULT_YEAR_WINDOW);
    assert_eq!(table.len(), 8);

    let bytes = export_csv_bytes(&table).expect("export succeeds");
    let reloaded = DatasetLoader::from_reader(Cursor::new(bytes)).expect("reload succeeds");

    assert_eq!(reloaded.len(), table.len());
    assert_eq!(reloaded.layout(), dataset.layout());
    for (original, copy) in table.rows().iter().zip(reloaded.records()) {
        assert_eq!(*original, copy);
    }

    let original = DashboardReport::build(&table);
    let years = table.years().clone();
    let round_trip = DashboardReport::build(&FilteredTable::new(&reloaded, years));
    assert_eq!(original, round_trip);
}

#[test]
fn cache_serves_the_same_table_until_invalidated() {
    let cache = DatasetCache::new();
    let first = cache.load_path(fixture_path()).expect("load");
    let second = cache.load_path(fixture_path()).expect("cached load");
    assert!(Arc::ptr_eq(&first, &second));

    assert!(cache.invalidate(fixture_path()));
    let third = cache.load_path(fixture_path()).expect("reload");
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(*first, *third);
}
