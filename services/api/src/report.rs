use crate::infra::selection_from;
use clap::Args;
use enrollment::config::{AppConfig, DashboardConfig};
use enrollment::dashboard::filter::{available_years, default_years};
use enrollment::dashboard::report::views::LabeledCount;
use enrollment::dashboard::{
    export_csv, DashboardReport, Dataset, DatasetLoader, FilteredTable, EXPORT_FILE_NAME,
};
use enrollment::error::AppError;
use enrollment::telemetry;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Candidate CSV (defaults to ENROLLMENT_DATA_PATH or data/enrollment.csv)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Comma separated entering years (defaults to the most recent three)
    #[arg(long)]
    pub(crate) years: Option<String>,
    /// Emit the full report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct YearsArgs {
    /// Candidate CSV (defaults to ENROLLMENT_DATA_PATH or data/enrollment.csv)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Candidate CSV (defaults to ENROLLMENT_DATA_PATH or data/enrollment.csv)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Comma separated entering years (defaults to the most recent three)
    #[arg(long)]
    pub(crate) years: Option<String>,
    /// Destination file
    #[arg(long, default_value = EXPORT_FILE_NAME)]
    pub(crate) output: PathBuf,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs { data, years, json } = args;
    let (dataset, config) = load_dataset(data)?;
    let selection = selection_from(years.as_deref()).map_err(AppError::InvalidRequest)?;
    let table = FilteredTable::select(&dataset, &selection, config.default_year_window);
    let report = DashboardReport::build(&table);

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        render_report(&dataset, &report);
    }

    Ok(())
}

pub(crate) fn run_years(args: YearsArgs) -> Result<(), AppError> {
    let (dataset, config) = load_dataset(args.data)?;
    println!("Available academic years: {}", join_years(&available_years(&dataset)));
    println!(
        "Default selection: {}",
        join_years(&default_years(&dataset, config.default_year_window))
    );
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        data,
        years,
        output,
    } = args;
    let (dataset, config) = load_dataset(data)?;
    let selection = selection_from(years.as_deref()).map_err(AppError::InvalidRequest)?;
    let table = FilteredTable::select(&dataset, &selection, config.default_year_window);

    let file = File::create(&output)?;
    export_csv(&table, BufWriter::new(file))?;
    println!(
        "Exported {} rows for {} to {}",
        table.len(),
        join_years(&table.years().iter().copied().collect::<Vec<_>>()),
        output.display()
    );
    Ok(())
}

fn load_dataset(data: Option<PathBuf>) -> Result<(Dataset, DashboardConfig), AppError> {
    let AppConfig {
        telemetry: telemetry_config,
        dashboard: mut config,
        ..
    } = AppConfig::load()?;
    telemetry::init(&telemetry_config)?;

    if let Some(path) = data {
        config.data_path = path;
    }
    let dataset = DatasetLoader::from_path(&config.data_path)?;
    Ok((dataset, config))
}

fn join_years(years: &[i32]) -> String {
    if years.is_empty() {
        return "none".to_string();
    }
    years
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn render_report(dataset: &Dataset, report: &DashboardReport) {
    println!("Enrollment Management Dashboard");
    println!(
        "Academic years: {} ({} of {} candidates)",
        join_years(&report.selected_years),
        report.row_count,
        dataset.len()
    );

    let diagnostics = dataset.diagnostics();
    let bad_dates = diagnostics.unparsable_date_total();
    if bad_dates > 0 || diagnostics.unparsable_year > 0 {
        println!(
            "Data quality: {} unparsable dates, {} unparsable years",
            bad_dates, diagnostics.unparsable_year
        );
    }

    let pipeline = &report.pipeline;
    println!("\nStatistics");
    println!("- # of inquiries: {}", pipeline.total_inquiries);
    println!("- # of applications: {}", pipeline.total_applications);
    println!("- # of contracts: {}", pipeline.total_contracts);
    println!("- Total accepted: {}", pipeline.total_accepted);
    println!("- Acceptance rate: {:.1}%", report.rates.acceptance_rate);
    println!("- Yield rate: {:.1}%", report.rates.yield_rate);

    println!("\nApplication pipeline funnel");
    for entry in &report.funnel {
        println!(
            "- {}: {} ({:.0}% of initial)",
            entry.stage_label, entry.count, entry.percent_of_initial
        );
    }

    let cross_tab = &report.status_by_grade;
    if cross_tab.is_empty() {
        println!("\nApplication status by grade level: none");
    } else {
        println!("\nApplication status by grade level");
        for (grade, counts) in cross_tab.row_labels.iter().zip(&cross_tab.counts) {
            let cells = cross_tab
                .column_labels
                .iter()
                .zip(counts)
                .filter(|(_, count)| **count > 0)
                .map(|(status, count)| format!("{status} {count}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("- {grade}: {cells}");
        }
    }

    render_counts("Inquiries by grade level", &report.inquiries_by_grade);
    render_counts("Inquiries by month", &report.inquiries_by_month);
    render_counts("Application submissions over time", &report.application_timeline);

    if report.decision_latency.is_empty() {
        println!("\nAverage days to decision: none");
    } else {
        println!("\nAverage days to decision");
        for entry in &report.decision_latency {
            if entry.negative_pairs > 0 {
                println!(
                    "- {}: {:.1} days over {} candidates ({} decided before applying)",
                    entry.year, entry.average_days, entry.pairs, entry.negative_pairs
                );
            } else {
                println!(
                    "- {}: {:.1} days over {} candidates",
                    entry.year, entry.average_days, entry.pairs
                );
            }
        }
    }

    if !report.year_over_year.is_empty() {
        println!("\nInquiries / applications by month and year");
        for year in &report.year_over_year {
            let months = year
                .months
                .iter()
                .map(|entry| format!("{} {}/{}", &entry.month[..3], entry.inquiries, entry.applications))
                .collect::<Vec<_>>()
                .join(" ");
            println!("- {}: {}", year.year, months);
        }
    }

    render_counts("Gender distribution", &report.distributions.gender);
    render_counts(
        "International vs domestic students",
        &report.distributions.international,
    );
    render_counts("Financial aid distribution", &report.distributions.financial_aid);
}

fn render_counts(title: &str, counts: &[LabeledCount]) {
    if counts.is_empty() {
        println!("\n{title}: none");
        return;
    }

    println!("\n{title}");
    for entry in counts {
        println!("- {}: {}", entry.label, entry.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_years_handles_empty_selection() {
        assert_eq!(join_years(&[]), "none");
        assert_eq!(join_years(&[2022, 2023]), "2022, 2023");
    }
}
