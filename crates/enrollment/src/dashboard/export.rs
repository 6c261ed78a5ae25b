use super::dataset::{ColumnSlot, ContractColumn};
use super::domain::CandidateRecord;
use super::filter::FilteredTable;
use super::loader::format_datetime;
use chrono::NaiveDateTime;
use std::io::Write;

pub const EXPORT_FILE_NAME: &str = "filtered_enrollment_data.csv";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV export: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the filtered rows as CSV with the source header order and no
/// index column.
pub fn export_csv<W: Write>(table: &FilteredTable<'_>, writer: W) -> Result<(), ExportError> {
    let layout = table.layout();
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(layout.headers())?;

    for record in table.rows() {
        let fields = layout
            .slots()
            .iter()
            .map(|slot| cell(record, *slot));
        csv_writer.write_record(fields)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_csv_bytes(table: &FilteredTable<'_>) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    export_csv(table, &mut buffer)?;
    Ok(buffer)
}

fn cell(record: &CandidateRecord, slot: ColumnSlot) -> String {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let date = |value: &Option<NaiveDateTime>| value.as_ref().map(format_datetime).unwrap_or_default();

    match slot {
        ColumnSlot::Extra(index) => record.extra.get(index).cloned().unwrap_or_default(),
        ColumnSlot::Contract(column) => match column {
            ContractColumn::EnteringYear => record
                .entering_year
                .map(|year| year.to_string())
                .unwrap_or_default(),
            ContractColumn::EnteringGrade => text(&record.entering_grade),
            ContractColumn::CandidateStatus => text(&record.candidate_status),
            ContractColumn::CandidateDecision => text(&record.candidate_decision),
            ContractColumn::Gender => text(&record.gender),
            ContractColumn::International => text(&record.international),
            ContractColumn::FinancialAid => text(&record.financial_aid),
            ContractColumn::InquiryDateSubmitted => date(&record.inquiry_submitted),
            ContractColumn::ApplicationDateSubmitted => date(&record.application_submitted),
            ContractColumn::CandidateDecisionDate => date(&record.candidate_decision_date),
            ContractColumn::SchoolDecisionDate => date(&record.school_decision_date),
        },
    }
}
