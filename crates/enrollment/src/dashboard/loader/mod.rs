mod dates;
mod parser;

use crate::dashboard::dataset::{ColumnLayout, Dataset, LoadDiagnostics};
use parser::CandidateRow;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub(crate) use dates::format_datetime;

/// The source could not be turned into a candidate table.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("failed to read enrollment data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid enrollment CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("enrollment data is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

pub struct DatasetLoader;

impl DatasetLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Dataset, DataSourceError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;
        info!(path = %path.display(), rows = dataset.len(), "loaded enrollment dataset");
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset, DataSourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let layout = ColumnLayout::from_headers(headers.iter());
        let missing = layout.missing_columns();
        if !missing.is_empty() {
            return Err(DataSourceError::MissingColumns(missing));
        }

        let mut diagnostics = LoadDiagnostics::default();
        let mut records = Vec::new();

        for result in csv_reader.records() {
            let raw = result?;
            let row: CandidateRow = raw.deserialize(Some(&headers))?;
            let extra = parser::extra_values(&layout, &raw);
            records.push(row.into_record(extra, &mut diagnostics));
        }

        diagnostics.rows = records.len();
        report_diagnostics(&diagnostics);

        Ok(Dataset::new(layout, records, diagnostics))
    }
}

fn report_diagnostics(diagnostics: &LoadDiagnostics) {
    if diagnostics.unparsable_year > 0 {
        warn!(
            rows = diagnostics.unparsable_year,
            "entering year could not be parsed; rows excluded from year filters"
        );
    }
    for (column, count) in &diagnostics.unparsable_dates {
        warn!(column, rows = count, "unparsable dates treated as missing");
    }
    debug!(
        rows = diagnostics.rows,
        missing_year = diagnostics.missing_year,
        "dataset diagnostics"
    );
}
