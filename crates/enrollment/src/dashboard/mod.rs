mod cache;
pub mod dataset;
pub mod domain;
mod export;
pub mod filter;
mod loader;
pub mod report;

pub use cache::{CacheStats, DatasetCache, SourceSignature, MAX_INLINE_ENTRIES};
pub use dataset::Dataset;
pub use export::{export_csv, export_csv_bytes, ExportError, EXPORT_FILE_NAME};
pub use filter::{FilteredTable, YearSelection};
pub use loader::{DataSourceError, DatasetLoader};
pub use report::DashboardReport;
