use enrollment::config::DashboardConfig;
use enrollment::dashboard::{Dataset, DatasetCache, YearSelection};
use enrollment::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) cache: Arc<DatasetCache>,
    pub(crate) dashboard: DashboardConfig,
}

impl AppState {
    /// The configured dataset, served from the cache while the file is
    /// unchanged.
    pub(crate) fn dataset(&self) -> Result<Arc<Dataset>, AppError> {
        self.cache
            .load_path(&self.dashboard.data_path)
            .map_err(AppError::from)
    }
}

/// Parses `2022,2023` style year lists. Blank input is an empty selection.
pub(crate) fn parse_years(raw: &str) -> Result<BTreeSet<i32>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>()
                .map_err(|err| format!("failed to parse '{part}' as a year ({err})"))
        })
        .collect()
}

/// `None` means the caller expressed no choice.
pub(crate) fn selection_from(raw: Option<&str>) -> Result<YearSelection, String> {
    match raw {
        None => Ok(YearSelection::Default),
        Some(raw) => parse_years(raw).map(YearSelection::Explicit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_lists() {
        assert_eq!(
            parse_years(" 2022, 2024 ,2022").expect("parse"),
            BTreeSet::from([2022, 2024])
        );
        assert!(parse_years("").expect("parse").is_empty());
        assert!(parse_years("2022,next").is_err());
    }

    #[test]
    fn absent_years_mean_default_selection() {
        assert_eq!(selection_from(None), Ok(YearSelection::Default));
        assert_eq!(
            selection_from(Some("")),
            Ok(YearSelection::Explicit(BTreeSet::new()))
        );
    }
}
