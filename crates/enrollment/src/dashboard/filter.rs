use super::dataset::{ColumnLayout, Dataset};
use super::domain::CandidateRecord;
use std::collections::BTreeSet;

/// Number of most recent academic years selected when the caller picks none.
pub const DEFAULT_YEAR_WINDOW: usize = 3;

/// Distinct entering years present in the data, ascending.
pub fn available_years(dataset: &Dataset) -> Vec<i32> {
    dataset
        .records()
        .iter()
        .filter_map(|record| record.entering_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The last `window` years of [`available_years`].
pub fn default_years(dataset: &Dataset, window: usize) -> Vec<i32> {
    let years = available_years(dataset);
    let skip = years.len().saturating_sub(window);
    years.into_iter().skip(skip).collect()
}

/// Which academic years a caller wants to see.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearSelection {
    /// No choice made yet: most recent years, see [`default_years`].
    #[default]
    Default,
    /// An explicit set. Empty means "nothing", never "everything".
    Explicit(BTreeSet<i32>),
}

impl YearSelection {
    pub fn explicit<I: IntoIterator<Item = i32>>(years: I) -> Self {
        Self::Explicit(years.into_iter().collect())
    }

    pub fn resolve(&self, dataset: &Dataset, window: usize) -> BTreeSet<i32> {
        match self {
            Self::Default => default_years(dataset, window).into_iter().collect(),
            Self::Explicit(years) => years.clone(),
        }
    }
}

/// Rows of a [`Dataset`] restricted to a set of entering years. Borrows the
/// source; the dataset itself is never modified.
#[derive(Debug, Clone)]
pub struct FilteredTable<'a> {
    layout: &'a ColumnLayout,
    years: BTreeSet<i32>,
    rows: Vec<&'a CandidateRecord>,
}

impl<'a> FilteredTable<'a> {
    pub fn new(dataset: &'a Dataset, years: BTreeSet<i32>) -> Self {
        let rows = dataset
            .records()
            .iter()
            .filter(|record| {
                record
                    .entering_year
                    .is_some_and(|year| years.contains(&year))
            })
            .collect();

        Self {
            layout: dataset.layout(),
            years,
            rows,
        }
    }

    pub fn select(dataset: &'a Dataset, selection: &YearSelection, window: usize) -> Self {
        Self::new(dataset, selection.resolve(dataset, window))
    }

    pub fn layout(&self) -> &'a ColumnLayout {
        self.layout
    }

    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    pub fn rows(&self) -> &[&'a CandidateRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
