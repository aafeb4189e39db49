//! Query engine over a loaded PMIS table.
//!
//! The [`Engine`] owns an immutable [`Dataset`]; every query borrows it and
//! returns a fresh [`View`] or derived table, so one engine can serve
//! concurrent readers without locking.

use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::Utc;
use tracing::{debug, info};

use crate::analyzers::aggregate;
use crate::analyzers::summary::{key_insights, selection_title, summarize};
use crate::analyzers::types::{FilterOptions, Report, Summary, YearlyDistress, YearlyScores};
use crate::criteria::FilterCriteria;
use crate::dataset::{Dataset, View};
use crate::error::LoadError;
use crate::record::CellValue;
use crate::schema::Column;

/// Length thresholds offered by the displacement selectors.
pub const DISPLACEMENT_CHOICES: [f64; 3] = [0.0, 0.5, 0.7];

/// Splits a roadbed id such as `"IH0040 L"` into its route prefix and the
/// numeric value of the remainder. The remainder keeps only digits and `.`;
/// when it has no digits (or is absent) the number is 0.
pub fn highway_sort_key(value: &str) -> (&str, f64) {
    let mut parts = value.split_whitespace();
    let prefix = parts.next().unwrap_or("");

    let number = parts
        .next()
        .filter(|rest| rest.chars().any(|c| c.is_ascii_digit()))
        .and_then(|rest| {
            rest.chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect::<String>()
                .parse::<f64>()
                .ok()
        })
        .unwrap_or(0.0);

    (prefix, number)
}

pub struct Engine {
    dataset: Dataset,
}

impl Engine {
    pub fn new(dataset: Dataset) -> Self {
        info!(rows = dataset.len(), "Engine ready");
        Self { dataset }
    }

    /// Loads and validates a CSV table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(Self::new(Dataset::load(path)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(Self::new(Dataset::from_reader(reader)?))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Distinct values of `column`.
    ///
    /// Highway ids are ordered by route prefix, then by the numeric value of
    /// the remainder, with ties kept in order of first appearance. Every other
    /// column is returned in ascending natural order. Missing cells are skipped.
    pub fn unique_values(&self, column: Column) -> Vec<CellValue> {
        if column == Column::Highway {
            return self
                .sorted_highways()
                .into_iter()
                .map(CellValue::from)
                .collect();
        }

        let values: BTreeSet<CellValue> = self
            .dataset
            .records()
            .iter()
            .filter_map(|r| r.cell(column))
            .collect();
        debug!(column = %column, distinct = values.len(), "Unique values computed");
        values.into_iter().collect()
    }

    fn sorted_highways(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut highways: Vec<&str> = self
            .dataset
            .records()
            .iter()
            .map(|r| r.highway.as_str())
            .filter(|h| seen.insert(*h))
            .collect();

        // sort_by is stable, so equal keys keep first-appearance order
        highways.sort_by(|a, b| {
            let (pa, na) = highway_sort_key(a);
            let (pb, nb) = highway_sort_key(b);
            pa.cmp(pb).then(na.total_cmp(&nb))
        });
        highways
    }

    /// Rows of the full table matching `criteria`.
    #[tracing::instrument(skip_all, fields(rows = self.dataset.len()))]
    pub fn filter_data(&self, criteria: &FilterCriteria) -> View<'_> {
        self.dataset.view().filter(criteria)
    }

    /// Narrows an existing view; filtering a view by the criteria that
    /// produced it returns it unchanged.
    pub fn filter_view<'a>(&self, view: &View<'a>, criteria: &FilterCriteria) -> View<'a> {
        view.filter(criteria)
    }

    pub fn condition_score(&self, view: &View<'_>) -> f64 {
        aggregate::condition_score(view)
    }

    pub fn time_series(&self, view: &View<'_>) -> Vec<YearlyScores> {
        aggregate::time_series(view)
    }

    pub fn distress_per_mile(&self, view: &View<'_>) -> Vec<YearlyDistress> {
        aggregate::distress_per_mile(view)
    }

    pub fn summarize(&self, view: &View<'_>) -> Option<Summary> {
        summarize(view)
    }

    /// Marker choices available under the current selection, plus the fixed
    /// displacement thresholds.
    pub fn filter_options(&self, criteria: &FilterCriteria) -> FilterOptions {
        let view = self.filter_data(criteria);
        let distinct = |column: Column| -> Vec<CellValue> {
            view.iter()
                .filter_map(|r| r.cell(column))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        FilterOptions {
            begin_markers: distinct(Column::BeginMarker),
            end_markers: distinct(Column::EndMarker),
            min_length: DISPLACEMENT_CHOICES.to_vec(),
            max_length: DISPLACEMENT_CHOICES.to_vec(),
        }
    }

    /// Runs every aggregate for `criteria` and bundles the results.
    #[tracing::instrument(skip_all)]
    pub fn report(&self, criteria: &FilterCriteria) -> Report {
        let view = self.filter_data(criteria);
        let summary = self.summarize(&view);
        let insights = summary.as_ref().map(key_insights).unwrap_or_default();

        info!(
            rows = view.len(),
            condition_score = summary.as_ref().map(|s| s.condition_score),
            "Report computed"
        );

        Report {
            generated_at: Utc::now(),
            title: selection_title(criteria),
            criteria: criteria.clone(),
            summary,
            insights,
            time_series: self.time_series(&view),
            distress_per_mile: self.distress_per_mile(&view),
        }
    }
}
