//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::criteria::FilterCriteria;
use crate::record::CellValue;

/// Mean scores for one survey year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyScores {
    pub year: i32,
    pub records: usize,
    pub condition_score: Option<f64>,
    pub distress_score: Option<f64>,
    pub ride_score: Option<f64>,
}

/// Summed distress counts for one survey year, with per-mile rates.
///
/// Rates are `None` when the year's summed length is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyDistress {
    pub year: i32,
    pub length: f64,
    pub spalled_cracks: u64,
    pub pcc_patches: u64,
    pub punchouts: u64,
    pub acp_patches: u64,
    pub spalled_cracks_per_mile: Option<f64>,
    pub pcc_patches_per_mile: Option<f64>,
    pub punchouts_per_mile: Option<f64>,
    pub acp_patches_per_mile: Option<f64>,
}

/// Headline numbers for a filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_records: usize,
    pub total_length: f64,
    /// Length-weighted condition score.
    pub condition_score: f64,
    pub condition_class: String,
    /// Maxima of the per-year mean scores.
    pub max_distress_score: Option<f64>,
    pub max_condition_score: Option<f64>,
    pub max_ride_score: Option<f64>,
}

/// Choices for the dependent filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub begin_markers: Vec<CellValue>,
    pub end_markers: Vec<CellValue>,
    pub min_length: Vec<f64>,
    pub max_length: Vec<f64>,
}

/// Complete result for one query, as emitted by the `report` command.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub criteria: FilterCriteria,
    pub summary: Option<Summary>,
    pub insights: Vec<String>,
    pub time_series: Vec<YearlyScores>,
    pub distress_per_mile: Vec<YearlyDistress>,
}
