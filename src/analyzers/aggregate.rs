use std::collections::BTreeMap;

use crate::analyzers::types::{YearlyDistress, YearlyScores};
use crate::analyzers::utility::{mean, per_mile};
use crate::dataset::View;

/// Length-weighted mean condition score: `Σ(length · condition) / Σ length`.
///
/// A row without a condition score adds nothing to the numerator but its
/// length still counts in the denominator. Returns 0.0 for an empty view or
/// when the total length is zero.
pub fn condition_score(view: &View<'_>) -> f64 {
    let (weighted_total, length_sum) = view.iter().fold((0.0, 0.0), |(total, sum), r| {
        let weighted = r.condition_score.map_or(0.0, |score| r.length * score);
        (total + weighted, sum + r.length)
    });

    if length_sum == 0.0 {
        0.0
    } else {
        weighted_total / length_sum
    }
}

#[derive(Default)]
struct ScoreSeries {
    records: usize,
    condition: Vec<f64>,
    distress: Vec<f64>,
    ride: Vec<f64>,
}

/// Groups a view by survey year and averages the three scores.
///
/// Years with no rows in the view are absent; output is ordered by year.
pub fn time_series(view: &View<'_>) -> Vec<YearlyScores> {
    let mut by_year: BTreeMap<i32, ScoreSeries> = BTreeMap::new();

    for row in view {
        let series = by_year.entry(row.year).or_default();
        series.records += 1;
        series.condition.extend(row.condition_score);
        series.distress.extend(row.distress_score);
        series.ride.extend(row.ride_score);
    }

    by_year
        .into_iter()
        .map(|(year, s)| YearlyScores {
            year,
            records: s.records,
            condition_score: mean(&s.condition),
            distress_score: mean(&s.distress),
            ride_score: mean(&s.ride),
        })
        .collect()
}

#[derive(Default)]
struct DistressTotals {
    length: f64,
    spalled_cracks: u64,
    pcc_patches: u64,
    punchouts: u64,
    acp_patches: u64,
}

/// Groups a view by survey year, sums distress counts and length, and derives
/// per-mile rates. A year whose summed length is zero keeps its sums but
/// reports every rate as `None`.
pub fn distress_per_mile(view: &View<'_>) -> Vec<YearlyDistress> {
    let mut by_year: BTreeMap<i32, DistressTotals> = BTreeMap::new();

    for row in view {
        let totals = by_year.entry(row.year).or_default();
        totals.length += row.length;
        totals.spalled_cracks += u64::from(row.spalled_cracks);
        totals.pcc_patches += u64::from(row.pcc_patches);
        totals.punchouts += u64::from(row.punchouts);
        totals.acp_patches += u64::from(row.acp_patches);
    }

    by_year
        .into_iter()
        .map(|(year, t)| YearlyDistress {
            year,
            length: t.length,
            spalled_cracks: t.spalled_cracks,
            pcc_patches: t.pcc_patches,
            punchouts: t.punchouts,
            acp_patches: t.acp_patches,
            spalled_cracks_per_mile: per_mile(t.spalled_cracks, t.length),
            pcc_patches_per_mile: per_mile(t.pcc_patches, t.length),
            punchouts_per_mile: per_mile(t.punchouts, t.length),
            acp_patches_per_mile: per_mile(t.acp_patches, t.length),
        })
        .collect()
}
