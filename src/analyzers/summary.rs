//! Headline summary, narrative insights, and the selection title.

use crate::analyzers::aggregate::{condition_score, time_series};
use crate::analyzers::grade::condition_class;
use crate::analyzers::types::Summary;
use crate::analyzers::utility::max_present;
use crate::criteria::FilterCriteria;
use crate::dataset::View;

/// Summarizes a view. `None` means there is no data to report.
pub fn summarize(view: &View<'_>) -> Option<Summary> {
    if view.is_empty() {
        return None;
    }

    let yearly = time_series(view);
    let score = condition_score(view);

    Some(Summary {
        total_records: view.len(),
        total_length: view.total_length(),
        condition_score: score,
        condition_class: condition_class(score),
        max_distress_score: max_present(yearly.iter().map(|y| y.distress_score)),
        max_condition_score: max_present(yearly.iter().map(|y| y.condition_score)),
        max_ride_score: max_present(yearly.iter().map(|y| y.ride_score)),
    })
}

fn fmt_score(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Three plain-language observations drawn from a summary.
pub fn key_insights(summary: &Summary) -> Vec<String> {
    vec![
        format!(
            "The average condition score is {:.2} ({}), indicating the overall condition of the pavement.",
            summary.condition_score, summary.condition_class
        ),
        format!(
            "The maximum distress score recorded is {}, highlighting the worst affected areas.",
            fmt_score(summary.max_distress_score)
        ),
        format!(
            "The maximum ride score is {}, showing the best ride quality observed.",
            fmt_score(summary.max_ride_score)
        ),
    ]
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Human-readable label for the current selection, e.g.
/// `IH0040 L RM 510 + 0.5 to RM 530 + 0.7`.
pub fn selection_title(criteria: &FilterCriteria) -> String {
    let Some(highways) = criteria.selected_highways() else {
        return "Please select a highway".to_string();
    };

    let mut title = highways.join(", ");
    if let Some(begin) = criteria.begin_markers.as_deref().filter(|m| !m.is_empty()) {
        title.push_str(&format!(" RM {}", join(begin)));
    }
    if let Some(min) = criteria.min_length_bound() {
        title.push_str(&format!(" + {min}"));
    }
    if let Some(end) = criteria.end_markers.as_deref().filter(|m| !m.is_empty()) {
        title.push_str(&format!(" to RM {}", join(end)));
    }
    if let Some(max) = criteria.max_length_bound() {
        title.push_str(&format!(" + {max}"));
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Threshold;
    use crate::dataset::Dataset;
    use crate::record::tests::record;

    #[test]
    fn test_summarize_empty_view() {
        assert_eq!(summarize(&View::default()), None);
    }

    #[test]
    fn test_summarize_uses_yearly_maxima() {
        let mut a = record(2019, "IH0040 L", 2.0, 80.0);
        a.distress_score = Some(70.0);
        let mut b = record(2019, "IH0040 L", 3.0, 90.0);
        b.distress_score = Some(90.0);
        let mut c = record(2020, "IH0040 L", 5.0, 60.0);
        c.distress_score = Some(85.0);
        c.ride_score = Some(4.2);
        let dataset = Dataset::from_records(vec![a, b, c]);

        let summary = summarize(&dataset.view()).unwrap();
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.total_length, 10.0);
        assert_eq!(summary.condition_score, 73.0);
        assert_eq!(summary.condition_class, "Good");
        assert_eq!(summary.max_condition_score, Some(85.0));
        assert_eq!(summary.max_distress_score, Some(85.0));
        assert_eq!(summary.max_ride_score, Some(4.2));
    }

    #[test]
    fn test_key_insights() {
        let dataset = Dataset::from_records(vec![record(2019, "IH0040 L", 1.0, 91.0)]);
        let summary = summarize(&dataset.view()).unwrap();
        let insights = key_insights(&summary);

        assert_eq!(insights.len(), 3);
        assert!(insights[0].contains("91.00 (Very Good)"));
        assert!(insights[2].contains("3.00"));
    }

    #[test]
    fn test_selection_title_without_highway() {
        assert_eq!(
            selection_title(&FilterCriteria::default()),
            "Please select a highway"
        );
    }

    #[test]
    fn test_selection_title_full() {
        let criteria = FilterCriteria::new()
            .highway("IH0040 L")
            .begin_markers([510.0])
            .min_length([Threshold::Miles(0.5), Threshold::All])
            .end_markers([530.0])
            .max_length([Threshold::Miles(0.7)]);
        assert_eq!(
            selection_title(&criteria),
            "IH0040 L RM 510 + 0.5 to RM 530 + 0.7"
        );
    }

    #[test]
    fn test_selection_title_highway_only() {
        let criteria = FilterCriteria::new().highway("US0081 R");
        assert_eq!(selection_title(&criteria), "US0081 R");
    }
}
