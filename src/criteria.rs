//! Filter criteria: one optional value set per filterable dimension.
//!
//! An absent or empty set never restricts its dimension, and the sentinel
//! `"all"` is dropped from every set before it is used. Loosely typed criteria
//! (a JSON object of key to scalar-or-list) are converted here, at the
//! boundary, so the rest of the crate only sees the typed form.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::error::CriteriaError;
use crate::record::Record;

/// Selection sentinel meaning "every value".
pub const ALL: &str = "all";

/// One entry of a length-threshold selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    All,
    Miles(f64),
}

impl Threshold {
    pub fn miles(self) -> Option<f64> {
        match self {
            Threshold::All => None,
            Threshold::Miles(m) => Some(m),
        }
    }
}

impl FromStr for Threshold {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            return Ok(Threshold::All);
        }
        parse_finite(s)
            .map(Threshold::Miles)
            .ok_or_else(|| CriteriaError::InvalidValue {
                key: "threshold".to_string(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::All => f.write_str(ALL),
            Threshold::Miles(m) => write!(f, "{m}"),
        }
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Threshold::All => serializer.serialize_str(ALL),
            Threshold::Miles(m) => serializer.serialize_f64(*m),
        }
    }
}

/// Conjunctive filter over the survey table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub years: Option<Vec<i32>>,
    pub highways: Option<Vec<String>>,
    pub begin_markers: Option<Vec<f64>>,
    pub end_markers: Option<Vec<f64>>,
    /// Keeps segments at least as long as the smallest selected threshold.
    pub min_length: Option<Vec<Threshold>>,
    /// Keeps segments no longer than the largest selected threshold.
    pub max_length: Option<Vec<Threshold>>,
}

fn restriction<T>(set: &Option<Vec<T>>) -> Option<&[T]> {
    set.as_deref().filter(|s| !s.is_empty())
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years = Some(years.into_iter().collect());
        self
    }

    /// Selects highways by roadbed id; `"all"` entries are dropped.
    pub fn highways<S: Into<String>>(mut self, highways: impl IntoIterator<Item = S>) -> Self {
        self.highways = Some(
            highways
                .into_iter()
                .map(Into::into)
                .filter(|h: &String| !h.is_empty() && !h.eq_ignore_ascii_case(ALL))
                .collect(),
        );
        self
    }

    pub fn highway(self, highway: impl Into<String>) -> Self {
        self.highways([highway.into()])
    }

    pub fn begin_markers(mut self, markers: impl IntoIterator<Item = f64>) -> Self {
        self.begin_markers = Some(markers.into_iter().collect());
        self
    }

    pub fn end_markers(mut self, markers: impl IntoIterator<Item = f64>) -> Self {
        self.end_markers = Some(markers.into_iter().collect());
        self
    }

    pub fn min_length(mut self, thresholds: impl IntoIterator<Item = Threshold>) -> Self {
        self.min_length = Some(thresholds.into_iter().collect());
        self
    }

    pub fn max_length(mut self, thresholds: impl IntoIterator<Item = Threshold>) -> Self {
        self.max_length = Some(thresholds.into_iter().collect());
        self
    }

    /// Smallest selected minimum-length threshold, ignoring the sentinel.
    pub fn min_length_bound(&self) -> Option<f64> {
        restriction(&self.min_length)?
            .iter()
            .filter_map(|t| t.miles())
            .reduce(f64::min)
    }

    /// Largest selected maximum-length threshold, ignoring the sentinel.
    pub fn max_length_bound(&self) -> Option<f64> {
        restriction(&self.max_length)?
            .iter()
            .filter_map(|t| t.miles())
            .reduce(f64::max)
    }

    /// Highways actually restricting the filter, if any.
    pub fn selected_highways(&self) -> Option<&[String]> {
        restriction(&self.highways)
    }

    pub fn is_unrestricted(&self) -> bool {
        restriction(&self.years).is_none()
            && restriction(&self.highways).is_none()
            && restriction(&self.begin_markers).is_none()
            && restriction(&self.end_markers).is_none()
            && self.min_length_bound().is_none()
            && self.max_length_bound().is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        if let Some(years) = restriction(&self.years) {
            if !years.contains(&record.year) {
                return false;
            }
        }
        if let Some(highways) = restriction(&self.highways) {
            if !highways.iter().any(|h| *h == record.highway) {
                return false;
            }
        }
        if let Some(markers) = restriction(&self.begin_markers) {
            if !record.begin_marker.is_some_and(|m| markers.contains(&m)) {
                return false;
            }
        }
        if let Some(markers) = restriction(&self.end_markers) {
            if !record.end_marker.is_some_and(|m| markers.contains(&m)) {
                return false;
            }
        }
        if let Some(min) = self.min_length_bound() {
            if record.length < min {
                return false;
            }
        }
        if let Some(max) = self.max_length_bound() {
            if record.length > max {
                return false;
            }
        }
        true
    }

    /// Parses criteria from JSON text; see [`FilterCriteria::from_json`].
    pub fn from_json_str(text: &str) -> Result<Self, CriteriaError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| CriteriaError::Malformed(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Converts a loosely typed criteria object.
    ///
    /// Recognized keys: `year`, `highway`, `begin_rm`, `end_rm`,
    /// `displacement1` (alias `min_length`) and `displacement2` (alias
    /// `max_length`). Unknown keys are ignored, `null` is an absent criterion,
    /// and a scalar is treated as a one-element set.
    pub fn from_json(value: &Value) -> Result<Self, CriteriaError> {
        let Value::Object(map) = value else {
            return Err(CriteriaError::NotAnObject(json_kind(value).to_string()));
        };

        let mut criteria = FilterCriteria::default();
        for (key, raw) in map {
            let items = as_items(raw);
            match key.as_str() {
                "year" | "years" => criteria.years = Some(collect(key, &items, parse_year)?),
                "highway" | "highways" => {
                    criteria.highways = Some(collect(key, &items, parse_text)?)
                }
                "begin_rm" => criteria.begin_markers = Some(collect(key, &items, parse_number)?),
                "end_rm" => criteria.end_markers = Some(collect(key, &items, parse_number)?),
                "displacement1" | "min_length" => {
                    criteria.min_length = Some(thresholds(key, &items)?)
                }
                "displacement2" | "max_length" => {
                    criteria.max_length = Some(thresholds(key, &items)?)
                }
                other => debug!(key = other, "Ignoring unrecognized criterion"),
            }
        }
        Ok(criteria)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn as_items(raw: &Value) -> Vec<&Value> {
    match raw {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().collect(),
        scalar => vec![scalar],
    }
}

fn is_sentinel(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty() || s.trim().eq_ignore_ascii_case(ALL),
        _ => false,
    }
}

fn invalid(key: &str, value: &Value) -> CriteriaError {
    CriteriaError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn collect<T>(
    key: &str,
    items: &[&Value],
    parse: fn(&Value) -> Option<T>,
) -> Result<Vec<T>, CriteriaError> {
    items
        .iter()
        .filter(|v| !is_sentinel(v))
        .map(|v| parse(v).ok_or_else(|| invalid(key, v)))
        .collect()
}

fn thresholds(key: &str, items: &[&Value]) -> Result<Vec<Threshold>, CriteriaError> {
    items
        .iter()
        .map(|v| {
            if is_sentinel(v) {
                Ok(Threshold::All)
            } else {
                parse_number(v)
                    .map(Threshold::Miles)
                    .ok_or_else(|| invalid(key, v))
            }
        })
        .collect()
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_finite(s.trim()),
        _ => None,
    }
}

fn parse_year(value: &Value) -> Option<i32> {
    let number = parse_number(value)?;
    if number.fract() != 0.0 {
        return None;
    }
    i32::try_from(number as i64).ok()
}

fn parse_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::record;
    use serde_json::json;

    #[test]
    fn test_default_is_unrestricted() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_unrestricted());
        assert!(criteria.matches(&record(2019, "IH0040 L", 0.5, 80.0)));
    }

    #[test]
    fn test_empty_sets_do_not_restrict() {
        let criteria = FilterCriteria::new().years([]).begin_markers([]);
        assert!(criteria.is_unrestricted());
    }

    #[test]
    fn test_min_threshold_excludes_sentinel() {
        let criteria = FilterCriteria::from_json(&json!({ "displacement1": [0.5, "all"] })).unwrap();
        assert_eq!(criteria.min_length_bound(), Some(0.5));
        assert!(!criteria.matches(&record(2019, "IH0040 L", 0.2, 80.0)));
        assert!(criteria.matches(&record(2019, "IH0040 L", 0.5, 80.0)));
    }

    #[test]
    fn test_threshold_bounds_use_extremes() {
        let criteria = FilterCriteria::new()
            .min_length([Threshold::Miles(0.7), Threshold::Miles(0.0)])
            .max_length([Threshold::Miles(0.5), Threshold::Miles(0.7), Threshold::All]);
        assert_eq!(criteria.min_length_bound(), Some(0.0));
        assert_eq!(criteria.max_length_bound(), Some(0.7));
        assert!(!criteria.matches(&record(2019, "IH0040 L", 0.8, 80.0)));
    }

    #[test]
    fn test_sentinel_only_threshold_is_unrestricted() {
        let criteria = FilterCriteria::new().min_length([Threshold::All]);
        assert_eq!(criteria.min_length_bound(), None);
        assert!(criteria.is_unrestricted());
    }

    #[test]
    fn test_highway_all_is_unrestricted() {
        let criteria = FilterCriteria::from_json(&json!({ "year": [], "highway": "all" })).unwrap();
        assert!(criteria.is_unrestricted());

        let built = FilterCriteria::new().highway("all");
        assert!(built.is_unrestricted());
    }

    #[test]
    fn test_scalar_is_normalized_to_set() {
        let criteria = FilterCriteria::from_json(&json!({ "year": 2020, "highway": "IH0040 L" })).unwrap();
        assert_eq!(criteria.years, Some(vec![2020]));
        assert_eq!(criteria.highways, Some(vec!["IH0040 L".to_string()]));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let criteria =
            FilterCriteria::from_json(&json!({ "district": "AUS", "end_rm": [512, "514"] })).unwrap();
        assert_eq!(criteria.end_markers, Some(vec![512.0, 514.0]));
        assert_eq!(criteria.years, None);
    }

    #[test]
    fn test_non_numeric_threshold_is_rejected() {
        let err = FilterCriteria::from_json(&json!({ "displacement2": ["long"] })).unwrap_err();
        assert_eq!(
            err,
            CriteriaError::InvalidValue {
                key: "displacement2".to_string(),
                value: "\"long\"".to_string(),
            }
        );
    }

    #[test]
    fn test_fractional_year_is_rejected() {
        let err = FilterCriteria::from_json(&json!({ "year": [2019.5] })).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidValue { ref key, .. } if key == "year"));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = FilterCriteria::from_json(&json!([2019])).unwrap_err();
        assert_eq!(err, CriteriaError::NotAnObject("array".to_string()));
        assert!(matches!(
            FilterCriteria::from_json_str("{year:"),
            Err(CriteriaError::Malformed(_))
        ));
    }

    #[test]
    fn test_threshold_from_str() {
        assert_eq!("all".parse::<Threshold>().unwrap(), Threshold::All);
        assert_eq!(" 0.7 ".parse::<Threshold>().unwrap(), Threshold::Miles(0.7));
        assert!("NaN".parse::<Threshold>().is_err());
        match "half".parse::<Threshold>() {
            Err(CriteriaError::InvalidValue { key, value }) => {
                assert_eq!(key, "threshold");
                assert_eq!(value, "half");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_marker_never_matches_marker_filter() {
        let mut r = record(2020, "IH0040 L", 0.5, 80.0);
        r.begin_marker = None;
        assert!(!FilterCriteria::new().begin_markers([500.0]).matches(&r));
        assert!(FilterCriteria::new().end_markers([502.0]).matches(&r));
        assert!(FilterCriteria::new().matches(&r));
    }

    #[test]
    fn test_criteria_serialize_sentinel() {
        let criteria = FilterCriteria::new().min_length([Threshold::Miles(0.5), Threshold::All]);
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["min_length"], json!([0.5, "all"]));
        assert_eq!(json["years"], Value::Null);
    }
}
