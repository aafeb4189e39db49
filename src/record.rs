//! One pavement survey row and the cell values exposed to callers.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::Column;

/// A single PMIS survey record, keyed by the source column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "EFF_YEAR")]
    pub year: i32,
    #[serde(rename = "TX_SIGNED_HIGHWAY_RDBD_ID")]
    pub highway: String,
    #[serde(rename = "DETAILED_PAV_TYPE", default)]
    pub pavement_type: String,
    // markers; a blank cell is missing and never matches a marker filter
    #[serde(rename = "TX_BEG_REF_MARKER_NBR")]
    pub begin_marker: Option<f64>,
    #[serde(rename = "TX_END_REF_MARKER_NBR")]
    pub end_marker: Option<f64>,
    /// Segment length in miles. Empty cells read as 0.
    #[serde(rename = "TX_LENGTH", deserialize_with = "empty_as_zero")]
    pub length: f64,

    // scores; empty cells stay missing
    #[serde(rename = "TX_CONDITION_SCORE")]
    pub condition_score: Option<f64>,
    #[serde(rename = "TX_DISTRESS_SCORE")]
    pub distress_score: Option<f64>,
    #[serde(rename = "TX_RIDE_SCORE")]
    pub ride_score: Option<f64>,

    // distress counts
    #[serde(rename = "TX_CRCP_SPALLED_CRACKS_QTY", deserialize_with = "count")]
    pub spalled_cracks: u32,
    #[serde(rename = "TX_JCP_PCC_PATCHES_QTY", deserialize_with = "count")]
    pub pcc_patches: u32,
    #[serde(rename = "TX_CRCP_PUNCHOUT_QTY", deserialize_with = "count")]
    pub punchouts: u32,
    #[serde(rename = "TX_CRCP_ACP_PATCHES_QTY", deserialize_with = "count")]
    pub acp_patches: u32,

    /// Source columns outside the required set, as raw text by header name.
    #[serde(skip)]
    pub extra: BTreeMap<String, String>,
}

fn empty_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Counts exported by spreadsheet tools often arrive as `3.0`; accept those
/// and clamp anything negative to zero.
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    Ok(value.max(0.0).round() as u32)
}

impl Record {
    /// Returns the value stored in `column`, or `None` for a missing score or
    /// reference marker.
    pub fn cell(&self, column: Column) -> Option<CellValue> {
        let value = match column {
            Column::Year => CellValue::Integer(self.year.into()),
            Column::Highway => CellValue::Text(self.highway.clone()),
            Column::PavementType => CellValue::Text(self.pavement_type.clone()),
            Column::BeginMarker => CellValue::Real(self.begin_marker?),
            Column::EndMarker => CellValue::Real(self.end_marker?),
            Column::Length => CellValue::Real(self.length),
            Column::ConditionScore => CellValue::Real(self.condition_score?),
            Column::DistressScore => CellValue::Real(self.distress_score?),
            Column::RideScore => CellValue::Real(self.ride_score?),
            Column::SpalledCracks => CellValue::Integer(self.spalled_cracks.into()),
            Column::PccPatches => CellValue::Integer(self.pcc_patches.into()),
            Column::Punchouts => CellValue::Integer(self.punchouts.into()),
            Column::AcpPatches => CellValue::Integer(self.acp_patches.into()),
        };
        Some(value)
    }

    /// Raw text of the cell under source header `name`; blank when missing.
    pub fn field(&self, name: &str) -> String {
        match Column::ALL.iter().find(|c| c.name() == name) {
            Some(column) => self.cell(*column).map(|v| v.to_string()).unwrap_or_default(),
            None => self.extra.get(name).cloned().unwrap_or_default(),
        }
    }
}

/// A single cell of the survey table.
///
/// Values of one column always share a variant. Ordering is total: reals use
/// [`f64::total_cmp`], so distinct-value enumeration can rely on `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Real(r) => Some(*r),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Integer(_) | CellValue::Real(_) => 0,
            CellValue::Text(_) => 1,
        }
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Real(r) => write!(f, "{r}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Real(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a record with the fields the engine tests care about.
    pub(crate) fn record(year: i32, highway: &str, length: f64, condition: f64) -> Record {
        Record {
            year,
            highway: highway.to_string(),
            pavement_type: "CRCP".to_string(),
            begin_marker: Some(500.0),
            end_marker: Some(502.0),
            length,
            condition_score: Some(condition),
            distress_score: Some(condition),
            ride_score: Some(3.0),
            spalled_cracks: 0,
            pcc_patches: 0,
            punchouts: 0,
            acp_patches: 0,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_cell_values() {
        let r = record(2020, "IH0040 L", 0.5, 88.0);
        assert_eq!(r.cell(Column::Year), Some(CellValue::Integer(2020)));
        assert_eq!(r.cell(Column::Highway), Some(CellValue::from("IH0040 L")));
        assert_eq!(r.cell(Column::Length), Some(CellValue::Real(0.5)));
    }

    #[test]
    fn test_missing_score_has_no_cell() {
        let mut r = record(2020, "IH0040 L", 0.5, 88.0);
        r.ride_score = None;
        assert_eq!(r.cell(Column::RideScore), None);
    }

    #[test]
    fn test_missing_marker_has_no_cell() {
        let mut r = record(2020, "IH0040 L", 0.5, 88.0);
        r.begin_marker = None;
        assert_eq!(r.cell(Column::BeginMarker), None);
        assert_eq!(r.field("TX_BEG_REF_MARKER_NBR"), "");
        assert_eq!(r.field("TX_END_REF_MARKER_NBR"), "502");
    }

    #[test]
    fn test_field_reads_extra_columns() {
        let mut r = record(2020, "IH0040 L", 0.5, 88.0);
        r.extra.insert("DISTRICT".to_string(), "ELP".to_string());
        assert_eq!(r.field("DISTRICT"), "ELP");
        assert_eq!(r.field("EFF_YEAR"), "2020");
        assert_eq!(r.field("COUNTY"), "");
    }

    #[test]
    fn test_cell_ordering() {
        assert!(CellValue::Real(2.0) < CellValue::Real(10.0));
        assert!(CellValue::Integer(3) < CellValue::Real(3.5));
        assert!(CellValue::from("IH0010") < CellValue::from("IH0040"));
        assert_eq!(CellValue::Integer(2), CellValue::Real(2.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Real(510.0).to_string(), "510");
        assert_eq!(CellValue::Real(0.5).to_string(), "0.5");
        assert_eq!(CellValue::from("SH0006 2").to_string(), "SH0006 2");
    }
}
