//! Column names of the PMIS survey table and the up-front schema check.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{CriteriaError, SchemaError};

pub const EFF_YEAR: &str = "EFF_YEAR";
pub const HIGHWAY_ID: &str = "TX_SIGNED_HIGHWAY_RDBD_ID";
pub const PAVEMENT_TYPE: &str = "DETAILED_PAV_TYPE";
pub const BEGIN_MARKER: &str = "TX_BEG_REF_MARKER_NBR";
pub const END_MARKER: &str = "TX_END_REF_MARKER_NBR";
pub const LENGTH: &str = "TX_LENGTH";
pub const CONDITION_SCORE: &str = "TX_CONDITION_SCORE";
pub const DISTRESS_SCORE: &str = "TX_DISTRESS_SCORE";
pub const RIDE_SCORE: &str = "TX_RIDE_SCORE";
pub const SPALLED_CRACKS: &str = "TX_CRCP_SPALLED_CRACKS_QTY";
pub const PCC_PATCHES: &str = "TX_JCP_PCC_PATCHES_QTY";
pub const PUNCHOUTS: &str = "TX_CRCP_PUNCHOUT_QTY";
pub const ACP_PATCHES: &str = "TX_CRCP_ACP_PATCHES_QTY";

/// Columns every ingested table must carry.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    EFF_YEAR,
    HIGHWAY_ID,
    PAVEMENT_TYPE,
    BEGIN_MARKER,
    END_MARKER,
    LENGTH,
    CONDITION_SCORE,
    DISTRESS_SCORE,
    RIDE_SCORE,
    SPALLED_CRACKS,
    PCC_PATCHES,
    PUNCHOUTS,
    ACP_PATCHES,
];

/// Checks that `headers` contains every name in `required`.
///
/// All absent columns are collected before failing so the caller can report
/// the complete set in one message.
pub fn validate<S: AsRef<str>>(headers: &[S], required: &[&str]) -> Result<(), SchemaError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h.as_ref() == **col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        debug!(columns = headers.len(), "Schema check passed");
        Ok(())
    } else {
        warn!(missing = ?missing, "Schema check failed");
        Err(SchemaError::MissingColumns(missing))
    }
}

/// A queryable column of the survey table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Year,
    Highway,
    PavementType,
    BeginMarker,
    EndMarker,
    Length,
    ConditionScore,
    DistressScore,
    RideScore,
    SpalledCracks,
    PccPatches,
    Punchouts,
    AcpPatches,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Year,
        Column::Highway,
        Column::PavementType,
        Column::BeginMarker,
        Column::EndMarker,
        Column::Length,
        Column::ConditionScore,
        Column::DistressScore,
        Column::RideScore,
        Column::SpalledCracks,
        Column::PccPatches,
        Column::Punchouts,
        Column::AcpPatches,
    ];

    /// Header name of this column in the source table.
    pub fn name(self) -> &'static str {
        match self {
            Column::Year => EFF_YEAR,
            Column::Highway => HIGHWAY_ID,
            Column::PavementType => PAVEMENT_TYPE,
            Column::BeginMarker => BEGIN_MARKER,
            Column::EndMarker => END_MARKER,
            Column::Length => LENGTH,
            Column::ConditionScore => CONDITION_SCORE,
            Column::DistressScore => DISTRESS_SCORE,
            Column::RideScore => RIDE_SCORE,
            Column::SpalledCracks => SPALLED_CRACKS,
            Column::PccPatches => PCC_PATCHES,
            Column::Punchouts => PUNCHOUTS,
            Column::AcpPatches => ACP_PATCHES,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the source header (case-insensitive) or the short names
/// used by filter criteria (`year`, `highway`, `begin_rm`, ...).
impl FromStr for Column {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(column) = Column::ALL
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
        {
            return Ok(*column);
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "year" => Ok(Column::Year),
            "highway" => Ok(Column::Highway),
            "pavement_type" => Ok(Column::PavementType),
            "begin_rm" => Ok(Column::BeginMarker),
            "end_rm" => Ok(Column::EndMarker),
            "length" => Ok(Column::Length),
            "condition" => Ok(Column::ConditionScore),
            "distress" => Ok(Column::DistressScore),
            "ride" => Ok(Column::RideScore),
            _ => Err(CriteriaError::UnknownColumn(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_full_header() {
        let mut headers: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        headers.push("EXTRA_COLUMN");
        assert!(validate(&headers, &REQUIRED_COLUMNS).is_ok());
    }

    #[test]
    fn test_validate_reports_every_missing_column() {
        let headers = vec![EFF_YEAR, HIGHWAY_ID, LENGTH];
        let err = validate(&headers, &REQUIRED_COLUMNS).unwrap_err();

        let SchemaError::MissingColumns(missing) = err;
        assert_eq!(missing.len(), 10);
        assert_eq!(missing[0], PAVEMENT_TYPE);
        assert_eq!(missing[9], ACP_PATCHES);
        assert!(!missing.contains(&LENGTH.to_string()));
    }

    #[test]
    fn test_validate_empty_header() {
        let headers: Vec<String> = Vec::new();
        let err = validate(&headers, &REQUIRED_COLUMNS).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns(REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect())
        );
    }

    #[test]
    fn test_schema_error_message_lists_columns() {
        let err = SchemaError::MissingColumns(vec![LENGTH.into(), RIDE_SCORE.into()]);
        assert_eq!(err.to_string(), "missing columns: TX_LENGTH, TX_RIDE_SCORE");
    }

    #[test]
    fn test_column_from_str() {
        assert_eq!("TX_LENGTH".parse::<Column>().unwrap(), Column::Length);
        assert_eq!("tx_ride_score".parse::<Column>().unwrap(), Column::RideScore);
        assert_eq!("begin_rm".parse::<Column>().unwrap(), Column::BeginMarker);
        assert_eq!(
            "speed".parse::<Column>().unwrap_err(),
            CriteriaError::UnknownColumn("speed".into())
        );
    }

    #[test]
    fn test_column_names_match_required_list() {
        let names: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, REQUIRED_COLUMNS.to_vec());
    }
}
