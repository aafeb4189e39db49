//! Error types for loading and querying a PMIS table.

use thiserror::Error;

/// The ingested table does not expose the columns the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Every required column that was absent, in required-list order.
    #[error("missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Filter criteria (or a column name) that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("criteria must be a JSON object, got {0}")]
    NotAnObject(String),

    #[error("criteria are not valid JSON: {0}")]
    Malformed(String),

    #[error("invalid value for criterion '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}

/// Failure while constructing a dataset from tabular text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to read PMIS table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode PMIS row: {0}")]
    Csv(#[from] csv::Error),
}
