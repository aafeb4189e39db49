pub mod analyzers;
pub mod config;
pub mod criteria;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod output;
pub mod record;
pub mod schema;

pub use criteria::{FilterCriteria, Threshold};
pub use dataset::{Dataset, View};
pub use engine::Engine;
pub use error::{CriteriaError, LoadError, SchemaError};
pub use record::{CellValue, Record};
pub use schema::Column;
