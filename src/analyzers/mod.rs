//! Survey aggregation and reporting.
//!
//! This module computes the length-weighted condition score, per-year score
//! means, per-year distress densities, and the summary figures built on them.

pub mod aggregate;
pub mod grade;
pub mod summary;
pub mod types;
pub mod utility;
