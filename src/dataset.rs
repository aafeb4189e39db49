//! The loaded survey table and borrowed views over it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::criteria::FilterCriteria;
use crate::error::LoadError;
use crate::record::Record;
use crate::schema::{self, REQUIRED_COLUMNS};

/// An immutable, ordered collection of survey records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Wraps records that were already built in memory.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            records,
        }
    }

    /// Reads a CSV table with a header row, validating the schema before any
    /// row is decoded. Columns outside the required set are kept as raw text
    /// in [`Record::extra`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let columns: Vec<String> = headers.iter().map(str::to_string).collect();
        schema::validate(&columns, &REQUIRED_COLUMNS)?;

        let extra_columns: Vec<(usize, &str)> = columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !REQUIRED_COLUMNS.contains(&name.as_str()))
            .map(|(i, name)| (i, name.as_str()))
            .collect();

        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            let mut record: Record = row.deserialize(Some(&headers))?;
            record.extra = extra_columns
                .iter()
                .filter_map(|&(i, name)| Some((name.to_string(), row.get(i)?.to_string())))
                .collect();
            records.push(record);
        }

        info!(
            rows = records.len(),
            columns = columns.len(),
            extra_columns = extra_columns.len(),
            "PMIS table loaded"
        );
        Ok(Self { columns, records })
    }

    /// Loads a CSV table from disk.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Header names as they appeared in the source table.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A view over every record, in source order.
    pub fn view(&self) -> View<'_> {
        self.records.iter().collect()
    }
}

/// A filtered subset of a [`Dataset`]. Rows are borrowed, never copied, and
/// keep their source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View<'a> {
    rows: Vec<&'a Record>,
}

impl<'a> View<'a> {
    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of segment lengths, in miles.
    pub fn total_length(&self) -> f64 {
        self.iter().map(|r| r.length).sum()
    }

    /// Narrows this view to the rows matching `criteria`.
    pub fn filter(&self, criteria: &FilterCriteria) -> View<'a> {
        let filtered: View<'a> = self.iter().filter(|r| criteria.matches(r)).collect();
        debug!(
            before = self.len(),
            after = filtered.len(),
            "Filter applied"
        );
        filtered
    }
}

impl<'a> FromIterator<&'a Record> for View<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Record>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a, 'v> IntoIterator for &'v View<'a> {
    type Item = &'a Record;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter().copied()
    }
}
