//! Output formatting and export for query results.
//!
//! Supports pretty-printing, JSON serialization, CSV export of a view, and
//! the JSON row dump used for bulk reads.

use anyhow::{Result, bail};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::dataset::View;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a view as CSV under `columns`, the source header order.
///
/// Returns the number of data rows written.
pub fn write_csv<W: Write>(writer: W, columns: &[String], view: &View<'_>) -> Result<usize> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record(columns)?;
    for record in view {
        writer.write_record(columns.iter().map(|name| record.field(name)))?;
    }
    writer.flush()?;

    Ok(view.len())
}

/// Exports a view to `path`, gzip-compressing it when `gzip` is set.
pub fn export_csv(path: &str, columns: &[String], view: &View<'_>, gzip: bool) -> Result<usize> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;

    let rows = if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        let rows = write_csv(&mut encoder, columns, view)?;
        encoder.finish()?;
        rows
    } else {
        write_csv(file, columns, view)?
    };

    info!(path, rows, gzip, "Filtered data exported");
    Ok(rows)
}

/// Serializes a view as a JSON array of row objects keyed by column name.
/// Columns outside the required set appear as strings.
pub fn records_json(view: &View<'_>) -> Result<String> {
    let rows = view
        .iter()
        .map(|record| {
            let mut row = match serde_json::to_value(record)? {
                Value::Object(map) => map,
                other => bail!("record serialized as {other}, expected an object"),
            };
            for (name, value) in &record.extra {
                row.entry(name.as_str())
                    .or_insert_with(|| Value::String(value.clone()));
            }
            Ok(Value::Object(row))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::to_string(&rows)?)
}
