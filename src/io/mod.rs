//! CSV input/output helpers (`with-csv` feature).
//!
//! Reading keeps every value as a string and tolerates ragged rows; an
//! input without a header row is fatal. Export appends the annotation
//! columns (`final_value`, `disposition`, `reasons`, `suggested_domain`)
//! after the original columns so the caller's data survives untouched.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::pipeline::{ClassifiedRow, ReasonStat};
use crate::table::Table;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input has no header row")]
    MissingHeader,
}

/// Annotation columns appended to exported partitions.
const ANNOTATION_COLUMNS: [&str; 4] = ["final_value", "disposition", "reasons", "suggested_domain"];

/// Read a CSV document into a [`Table`]; all values stay strings.
pub fn read_table<R: Read>(reader: R) -> Result<Table, CsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(CsvError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table::new(headers, rows))
}

pub fn read_table_from_path(path: &Path) -> Result<Table, CsvError> {
    read_table(File::open(path)?)
}

/// Serialize one partition: original columns plus the annotations.
pub fn rows_to_csv(table: &Table, rows: &[ClassifiedRow]) -> Result<Vec<u8>, CsvError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);

        let mut header: Vec<&str> = table.headers().iter().map(String::as_str).collect();
        header.extend(ANNOTATION_COLUMNS);
        writer.write_record(&header)?;

        for row in rows {
            let original = table
                .rows()
                .get(row.record.row_index)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let mut record: Vec<&str> = original.iter().map(String::as_str).collect();
            record.push(row.final_value());
            record.push(row.disposition.as_str());
            record.push(row.reason.map(|r| r.as_str()).unwrap_or(""));
            record.push(row.outcome.suggested_domain.as_deref().unwrap_or(""));
            writer.write_record(&record)?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

/// Serialize the rejection-reasons histogram.
pub fn histogram_to_csv(stats: &[ReasonStat]) -> Result<Vec<u8>, CsvError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(["reason", "count", "percent"])?;
        for stat in stats {
            writer.write_record([
                stat.reason.as_str(),
                &stat.count.to_string(),
                &stat.percent.to_string(),
            ])?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

/// Write via a temporary sibling file and rename, so readers never observe
/// a half-written export.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), CsvError> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
