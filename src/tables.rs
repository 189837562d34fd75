//! Typed loaders for the input tables and rendering of delimited output.
//!
//! Columns are located by header name, so extra columns (the merged statistics
//! table carries `path_count`, for instance) pass through unnoticed. Any row
//! that cannot be read into the expected shape aborts the load with a
//! [`TableError`] naming the line and column.

use std::{io::Read, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use thiserror::Error;

use crate::{config::DiscoveryConfig, io_utils};

pub const PATH_COLUMN: &str = "path";
pub const DISTINCT_COUNT_COLUMN: &str = "distinct_value_count";
pub const VALUE_COLUMN: &str = "value";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("missing required column '{column}' (found: {found})")]
    MissingColumn { column: &'static str, found: String },
    #[error("line {line}: column '{column}' is missing")]
    MissingField { line: usize, column: &'static str },
    #[error("line {line}: column '{column}' expects a non-negative integer, found '{value}'")]
    InvalidCount {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: expected at most {expected} field(s), found {found}")]
    TooManyFields {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Distinct-value statistics for one raw path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStat {
    pub path: String,
    pub distinct_value_count: u64,
}

/// One sampled value; `None` stands for an empty cell or configured null token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSample {
    pub path: String,
    pub value: Option<String>,
}

pub fn column_position(headers: &[String], column: &'static str) -> Result<usize, TableError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| TableError::MissingColumn {
            column,
            found: headers.join(", "),
        })
}

pub fn parse_count(raw: &str, line: usize, column: &'static str) -> Result<u64, TableError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| TableError::InvalidCount {
            line,
            column,
            value: raw.to_string(),
        })
}

/// Reads every data row as decoded fields, paired with its 1-based line number.
fn decoded_rows<R: Read>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
    width: usize,
) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let line = row_idx + 2;
        let record = record.with_context(|| format!("Reading line {line}"))?;
        if record.len() > width {
            return Err(TableError::TooManyFields {
                line,
                expected: width,
                found: record.len(),
            }
            .into());
        }
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding line {line}"))?;
        rows.push((line, decoded));
    }
    Ok(rows)
}

pub fn read_path_stats<R: Read>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<PathStat>> {
    let headers = io_utils::reader_headers(reader, encoding)?;
    let path_idx = column_position(&headers, PATH_COLUMN)?;
    let count_idx = column_position(&headers, DISTINCT_COUNT_COLUMN)?;

    decoded_rows(reader, encoding, headers.len())?
        .into_iter()
        .map(|(line, mut fields)| -> Result<PathStat> {
            let raw_count = fields.get(count_idx).ok_or(TableError::MissingField {
                line,
                column: DISTINCT_COUNT_COLUMN,
            })?;
            let distinct_value_count = parse_count(raw_count, line, DISTINCT_COUNT_COLUMN)?;
            if path_idx >= fields.len() {
                return Err(TableError::MissingField {
                    line,
                    column: PATH_COLUMN,
                }
                .into());
            }
            Ok(PathStat {
                path: fields.swap_remove(path_idx),
                distinct_value_count,
            })
        })
        .collect()
}

pub fn read_value_samples<R: Read>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
    config: &DiscoveryConfig,
) -> Result<Vec<ValueSample>> {
    let headers = io_utils::reader_headers(reader, encoding)?;
    let path_idx = column_position(&headers, PATH_COLUMN)?;
    let value_idx = column_position(&headers, VALUE_COLUMN)?;

    decoded_rows(reader, encoding, headers.len())?
        .into_iter()
        .map(|(line, fields)| -> Result<ValueSample> {
            let path = fields.get(path_idx).ok_or(TableError::MissingField {
                line,
                column: PATH_COLUMN,
            })?;
            let value = fields
                .get(value_idx)
                .filter(|value| !value.is_empty() && !config.is_null_token(value))
                .cloned();
            Ok(ValueSample {
                path: path.clone(),
                value,
            })
        })
        .collect()
}

pub fn load_path_stats(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<PathStat>> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    read_path_stats(&mut reader, encoding)
        .with_context(|| format!("Loading path statistics {path:?}"))
}

pub fn load_value_samples(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    config: &DiscoveryConfig,
) -> Result<Vec<ValueSample>> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    read_value_samples(&mut reader, encoding, config)
        .with_context(|| format!("Loading value samples {path:?}"))
}

/// Renders a header plus rows into an in-memory delimited buffer.
pub fn render<I, R>(headers: &[&str], rows: I, delimiter: u8) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = io_utils::open_buffer_writer(delimiter);
    writer.write_record(headers).context("Writing header row")?;
    for (idx, row) in rows.into_iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Writing row {}", idx + 1))?;
    }
    io_utils::finish_buffer(writer)
}
