//! The `merge-counts` command.
//!
//! Path-count listings come from a schema walk over the document store and
//! hold one `<count> <path>` pair per line. Paths can contain spaces, so only
//! the first whitespace run separates the two fields.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::{info, warn};

use crate::{
    cli::MergeCountsArgs,
    io_utils,
    tables::{self, PathStat, TableError},
};

pub const PATH_COUNT_COLUMN: &str = "path_count";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCount {
    pub count: u64,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub path_count: u64,
    pub path: String,
    pub distinct_value_count: u64,
}

/// Parses a path-counts listing. Blank lines and lines without a path are skipped.
pub fn parse_path_counts(text: &str) -> Result<Vec<PathCount>, TableError> {
    let mut parsed = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        let Some((count, path)) = line.split_once(char::is_whitespace) else {
            continue;
        };
        let path = path.trim_start();
        if path.is_empty() {
            continue;
        }
        parsed.push(PathCount {
            count: tables::parse_count(count, idx + 1, PATH_COUNT_COLUMN)?,
            path: path.to_string(),
        });
    }
    Ok(parsed)
}

pub fn load_path_counts(path: &Path, encoding: &'static Encoding) -> Result<Vec<PathCount>> {
    let bytes = fs::read(path).with_context(|| format!("Reading path counts {path:?}"))?;
    let text = io_utils::decode_bytes(&bytes, encoding)
        .with_context(|| format!("Decoding path counts {path:?}"))?;
    parse_path_counts(&text)
        .map_err(anyhow::Error::from)
        .with_context(|| format!("Parsing path counts {path:?}"))
}

/// Left-joins the listing with distinct value counts, keeping listing order.
///
/// Paths absent from `distinct` get a count of 0; when `distinct` lists a
/// path twice the first row wins.
pub fn merge_counts(counts: &[PathCount], distinct: &[PathStat]) -> Vec<MergedRow> {
    let mut lookup: HashMap<&str, u64> = HashMap::new();
    for stat in distinct {
        lookup
            .entry(stat.path.as_str())
            .or_insert(stat.distinct_value_count);
    }
    counts
        .iter()
        .map(|entry| MergedRow {
            path_count: entry.count,
            path: entry.path.clone(),
            distinct_value_count: lookup.get(entry.path.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

pub fn execute(args: &MergeCountsArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.distinct_values_file, args.delimiter);

    let counts = load_path_counts(&args.path_counts_file, encoding)?;
    let distinct = tables::load_path_stats(&args.distinct_values_file, delimiter, encoding)?;
    let merged = merge_counts(&counts, &distinct);
    let known = distinct
        .iter()
        .map(|stat| stat.path.as_str())
        .collect::<HashSet<_>>();
    let unmatched = counts
        .iter()
        .filter(|entry| !known.contains(entry.path.as_str()))
        .count();
    if unmatched > 0 {
        warn!("{unmatched} path(s) have no distinct value count; recorded as 0");
    }

    let bytes = tables::render(
        &[PATH_COUNT_COLUMN, tables::PATH_COLUMN, tables::DISTINCT_COUNT_COLUMN],
        merged.iter().map(|row| {
            [
                row.path_count.to_string(),
                row.path.clone(),
                row.distinct_value_count.to_string(),
            ]
        }),
        io_utils::DEFAULT_TSV_DELIMITER,
    )?;
    io_utils::write_output(&args.output, &bytes)?;
    info!("Merged {} path(s) into {:?}", merged.len(), args.output);
    Ok(())
}
