//! The `histogram` command: how many paths fall into each order of magnitude
//! of distinct value count.

use anyhow::Result;
use log::info;

use crate::{
    cli::HistogramArgs,
    io_utils,
    table::{self, Align},
    tables::{self, PathStat},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// `0`, `1-9`, `10-99`, ...
    pub label: String,
    pub paths: usize,
}

/// Bucket index: 0 holds zero counts, `d + 1` holds counts in `[10^d, 10^(d+1))`.
fn bucket_index(count: u64) -> usize {
    if count == 0 { 0 } else { count.ilog10() as usize + 1 }
}

fn bucket_label(index: usize) -> String {
    if index == 0 {
        return "0".to_string();
    }
    let exponent = (index - 1) as u32;
    let low = 10u64.pow(exponent);
    match 10u64.checked_pow(exponent + 1) {
        Some(high) => format!("{low}-{}", high - 1),
        None => format!("{low}+"),
    }
}

/// Counts paths per decade, including empty decades up to the largest count.
pub fn build_histogram(stats: &[PathStat]) -> Vec<Bucket> {
    let Some(top) = stats
        .iter()
        .map(|stat| bucket_index(stat.distinct_value_count))
        .max()
    else {
        return Vec::new();
    };
    let mut counts = vec![0usize; top + 1];
    for stat in stats {
        counts[bucket_index(stat.distinct_value_count)] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(index, paths)| Bucket {
            label: bucket_label(index),
            paths,
        })
        .collect()
}

pub fn execute(args: &HistogramArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.merged_file, args.delimiter);
    let stats = tables::load_path_stats(&args.merged_file, delimiter, encoding)?;
    let buckets = build_histogram(&stats);
    let total = stats.len().max(1) as f64;

    let rows = buckets
        .iter()
        .map(|bucket| {
            vec![
                bucket.label.clone(),
                bucket.paths.to_string(),
                format!("{:.2}%", bucket.paths as f64 / total * 100.0),
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["distinct_values", "paths", "percent"];
    table::print_table(&headers, &rows, &[Align::Left, Align::Right, Align::Right]);

    if let Some(output) = &args.output {
        let bytes = tables::render(&headers, &rows, io_utils::DEFAULT_TSV_DELIMITER)?;
        io_utils::write_output(output, &bytes)?;
        info!("Histogram written to {:?}", output);
    }
    info!("Bucketed {} path(s) into {} decade(s)", stats.len(), buckets.len());
    Ok(())
}
