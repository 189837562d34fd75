use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Discover categorical enums in nested strain-record fields",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify paths and emit enum, path-to-enum, decision and merge tables
    Discover(DiscoverArgs),
    /// Join a path-counts listing with distinct value counts into one table
    MergeCounts(MergeCountsArgs),
    /// List paths whose distinct value count makes them enum candidates
    Candidates(CandidatesArgs),
    /// Summarize distinct value counts by order of magnitude
    Histogram(HistogramArgs),
}

#[derive(Debug, Args)]
pub struct DiscoverArgs {
    /// Merged statistics table with `path` and `distinct_value_count` columns
    #[arg(long = "merged-file")]
    pub merged_file: PathBuf,
    /// Value-sample table with `path` and `value` columns
    #[arg(long = "values-file")]
    pub values_file: PathBuf,
    /// Prefix for the four output tables
    #[arg(long = "output-prefix", default_value = "data/bacdive_enum_discovery")]
    pub output_prefix: String,
    /// YAML file overriding discovery thresholds
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Input delimiter character (supports 'tab', ',', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct MergeCountsArgs {
    /// Whitespace-separated listing of `<count> <path>` lines
    #[arg(long = "path-counts-file")]
    pub path_counts_file: PathBuf,
    /// Table with `path` and `distinct_value_count` columns
    #[arg(long = "distinct-values-file")]
    pub distinct_values_file: PathBuf,
    /// Destination table (`-` for stdout)
    #[arg(short, long, default_value = "data/bacdive_path_counts_merged.tsv")]
    pub output: PathBuf,
    /// Delimiter of the distinct values table
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct CandidatesArgs {
    /// Merged statistics table with `path` and `distinct_value_count` columns
    #[arg(long = "merged-file")]
    pub merged_file: PathBuf,
    /// Destination table (`-` for stdout)
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,
    /// YAML file overriding the enum value bounds
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Input delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct HistogramArgs {
    /// Merged statistics table with a `distinct_value_count` column
    #[arg(long = "merged-file")]
    pub merged_file: PathBuf,
    /// Also write the bucket counts as a table to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Input delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" | "\\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
