//! The `candidates` command: paths worth sampling values for.

use anyhow::Result;
use log::info;

use crate::{
    cli::CandidatesArgs,
    config::DiscoveryConfig,
    io_utils,
    tables::{self, PathStat},
};

/// Raw paths whose distinct value count lies within the enum bounds, in input order.
pub fn select_candidates<'a>(stats: &'a [PathStat], config: &DiscoveryConfig) -> Vec<&'a PathStat> {
    let bounds = config.min_enum_values..=config.max_enum_values;
    stats
        .iter()
        .filter(|stat| bounds.contains(&stat.distinct_value_count))
        .collect()
}

pub fn execute(args: &CandidatesArgs) -> Result<()> {
    let config = DiscoveryConfig::load_or_default(args.config.as_deref())?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.merged_file, args.delimiter);

    let stats = tables::load_path_stats(&args.merged_file, delimiter, encoding)?;
    let selected = select_candidates(&stats, &config);
    info!(
        "Selected {} of {} path(s) with {}-{} distinct values",
        selected.len(),
        stats.len(),
        config.min_enum_values,
        config.max_enum_values
    );

    let bytes = tables::render(
        &[tables::PATH_COLUMN, tables::DISTINCT_COUNT_COLUMN],
        selected
            .iter()
            .map(|stat| [stat.path.clone(), stat.distinct_value_count.to_string()]),
        io_utils::DEFAULT_TSV_DELIMITER,
    )?;
    io_utils::write_output(&args.output, &bytes)
}
