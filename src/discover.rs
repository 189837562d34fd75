//! The `discover` command: enum discovery over merged path statistics and
//! sampled values.
//!
//! [`run_discovery`] is the whole algorithm with no I/O. Given the same inputs
//! it produces the same ids, value sets and merge records, because enum ids
//! are handed out while walking lineages in sorted order and siblings in the
//! order the statistics table first lists them.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info};

use crate::{
    assemble::{self, Candidate, DecisionRecord, EnumId, EnumIdAllocator, ProvisionalEnum},
    cli::DiscoverArgs,
    config::DiscoveryConfig,
    dedup::{self, EnumMergeRecord},
    io_utils,
    path::{self, canonicalize},
    tables::{self, PathStat, ValueSample},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValueRow {
    pub enum_id: EnumId,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathEnumRow {
    pub path: String,
    pub enum_id: EnumId,
}

/// Final tables of one discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveryOutcome {
    pub enum_values: Vec<EnumValueRow>,
    pub path_to_enum: Vec<PathEnumRow>,
    pub decisions: Vec<DecisionRecord>,
    pub merges: Vec<EnumMergeRecord>,
    pub provisional_count: u32,
    pub canonical_count: u32,
}

/// Runs canonicalization, lineage grouping, per-group assembly and
/// deduplication over already-loaded inputs.
pub fn run_discovery(
    stats: &[PathStat],
    samples: &[ValueSample],
    config: &DiscoveryConfig,
) -> DiscoveryOutcome {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for stat in stats {
        let count = counts.entry(canonicalize(&stat.path)).or_insert(0);
        *count = (*count).max(stat.distinct_value_count);
    }

    let mut values_by_path: HashMap<&str, Vec<Option<String>>> = HashMap::new();
    for sample in samples {
        values_by_path
            .entry(canonicalize(&sample.path))
            .or_default()
            .push(sample.value.clone());
    }

    let groups = path::group_by_lineage(stats.iter().map(|stat| canonicalize(&stat.path)));
    debug!("Grouped {} canonical path(s) into {} lineage(s)", counts.len(), groups.len());

    let mut ids = EnumIdAllocator::new();
    let mut decisions = Vec::new();
    let mut provisional: Vec<ProvisionalEnum> = Vec::new();
    for (lineage, siblings) in &groups {
        let candidates = siblings
            .iter()
            .map(|sibling| Candidate {
                path: sibling,
                distinct_value_count: counts.get(sibling.as_str()).copied().unwrap_or(0),
                samples: values_by_path
                    .get(sibling.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
            })
            .collect::<Vec<_>>();
        if let Some(created) =
            assemble::assemble_group(lineage, &candidates, config, &mut ids, &mut decisions)
        {
            provisional.push(created);
        }
    }

    let dedup = dedup::deduplicate(&provisional);
    let enum_values = provisional
        .iter()
        .flat_map(|created| {
            let enum_id = dedup.resolve(created.id);
            created.values.iter().map(move |value| EnumValueRow {
                enum_id,
                value: value.clone(),
            })
        })
        .unique()
        .collect::<Vec<_>>();
    let path_to_enum = provisional
        .iter()
        .flat_map(|created| {
            let enum_id = dedup.resolve(created.id);
            created.paths.iter().map(move |path| PathEnumRow {
                path: path.clone(),
                enum_id,
            })
        })
        .unique()
        .collect::<Vec<_>>();

    DiscoveryOutcome {
        enum_values,
        path_to_enum,
        decisions,
        merges: dedup.merges().to_vec(),
        provisional_count: ids.issued(),
        canonical_count: dedup.canonical_count(),
    }
}

/// Destination files derived from an output prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub enum_values: PathBuf,
    pub path_to_enum: PathBuf,
    pub decision_log: PathBuf,
    pub merge_log: PathBuf,
}

impl OutputPaths {
    pub fn from_prefix(prefix: &str) -> Self {
        let with_suffix = |suffix: &str| PathBuf::from(format!("{prefix}_{suffix}.tsv"));
        Self {
            enum_values: with_suffix("enum_value_pairs"),
            path_to_enum: with_suffix("path_to_enum"),
            decision_log: with_suffix("decision_log"),
            merge_log: with_suffix("enum_merge_log"),
        }
    }

    fn all(&self) -> [&Path; 4] {
        [
            self.enum_values.as_path(),
            self.path_to_enum.as_path(),
            self.decision_log.as_path(),
            self.merge_log.as_path(),
        ]
    }
}

impl DiscoveryOutcome {
    /// Renders the four output tables, in [`OutputPaths`] field order.
    pub fn render(&self, delimiter: u8) -> Result<[Vec<u8>; 4]> {
        let enum_values = tables::render(
            &["enum", "value"],
            self.enum_values
                .iter()
                .map(|row| [row.enum_id.to_string(), row.value.clone()]),
            delimiter,
        )
        .context("Rendering enum-value table")?;
        let path_to_enum = tables::render(
            &["path", "enum"],
            self.path_to_enum
                .iter()
                .map(|row| [row.path.clone(), row.enum_id.to_string()]),
            delimiter,
        )
        .context("Rendering path-to-enum table")?;
        let decision_log = tables::render(
            &["path", "decision", "reason", "lineage"],
            self.decisions.iter().map(|record| {
                [
                    record.path.as_str(),
                    record.decision.label(),
                    record.decision.reason(),
                    record.lineage.as_str(),
                ]
            }),
            delimiter,
        )
        .context("Rendering decision log")?;
        let merge_log = tables::render(
            &["old_enum", "new_enum"],
            self.merges
                .iter()
                .map(|merge| [merge.old.to_string(), merge.new.to_string()]),
            delimiter,
        )
        .context("Rendering merge log")?;
        Ok([enum_values, path_to_enum, decision_log, merge_log])
    }
}

pub fn execute(args: &DiscoverArgs) -> Result<()> {
    let config = DiscoveryConfig::load_or_default(args.config.as_deref())?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let stats_delimiter = io_utils::resolve_input_delimiter(&args.merged_file, args.delimiter);
    let values_delimiter = io_utils::resolve_input_delimiter(&args.values_file, args.delimiter);

    info!(
        "Loading path statistics from {:?} with delimiter '{}'",
        args.merged_file,
        io_utils::printable_delimiter(stats_delimiter)
    );
    let stats = tables::load_path_stats(&args.merged_file, stats_delimiter, encoding)?;
    let samples =
        tables::load_value_samples(&args.values_file, values_delimiter, encoding, &config)?;
    let sampled_paths = samples
        .iter()
        .map(|sample| canonicalize(&sample.path))
        .collect::<HashSet<_>>();
    info!(
        "Loaded {} statistic row(s) and {} value sample(s) across {} path(s)",
        stats.len(),
        samples.len(),
        sampled_paths.len()
    );

    let outcome = run_discovery(&stats, &samples, &config);
    info!(
        "Created {} provisional enum(s) from {} decision(s)",
        outcome.provisional_count,
        outcome.decisions.len()
    );
    if outcome.merges.is_empty() {
        info!("No duplicate enums found");
    } else {
        info!(
            "Deduplicated {} enum(s) into {} canonical id(s)",
            outcome.merges.len(),
            outcome.canonical_count
        );
    }

    let outputs = OutputPaths::from_prefix(&args.output_prefix);
    let rendered = outcome.render(io_utils::DEFAULT_TSV_DELIMITER)?;
    for (path, bytes) in outputs.all().into_iter().zip(rendered.iter()) {
        io_utils::write_output(path, bytes)?;
        info!("Wrote {:?}", path);
    }
    Ok(())
}
