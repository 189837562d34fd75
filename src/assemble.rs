//! Turns one sibling group into at most one provisional enum.
//!
//! Every path that reaches classification leaves a trace in the decision log,
//! whether it ends up in an enum or not.

use std::{collections::BTreeSet, fmt};

use log::debug;

use crate::{
    classify::{Classification, classify},
    config::DiscoveryConfig,
};

/// Sequential enum identifier rendered as `Enum_0001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnumId(pub u32);

impl fmt::Display for EnumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Enum_{:04}", self.0)
    }
}

/// Hands out enum ids in creation order, starting at `Enum_0001`.
#[derive(Debug)]
pub struct EnumIdAllocator {
    next: u32,
}

impl EnumIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> EnumId {
        let id = EnumId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for EnumIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    NumericDominated,
    LongText,
    NoData,
    /// Dropped by the oversized-group rule.
    TooManyValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Exclude(ExclusionReason),
    Include,
    IncludeOverride,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Exclude(_) => "exclude",
            Decision::Include => "include",
            Decision::IncludeOverride => "include_override",
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Decision::Exclude(ExclusionReason::NumericDominated) => "numeric-dominated",
            Decision::Exclude(ExclusionReason::LongText) => "long-text-non-biological",
            Decision::Exclude(ExclusionReason::NoData) => "no-data",
            Decision::Exclude(ExclusionReason::TooManyValues) => "too-many-values",
            Decision::Include => "categorical",
            Decision::IncludeOverride => "lineage-override",
        }
    }
}

/// One row of the decision log. Override rows carry the lineage as their path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRecord {
    pub path: String,
    pub decision: Decision,
    pub lineage: String,
}

/// A sibling path offered to the assembler.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub path: &'a str,
    pub distinct_value_count: u64,
    pub samples: &'a [Option<String>],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionalEnum {
    pub id: EnumId,
    pub paths: Vec<String>,
    /// Sorted, duplicate-free union of the member paths' values.
    pub values: Vec<String>,
}

/// Classifies the siblings under `lineage` and builds their joint enum.
///
/// Returns `None` when no sibling survives classification and the
/// oversized-group rule; no id is consumed in that case.
pub fn assemble_group(
    lineage: &str,
    siblings: &[Candidate<'_>],
    config: &DiscoveryConfig,
    ids: &mut EnumIdAllocator,
    log: &mut Vec<DecisionRecord>,
) -> Option<ProvisionalEnum> {
    let mut record = |path: &str, decision: Decision| {
        log.push(DecisionRecord {
            path: path.to_string(),
            decision,
            lineage: lineage.to_string(),
        });
    };

    let mut included: Vec<(&Candidate<'_>, usize)> = Vec::new();
    for candidate in siblings
        .iter()
        .filter(|c| c.distinct_value_count >= config.min_enum_values)
    {
        let excluded = match classify(candidate.samples, config) {
            Classification::Categorical { distinct } => {
                included.push((candidate, distinct));
                continue;
            }
            Classification::Empty => ExclusionReason::NoData,
            Classification::NumericDominated => ExclusionReason::NumericDominated,
            Classification::LongText => ExclusionReason::LongText,
        };
        debug!("Excluding '{}': {:?}", candidate.path, excluded);
        record(candidate.path, Decision::Exclude(excluded));
    }
    if included.is_empty() {
        return None;
    }

    let max = config.max_enum_values;
    if included.iter().any(|(_, distinct)| (*distinct as u64) > max) {
        let within_limit = included
            .iter()
            .filter(|(_, distinct)| (*distinct as u64) <= max)
            .count();
        if within_limit * 2 > included.len() {
            debug!(
                "Lineage '{}' keeps oversized siblings ({} of {} within limit)",
                lineage,
                within_limit,
                included.len()
            );
            record(lineage, Decision::IncludeOverride);
        } else {
            included.retain(|(candidate, distinct)| {
                let keep = (*distinct as u64) <= max;
                if !keep {
                    record(
                        candidate.path,
                        Decision::Exclude(ExclusionReason::TooManyValues),
                    );
                }
                keep
            });
        }
    }
    if included.is_empty() {
        debug!("Lineage '{}' lost every sibling to the value limit", lineage);
        return None;
    }

    let id = ids.allocate();
    let values = included
        .iter()
        .flat_map(|(candidate, _)| candidate.samples.iter().flatten())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    let paths = included
        .iter()
        .map(|(candidate, _)| candidate.path.to_string())
        .collect::<Vec<_>>();
    for path in &paths {
        record(path, Decision::Include);
    }
    debug!(
        "{} created for lineage '{}' with {} path(s) and {} value(s)",
        id,
        lineage,
        paths.len(),
        values.len()
    );
    Some(ProvisionalEnum { id, paths, values })
}
