//! Path identity helpers: canonical form and sibling lineage.
//!
//! Paths address fields in nested strain documents using `.` between object
//! keys and a literal `[]` segment for array traversal, e.g.
//! `[].Morphology.cell morphology.[].motility`. A field that is sometimes a
//! scalar and sometimes a single-level array shows up twice in the raw path
//! statistics (`a.b` and `a.b.[]`); [`canonicalize`] folds both into `a.b`.

use std::collections::BTreeMap;

/// Marker appended to a path when the value at that location is an array.
pub const ARRAY_SUFFIX: &str = ".[]";

/// Strips trailing array markers so scalar and array variants share one identity.
pub fn canonicalize(path: &str) -> &str {
    let mut current = path;
    while let Some(stripped) = current.strip_suffix(ARRAY_SUFFIX) {
        current = stripped;
    }
    current
}

/// Parent path of `path`: everything before the final `.` segment.
///
/// Top-level paths have an empty lineage.
pub fn lineage(path: &str) -> &str {
    path.rsplit_once('.').map(|(parent, _)| parent).unwrap_or("")
}

/// Partitions canonical paths into sibling groups keyed by lineage.
///
/// Groups iterate in lexicographic lineage order. Inside a group, paths keep
/// the order in which they were first seen and repeats are dropped.
pub fn group_by_lineage<'a, I>(paths: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in paths {
        let siblings = groups.entry(lineage(path).to_string()).or_default();
        if !siblings.iter().any(|existing| existing == path) {
            siblings.push(path.to_string());
        }
    }
    groups
}
