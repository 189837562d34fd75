use std::collections::{BTreeMap, HashMap};

use crate::assemble::{EnumId, EnumIdAllocator, ProvisionalEnum};

/// An enum id that changed while collapsing identical value sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMergeRecord {
    pub old: EnumId,
    pub new: EnumId,
}

#[derive(Debug, Default)]
pub struct Deduplication {
    remap: BTreeMap<EnumId, EnumId>,
    merges: Vec<EnumMergeRecord>,
    canonical: u32,
}

impl Deduplication {
    /// Canonical id for a provisional id; unknown ids map to themselves.
    pub fn resolve(&self, id: EnumId) -> EnumId {
        self.remap.get(&id).copied().unwrap_or(id)
    }

    pub fn merges(&self) -> &[EnumMergeRecord] {
        &self.merges
    }

    pub fn canonical_count(&self) -> u32 {
        self.canonical
    }
}

/// Assigns one canonical id per distinct value set.
///
/// Enums are visited in ascending id order. The first enum carrying a value set
/// claims the next canonical id (`Enum_0001` onwards); later enums with an
/// equal set are remapped onto it. Values are compared as sorted,
/// duplicate-free lists, so equality is exact and case-sensitive.
pub fn deduplicate(enums: &[ProvisionalEnum]) -> Deduplication {
    let mut ordered = enums.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|provisional| provisional.id);

    let mut ids = EnumIdAllocator::new();
    let mut by_values: HashMap<&[String], EnumId> = HashMap::new();
    let mut outcome = Deduplication::default();
    for provisional in ordered {
        let canonical = *by_values
            .entry(provisional.values.as_slice())
            .or_insert_with(|| ids.allocate());
        outcome.remap.insert(provisional.id, canonical);
        if provisional.id != canonical {
            outcome.merges.push(EnumMergeRecord {
                old: provisional.id,
                new: canonical,
            });
        }
    }
    outcome.canonical = ids.issued();
    outcome
}
