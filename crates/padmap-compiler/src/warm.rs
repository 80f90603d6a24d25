//! Warm action set: the labels pre-seeded into every action pool.
//!
//! The most frequent labels are interned first so their indices stay below
//! `0x80` and encode as a single varint byte.

use indexmap::{IndexMap, IndexSet};

use crate::normalize::MappingSet;

/// Pool bytes the warm set may start labels in.
pub const WARM_BUDGET: usize = 0x7F;

/// Label frequencies across distinct mapping sets.
///
/// Each labelled record of a set is counted once, and sets that are
/// byte-identical to an earlier one are skipped.
pub fn label_counts<'a>(sets: impl IntoIterator<Item = &'a MappingSet>) -> IndexMap<String, usize> {
    let mut seen = IndexSet::new();
    let mut counts = IndexMap::new();
    for set in sets {
        if !seen.insert(set.key()) {
            continue;
        }
        for label in set.records().iter().filter_map(|r| r.display_label()) {
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    counts
}

/// Pick the warm set from label counts.
///
/// Labels are ranked by descending count, ties in first-seen order, and taken
/// while fewer than [`WARM_BUDGET`] pool bytes are used. The label that
/// crosses the budget is kept, as it still starts below it.
pub fn select(counts: &IndexMap<String, usize>) -> Vec<String> {
    let mut ranked: Vec<(&String, usize)> = counts.iter().map(|(label, &n)| (label, n)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut used = 0;
    let mut warm = Vec::new();
    for (label, _) in ranked {
        if used >= WARM_BUDGET {
            break;
        }
        used += label.len() + 1;
        warm.push(label.clone());
    }
    warm
}

/// Warm set derived from a catalogue's mapping sets.
pub fn compute_warm_set<'a>(sets: impl IntoIterator<Item = &'a MappingSet>) -> Vec<String> {
    select(&label_counts(sets))
}
