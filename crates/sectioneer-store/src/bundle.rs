use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::entry::{EntryKey, ExtractedEntry};

/// Merge a freshly extracted batch into a section's existing bundle.
///
/// For each incoming entry, keyed by its identity tuple:
/// - unseen key: appended as-is
/// - same key, byte-identical text: the incoming entry adopts the existing
///   `created_utc` and `stale` value, so re-running extraction on unchanged
///   content produces no diff at all
/// - same key, different text: the existing entry is kept and marked stale,
///   the incoming entry is appended as the new non-stale record
///
/// Any existing key that the incoming batch no longer reproduces is marked
/// stale in place. Entries that were already stale history (superseded
/// duplicates of a key) pass through untouched. Nothing is ever removed.
///
/// The merged bundle is re-sorted ascending by `(country, source_doc,
/// created_utc)`, with `(section, doc_url, stale)` as tie-breakers so the
/// output order is fully deterministic.
pub fn synchronize(
    existing: Vec<ExtractedEntry>,
    incoming: Vec<ExtractedEntry>,
) -> Vec<ExtractedEntry> {
    // Index the latest entry per identity key; older duplicates are audit
    // history and must survive the merge byte-for-byte.
    let mut latest: HashMap<EntryKey, ExtractedEntry> = HashMap::new();
    let mut history: Vec<ExtractedEntry> = Vec::new();
    for entry in existing {
        match latest.entry(entry.key()) {
            Entry::Occupied(mut slot) => {
                if entry.created_utc >= slot.get().created_utc {
                    history.push(slot.insert(entry));
                } else {
                    history.push(entry);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }

    let mut merged: Vec<ExtractedEntry> = Vec::new();
    for mut entry in incoming {
        match latest.remove(&entry.key()) {
            Some(prior) if prior.extracted_text == entry.extracted_text => {
                // No-op refresh: unchanged content keeps its original record.
                entry.created_utc = prior.created_utc;
                entry.stale = prior.stale;
                merged.push(entry);
            }
            Some(mut prior) => {
                prior.stale = true;
                merged.push(prior);
                merged.push(entry);
            }
            None => merged.push(entry),
        }
    }

    // Keys the latest run no longer yields are soft-deleted, never removed.
    for (_, mut entry) in latest {
        entry.stale = true;
        merged.push(entry);
    }
    merged.extend(history);

    merged.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    merged
}

fn sort_key(entry: &ExtractedEntry) -> (&str, &str, &str, &str, &str, bool) {
    (
        &entry.country,
        &entry.source_doc,
        &entry.created_utc,
        &entry.section,
        &entry.doc_url,
        entry.stale,
    )
}
