//! Eviction Policy Module
//!
//! Picks the entry to drop when the store is full.
//!
//! The policy is least-hit, not least-recently-used: the victim is the entry
//! with the lowest `hit_count`. Ties go to whichever candidate `HashMap`
//! iteration yields first, which is arbitrary and may differ between runs.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Select Victim ==
/// Returns the key of the entry with the fewest hits, or None if empty.
///
/// Linear in the number of entries.
pub fn select_victim(entries: &HashMap<String, CacheEntry>) -> Option<String> {
    entries
        .iter()
        .min_by_key(|(_, entry)| entry.hit_count)
        .map(|(key, _)| key.clone())
}
