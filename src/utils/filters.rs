//! Input row filtering utilities

use crate::config::RepositoryEntry;

/// Keep entries whose country matches one of `groups` (case-insensitive)
///
/// An empty filter keeps everything.
pub fn filter_by_groups(entries: &[RepositoryEntry], groups: &[String]) -> Vec<RepositoryEntry> {
    if groups.is_empty() {
        return entries.to_vec();
    }

    entries
        .iter()
        .filter(|entry| {
            groups
                .iter()
                .any(|group| group.trim().eq_ignore_ascii_case(entry.country.trim()))
        })
        .cloned()
        .collect()
}
