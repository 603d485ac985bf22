// notesafe-core/src/restorer.rs
//! Reverses the detector's substitution on text returned by a third
//! party.
//!
//! The rewriting service may reorder, duplicate, or drop placeholder
//! tokens; every occurrence of every known placeholder is replaced with
//! its original value, and everything else passes through untouched.
//!
//! License: MIT OR APACHE 2.0

use crate::redaction_map::RedactionEntry;

/// Substitutes every occurrence of every mapped placeholder in `text`
/// back to its original value.
///
/// Entries are applied longest placeholder first so that a placeholder
/// which is a substring of another (`[NAME_1]` vs `[NAME_10]`) cannot
/// corrupt it. Replacement is literal, not regex. Placeholders absent
/// from the map are left in the text as-is; this is not an error.
///
/// Restoration is not guaranteed idempotent when an original value
/// itself contains a placeholder-shaped token; that limitation is
/// accepted.
pub fn restore(text: &str, redaction_map: &[RedactionEntry]) -> String {
    let mut sorted_entries: Vec<&RedactionEntry> = redaction_map.iter().collect();
    // Stable sort: ties keep detection order.
    sorted_entries.sort_by(|a, b| b.placeholder.len().cmp(&a.placeholder.len()));

    let mut result = text.to_string();
    for entry in sorted_entries {
        if result.contains(&entry.placeholder) {
            result = result.replace(&entry.placeholder, &entry.original);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redaction_map::Category;

    fn entry(placeholder: &str, original: &str, sequence_index: usize) -> RedactionEntry {
        RedactionEntry {
            placeholder: placeholder.to_string(),
            original: original.to_string(),
            category: Category::Name,
            sequence_index,
        }
    }

    #[test]
    fn test_restore_replaces_all_occurrences() {
        let map = vec![entry("[NAME_1]", "Emma Watson", 0)];
        let restored = restore("[NAME_1] met [NAME_1]", &map);
        assert_eq!(restored, "Emma Watson met Emma Watson");
    }

    #[test]
    fn test_longer_placeholder_wins_over_prefix() {
        let map = vec![
            entry("[NAME_1]", "Al", 0),
            entry("[NAME_10]", "Alexandra", 9),
        ];
        let restored = restore("seen with [NAME_10] today", &map);
        assert_eq!(restored, "seen with Alexandra today");
    }

    #[test]
    fn test_unknown_placeholder_is_left_untouched() {
        let map = vec![entry("[NAME_1]", "Emma Watson", 0)];
        let restored = restore("[DATE_7] visit by [NAME_1]", &map);
        assert_eq!(restored, "[DATE_7] visit by Emma Watson");
    }

    #[test]
    fn test_empty_map_passes_text_through() {
        let restored = restore("no tokens here", &[]);
        assert_eq!(restored, "no tokens here");
    }
}
