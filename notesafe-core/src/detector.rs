// notesafe-core/src/detector.rs
//! The ordered-pass PII detector.
//!
//! `Detector::detect` transforms raw note text into a redacted copy plus
//! the map needed to reverse the substitution. Detection is a sequence of
//! passes, each scanning the partially redacted output of the previous
//! pass, so overlapping candidate spans are resolved purely by pass
//! order. All run state lives in a local accumulator; any number of
//! detections may execute concurrently over one `Detector`.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use regex::Captures;

use crate::config::Lexicon;
use crate::matchers::compiler::{get_or_compile_passes, CompiledPass, CompiledPasses, PassGuard};
use crate::redaction_map::{log_redaction_debug, Category, Detection, RedactionEntry};

/// Accumulates map entries for a single detector run.
///
/// The placeholder counter is global across categories and the dedupe set
/// is keyed on the exact original substring, run-wide: a value redacted by
/// any earlier pass keeps its first placeholder.
#[derive(Debug, Default)]
struct RedactionAccumulator {
    entries: Vec<RedactionEntry>,
    seen: HashMap<String, usize>,
}

impl RedactionAccumulator {
    /// Returns the placeholder for `original`, allocating a new entry on
    /// first sight.
    fn placeholder_for(&mut self, original: &str, category: Category) -> String {
        if let Some(&existing) = self.seen.get(original) {
            return self.entries[existing].placeholder.clone();
        }

        let sequence_index = self.entries.len();
        let placeholder = format!("[{}_{}]", category.label(), sequence_index + 1);
        self.seen.insert(original.to_string(), sequence_index);
        self.entries.push(RedactionEntry {
            placeholder: placeholder.clone(),
            original: original.to_string(),
            category,
            sequence_index,
        });
        placeholder
    }
}

/// Detects PII spans in free text and replaces them with placeholder
/// tokens, using the passes compiled from a `Lexicon`.
#[derive(Debug)]
pub struct Detector {
    passes: Arc<CompiledPasses>,
    lexicon: Lexicon,
}

impl Detector {
    pub fn new(lexicon: Lexicon) -> Result<Self> {
        let passes = get_or_compile_passes(&lexicon)
            .context("Failed to compile detection passes for Detector")?;

        Ok(Self { passes, lexicon })
    }

    pub fn with_default_lexicon() -> Result<Self> {
        Self::new(Lexicon::load_default()?)
    }

    /// Returns a reference to the lexicon this detector was built from.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Returns a reference to the compiled passes used by this detector.
    pub fn compiled_passes(&self) -> &CompiledPasses {
        &self.passes
    }

    /// Scans `text` with every detection pass in order and returns the
    /// redacted copy together with its redaction map.
    ///
    /// Accepts any string, including empty input, and never fails. A span
    /// replaced by an earlier pass is textually gone before later passes
    /// run, and placeholder tokens themselves match no category pattern.
    pub fn detect(&self, text: &str) -> Detection {
        let mut accumulator = RedactionAccumulator::default();
        let mut redacted = text.to_string();

        for pass in &self.passes.passes {
            redacted = self.apply_pass(pass, &redacted, &mut accumulator);
        }

        debug!("Detection produced {} map entries.", accumulator.entries.len());
        Detection {
            redacted_text: redacted,
            map: accumulator.entries,
        }
    }

    fn apply_pass(
        &self,
        pass: &CompiledPass,
        text: &str,
        accumulator: &mut RedactionAccumulator,
    ) -> String {
        pass.regex
            .replace_all(text, |caps: &Captures| {
                let matched = caps.get(0).map_or("", |m| m.as_str());
                if !self.guard_allows(pass, matched) {
                    return matched.to_string();
                }
                let placeholder = accumulator.placeholder_for(matched, pass.category);
                log_redaction_debug(pass.name, matched, &placeholder);
                placeholder
            })
            .into_owned()
    }

    fn guard_allows(&self, pass: &CompiledPass, matched: &str) -> bool {
        match pass.guard {
            PassGuard::None => true,
            PassGuard::NumericRange { min, max } => matched
                .parse::<u32>()
                .map(|n| n >= min && n <= max)
                .unwrap_or(false),
            PassGuard::ProperNoun => {
                if self.passes.common_words.contains(matched) {
                    return false;
                }
                // Single short capitalized words are usually sentence-start
                // pronouns ("He", "She"), not names.
                !(!matched.contains(' ') && matched.len() <= 3)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_output() {
        let detector = Detector::with_default_lexicon().unwrap();
        let detection = detector.detect("");
        assert_eq!(detection.redacted_text, "");
        assert!(detection.map.is_empty());
    }

    #[test]
    fn test_short_capitalized_word_is_skipped() {
        let detector = Detector::with_default_lexicon().unwrap();
        let detection = detector.detect("He was quite settled after dinner");
        assert_eq!(detection.redacted_text, "He was quite settled after dinner");
        assert!(detection.map.is_empty());
    }

    #[test]
    fn test_postcode_guard_boundaries() {
        let detector = Detector::with_default_lexicon().unwrap();

        // 200 sits below the range, so the leading-zero postcode survives.
        let below = detector.detect("unit 0200 recorded");
        assert_eq!(below.redacted_text, "unit 0200 recorded");

        let inside = detector.detect("moved to 2600 last week");
        assert_eq!(inside.redacted_text, "moved to [LOCATION_1] last week");
        assert_eq!(inside.map[0].original, "2600");
        assert_eq!(inside.map[0].category, Category::Place);
    }
}
