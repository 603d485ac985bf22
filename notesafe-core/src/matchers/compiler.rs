//! compiler.rs - Manages the compilation and caching of detection passes.
//!
//! This module provides a thread-safe, cached mechanism to convert a
//! `Lexicon` into `CompiledPasses`, which are optimized for efficient
//! detection. It uses a global, shared cache to avoid redundant
//! compilation when many detectors share one lexicon.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{Lexicon, MAX_PATTERN_LENGTH};
use crate::errors::RedactError;
use crate::redaction_map::Category;

/// 10 MB limit for a compiled regex; generous enough for large gazetteers.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// How a pass decides whether a raw regex hit becomes a redaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassGuard {
    /// Every regex match is redacted.
    None,
    /// The matched digits must parse into this inclusive range.
    NumericRange { min: u32, max: u32 },
    /// Matches on the common-word list, and single words of up to three
    /// characters, are left alone.
    ProperNoun,
}

/// A single compiled detection pass.
///
/// Holds a compiled regular expression along with the category it assigns
/// and the guard applied to each raw match, ready for efficient
/// application to content.
#[derive(Debug)]
pub struct CompiledPass {
    pub name: &'static str,
    pub category: Category,
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    pub guard: PassGuard,
}

/// The ordered collection of all compiled passes for one lexicon.
///
/// Pass order is significant: each pass scans the output of the previous
/// one, so earlier passes take precedence over later ones for
/// overlapping spans.
#[derive(Debug)]
pub struct CompiledPasses {
    pub passes: Vec<CompiledPass>,
    /// Exact, case-sensitive exclusion set for the proper-noun guard.
    pub common_words: HashSet<String>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled passes.
    /// The key is a hash of the `Lexicon`.
    static ref COMPILED_PASSES_CACHE: RwLock<HashMap<u64, Arc<CompiledPasses>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the `Lexicon` to create a stable, unique key for the cache.
/// List order is semantically meaningful (pass order, alternation order),
/// so the lexicon is hashed as-is.
fn hash_lexicon(lexicon: &Lexicon) -> u64 {
    let mut hasher = DefaultHasher::new();
    lexicon.hash(&mut hasher);
    hasher.finish()
}

fn build_regex(pass_name: &'static str, pattern: &str) -> Result<Regex, RedactError> {
    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| RedactError::PatternCompilationError(pass_name.to_string(), e))
}

/// Escapes every entry and joins them into a regex alternation.
fn alternation(entries: &[String]) -> String {
    entries
        .iter()
        .map(|entry| regex::escape(entry))
        .collect::<Vec<_>>()
        .join("|")
}

/// Compiles a `Lexicon` into `CompiledPasses` for efficient detection.
/// This is the low-level function that performs the actual regex compilation.
pub fn compile_passes(lexicon: &Lexicon) -> Result<CompiledPasses, RedactError> {
    debug!(
        "Starting pass compilation ({} phone patterns, {} place names).",
        lexicon.phone_patterns.len(),
        lexicon.place_names.len()
    );

    if lexicon.postcode_min > lexicon.postcode_max {
        return Err(RedactError::InvalidLexicon(format!(
            "postcode range is inverted: min {} exceeds max {}",
            lexicon.postcode_min, lexicon.postcode_max
        )));
    }

    let mut passes = Vec::new();

    if lexicon.is_enabled(Category::StructuredId) {
        // Exactly nine digits, bounded by word boundaries.
        passes.push(CompiledPass {
            name: "structured_id",
            category: Category::StructuredId,
            regex: build_regex("structured_id", r"\b\d{9}\b")?,
            guard: PassGuard::None,
        });
    }

    if lexicon.is_enabled(Category::Phone) {
        for pattern in &lexicon.phone_patterns {
            if pattern.len() > MAX_PATTERN_LENGTH {
                return Err(RedactError::PatternLengthExceeded(
                    "phone".to_string(),
                    pattern.len(),
                    MAX_PATTERN_LENGTH,
                ));
            }
            passes.push(CompiledPass {
                name: "phone",
                category: Category::Phone,
                regex: build_regex("phone", pattern)?,
                guard: PassGuard::None,
            });
        }
    }

    if lexicon.is_enabled(Category::Email) {
        passes.push(CompiledPass {
            name: "email",
            category: Category::Email,
            regex: build_regex("email", r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?,
            guard: PassGuard::None,
        });
    }

    if lexicon.is_enabled(Category::Date) {
        // D[D]/M[M]/YY[YY] with / or - separators, or YYYY-M[M]-D[D].
        passes.push(CompiledPass {
            name: "date",
            category: Category::Date,
            regex: build_regex(
                "date",
                r"\b(?:\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}[/-]\d{1,2}[/-]\d{1,2})\b",
            )?,
            guard: PassGuard::None,
        });
    }

    if lexicon.is_enabled(Category::Place) {
        if !lexicon.street_suffixes.is_empty() {
            let pattern = format!(
                r"\b\d+\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\s+(?i:{})\b",
                alternation(&lexicon.street_suffixes)
            );
            passes.push(CompiledPass {
                name: "street_address",
                category: Category::Place,
                regex: build_regex("street_address", &pattern)?,
                guard: PassGuard::None,
            });
        }

        if !lexicon.place_names.is_empty() {
            let pattern = format!(r"(?i)\b(?:{})\b", alternation(&lexicon.place_names));
            passes.push(CompiledPass {
                name: "place_name",
                category: Category::Place,
                regex: build_regex("place_name", &pattern)?,
                guard: PassGuard::None,
            });
        }

        passes.push(CompiledPass {
            name: "postcode",
            category: Category::Place,
            regex: build_regex("postcode", r"\b\d{4}\b")?,
            guard: PassGuard::NumericRange {
                min: lexicon.postcode_min,
                max: lexicon.postcode_max,
            },
        });
    }

    if lexicon.is_enabled(Category::Name) {
        // Maximal runs of capitalized words; the guard handles exclusions.
        passes.push(CompiledPass {
            name: "proper_noun",
            category: Category::Name,
            regex: build_regex("proper_noun", r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b")?,
            guard: PassGuard::ProperNoun,
        });
    }

    debug!("Finished compiling passes. Total compiled: {}.", passes.len());
    Ok(CompiledPasses {
        passes,
        common_words: lexicon.common_words.iter().cloned().collect(),
    })
}

/// Gets a `CompiledPasses` instance from the cache or compiles it if not found.
///
/// This is the public entry point for retrieving compiled passes. It returns
/// an `Arc` to a `CompiledPasses` instance, allowing for cheap sharing.
pub fn get_or_compile_passes(lexicon: &Lexicon) -> Result<Arc<CompiledPasses>> {
    let cache_key = hash_lexicon(lexicon);

    // Attempt to acquire a read lock first.
    {
        let cache = COMPILED_PASSES_CACHE.read().unwrap();
        if let Some(passes) = cache.get(&cache_key) {
            debug!("Serving compiled passes from cache for key: {}", &cache_key);
            return Ok(Arc::clone(passes));
        }
    } // Read lock is released here.

    debug!("Compiled passes not found in cache. Compiling now.");
    let compiled = compile_passes(lexicon)?;
    let compiled_arc = Arc::new(compiled);

    COMPILED_PASSES_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled_arc));

    debug!("Successfully compiled and cached passes for key: {}", &cache_key);
    Ok(compiled_arc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_default_lexicon_pass_order() {
        let lexicon = Lexicon::load_default().unwrap();
        let compiled = compile_passes(&lexicon).unwrap();
        let names: Vec<&str> = compiled.passes.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "structured_id",
                "phone",
                "email",
                "date",
                "street_address",
                "place_name",
                "postcode",
                "proper_noun",
            ]
        );
    }

    #[test]
    fn test_invalid_phone_pattern_is_rejected() {
        let lexicon = Lexicon {
            phone_patterns: vec!["(".to_string()],
            ..Lexicon::default()
        };
        let err = compile_passes(&lexicon).unwrap_err();
        assert!(matches!(err, RedactError::PatternCompilationError(_, _)));
    }

    #[test]
    fn test_inverted_postcode_range_is_rejected() {
        let lexicon = Lexicon {
            postcode_min: 5000,
            postcode_max: 800,
            ..Lexicon::default()
        };
        let err = compile_passes(&lexicon).unwrap_err();
        assert!(matches!(err, RedactError::InvalidLexicon(_)));
    }

    #[test]
    fn test_disabled_category_omits_passes() {
        let mut lexicon = Lexicon::load_default().unwrap();
        lexicon.disable_categories(&[Category::Name, Category::Place]);
        let compiled = compile_passes(&lexicon).unwrap();
        assert!(compiled.passes.iter().all(|p| p.category != Category::Name));
        assert!(compiled.passes.iter().all(|p| p.category != Category::Place));
    }

    #[test]
    fn test_cache_returns_shared_instance() {
        let lexicon = Lexicon {
            place_names: vec!["Ngunnawal".to_string(), "Yarralumla".to_string()],
            ..Lexicon::default()
        };
        let first = get_or_compile_passes(&lexicon).unwrap();
        let second = get_or_compile_passes(&lexicon).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
