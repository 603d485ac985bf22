//! Lexicon configuration management for `notesafe-core`.
//!
//! This module defines the `Lexicon`, the injectable locale tables the
//! detector is built from: the phone pattern set, street suffixes, the
//! place-name gazetteer, the common-word exclusion list, and the postcode
//! range. It handles serialization/deserialization of YAML lexicons and
//! provides utilities for loading, merging, and validating them, so a
//! locale swap never touches the detection algorithm.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::redaction_map::Category;

/// Maximum allowed length for a phone regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Default inclusive postcode range. Chosen to reject small quantities
/// while accepting every deliverable postcode; 4-digit years inside the
/// range are a documented false positive.
pub const DEFAULT_POSTCODE_MIN: u32 = 800;
pub const DEFAULT_POSTCODE_MAX: u32 = 9999;

/// The locale tables that drive the detection passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Regex patterns for the phone pass, applied in order.
    pub phone_patterns: Vec<String>,
    /// Street suffixes accepted by the address pass. The suffix match is
    /// case-insensitive; the preceding street-name words must be
    /// capitalized.
    pub street_suffixes: Vec<String>,
    /// Gazetteer of known place names, matched case-insensitively.
    pub place_names: Vec<String>,
    /// Capitalized words (exact, case-sensitive) the proper-noun pass
    /// must never redact.
    pub common_words: Vec<String>,
    /// A bare 4-digit number is treated as a postcode only when it parses
    /// into `postcode_min..=postcode_max`.
    pub postcode_min: u32,
    pub postcode_max: u32,
    /// Categories whose detection passes are skipped entirely.
    pub disabled_categories: Vec<Category>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            phone_patterns: Vec::new(),
            street_suffixes: Vec::new(),
            place_names: Vec::new(),
            common_words: Vec::new(),
            postcode_min: DEFAULT_POSTCODE_MIN,
            postcode_max: DEFAULT_POSTCODE_MAX,
            disabled_categories: Vec::new(),
        }
    }
}

impl Lexicon {
    /// Loads a lexicon from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom lexicon from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
        let lexicon: Lexicon = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse lexicon file {}", path.display()))?;

        validate_lexicon(&lexicon)?;
        info!(
            "Loaded lexicon from file {} ({} place names, {} common words).",
            path.display(),
            lexicon.place_names.len(),
            lexicon.common_words.len()
        );

        Ok(lexicon)
    }

    /// Loads the default (Australian) lexicon from the embedded configuration.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default lexicon from embedded string...");
        let default_yaml = include_str!("../config/default_lexicon.yaml");
        let lexicon: Lexicon =
            serde_yml::from_str(default_yaml).context("Failed to parse default lexicon")?;

        validate_lexicon(&lexicon)?;
        debug!(
            "Loaded default lexicon ({} common words).",
            lexicon.common_words.len()
        );
        Ok(lexicon)
    }

    /// Disables the detection passes for the given categories.
    ///
    /// This is the tuning knob for over-aggressive heuristics; disabling
    /// `Category::Name` turns off generic proper-noun redaction without
    /// touching the structured passes.
    pub fn disable_categories(&mut self, disable: &[Category]) {
        for category in disable {
            if self.disabled_categories.contains(category) {
                warn!("Category '{}' is already disabled.", category.label());
            } else {
                debug!("Disabling detection pass(es) for category '{}'.", category.label());
                self.disabled_categories.push(*category);
            }
        }
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        !self.disabled_categories.contains(&category)
    }
}

/// Merges a user-supplied lexicon over the defaults.
///
/// A non-empty user list replaces the corresponding default list
/// wholesale; empty or omitted lists keep the defaults. The postcode
/// range is always taken from the user lexicon (whose own defaults match
/// the embedded ones).
pub fn merge_lexicons(default_lexicon: Lexicon, user_lexicon: Option<Lexicon>) -> Lexicon {
    debug!(
        "merge_lexicons called. Default place name count: {}",
        default_lexicon.place_names.len()
    );

    let mut merged = default_lexicon;

    if let Some(user) = user_lexicon {
        if !user.phone_patterns.is_empty() {
            debug!("Overriding phone patterns with {} user patterns.", user.phone_patterns.len());
            merged.phone_patterns = user.phone_patterns;
        }
        if !user.street_suffixes.is_empty() {
            debug!("Overriding street suffixes with {} user entries.", user.street_suffixes.len());
            merged.street_suffixes = user.street_suffixes;
        }
        if !user.place_names.is_empty() {
            debug!("Overriding place names with {} user entries.", user.place_names.len());
            merged.place_names = user.place_names;
        }
        if !user.common_words.is_empty() {
            debug!("Overriding common words with {} user entries.", user.common_words.len());
            merged.common_words = user.common_words;
        }
        merged.postcode_min = user.postcode_min;
        merged.postcode_max = user.postcode_max;
        if !user.disabled_categories.is_empty() {
            merged.disabled_categories = user.disabled_categories;
        }
    }

    merged
}

/// Validates lexicon integrity (regex compilation, ranges, duplicates).
fn validate_lexicon(lexicon: &Lexicon) -> Result<()> {
    let mut errors = Vec::new();

    for (i, pattern) in lexicon.phone_patterns.iter().enumerate() {
        if pattern.is_empty() {
            errors.push(format!("Phone pattern #{} is empty.", i + 1));
            continue;
        }
        if pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Phone pattern #{} length ({}) exceeds maximum allowed ({}).",
                i + 1,
                pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }
        if let Err(e) = Regex::new(pattern) {
            errors.push(format!("Phone pattern #{} is not a valid regex: {}", i + 1, e));
        }
    }

    if lexicon.postcode_min > lexicon.postcode_max {
        errors.push(format!(
            "Postcode range is inverted: min {} exceeds max {}.",
            lexicon.postcode_min, lexicon.postcode_max
        ));
    }

    let word_lists: [(&str, &Vec<String>); 3] = [
        ("street_suffixes", &lexicon.street_suffixes),
        ("place_names", &lexicon.place_names),
        ("common_words", &lexicon.common_words),
    ];
    for (list_name, entries) in word_lists {
        let mut seen = HashSet::new();
        for entry in entries {
            if entry.trim().is_empty() {
                errors.push(format!("`{}` contains an empty entry.", list_name));
            } else if !seen.insert(entry.as_str()) {
                errors.push(format!("Duplicate `{}` entry: '{}'.", list_name, entry));
            }
        }
    }

    if !errors.is_empty() {
        let full_error_message = format!("Lexicon validation failed:\n{}", errors.join("\n"));
        Err(anyhow!(full_error_message))
    } else {
        Ok(())
    }
}
