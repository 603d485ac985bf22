// notesafe-core/src/redaction_map.rs
//! Provides the core data structures for redaction entries and categories,
//! plus PII-safe debug logging helpers used across the `notesafe-core`
//! library.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use hex;
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

/// A static boolean that is initialized once to determine if PII is allowed in debug logs.
static PII_DEBUG_ALLOWED: Lazy<bool> = Lazy::new(|| {
    std::env::var("NOTESAFE_ALLOW_DEBUG_PII")
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

/// The closed set of PII categories the detector can assign.
///
/// A category determines both which detection pass produced a match and
/// the prefix of the placeholder token standing in for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    StructuredId,
    Phone,
    Email,
    Date,
    Place,
    Name,
}

impl Category {
    /// Placeholder prefix used in emitted tokens, e.g. `[LOCATION_3]`.
    ///
    /// `Place` renders as `LOCATION` so that street addresses, gazetteer
    /// hits, and postcodes all share one token family.
    pub fn label(&self) -> &'static str {
        match self {
            Category::StructuredId => "STRUCTURED_ID",
            Category::Phone => "PHONE",
            Category::Email => "EMAIL",
            Category::Date => "DATE",
            Category::Place => "LOCATION",
            Category::Name => "NAME",
        }
    }
}

/// A single redacted span: the placeholder that replaced it, the original
/// text, its category, and its position in the detection sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionEntry {
    /// The token substituted into the text, of the form `[<CATEGORY>_<n>]`
    /// where `n` is `sequence_index + 1`.
    pub placeholder: String,
    /// The exact substring that was replaced.
    pub original: String,
    pub category: Category,
    /// Zero-based first-seen order within one detector run. Unique and
    /// monotone; shared across all categories.
    pub sequence_index: usize,
}

/// The output of one detector run: the redacted text and the ordered map
/// needed to reverse it. The map is created fresh per run and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub redacted_text: String,
    pub map: Vec<RedactionEntry>,
}

impl Detection {
    /// Per-category occurrence counts, for diagnostics. Contains no
    /// original values.
    pub fn summary(&self) -> RedactionSummary {
        let mut counts_by_category: BTreeMap<String, usize> = BTreeMap::new();
        for entry in &self.map {
            *counts_by_category
                .entry(entry.category.label().to_string())
                .or_insert(0) += 1;
        }
        RedactionSummary {
            redaction_count: self.map.len(),
            counts_by_category,
        }
    }
}

/// A PII-free summary of a detection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedactionSummary {
    pub redaction_count: usize,
    pub counts_by_category: BTreeMap<String, usize>,
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

/// Emits a debug line for a single redaction without disclosing the matched
/// value, unless `NOTESAFE_ALLOW_DEBUG_PII=true`. The value hash lets
/// operators correlate repeats of the same original across runs.
pub fn log_redaction_debug(pass_name: &str, original: &str, placeholder: &str) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    debug!(
        "Pass '{}' matched '{}' -> '{}' (value_hash={})",
        pass_name,
        get_loggable_content(original),
        placeholder,
        canonical_value_hash(pass_name, original)
    );
}

pub fn canonical_value_hash(pass_name: &str, value: &str) -> String {
    let normalized = value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(pass_name.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
