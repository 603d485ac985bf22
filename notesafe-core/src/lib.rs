// notesafe-core/src/lib.rs
//! # Notesafe Core Library
//!
//! `notesafe-core` provides reversible privacy redaction for free-text
//! clinical notes. It detects personally identifiable information with an
//! ordered sequence of lexical passes, replaces each detected span with a
//! placeholder token, hands the redacted text to an external rewriting
//! service, and losslessly restores the original values afterwards.
//!
//! The library is designed to be pure and stateless: each detection run
//! allocates its own redaction map, no state is shared between runs, and
//! the engine performs no network I/O of its own — the rewrite step is a
//! caller-supplied collaborator behind the [`Rewriter`] trait.
//!
//! ## Modules
//!
//! * `config`: Defines the `Lexicon` — injectable locale tables (phone
//!   patterns, street suffixes, place-name gazetteer, common-word
//!   exclusions, postcode range) — with YAML loading, merging, and
//!   validation.
//! * `matchers`: Compiles a `Lexicon` into ordered, cached detection
//!   passes.
//! * `detector`: Runs the passes and produces redacted text plus a
//!   redaction map.
//! * `restorer`: Substitutes placeholders in rewritten text back to their
//!   original values.
//! * `orchestrator`: The safe-rephrase pipeline and the `Rewriter` seam to
//!   the external rewriting service.
//! * `redaction_map`: Categories, map entry types, and PII-safe logging
//!   helpers.
//! * `errors`: The `RedactError` type for configuration and compilation
//!   failures.
//!
//! ## Public API
//!
//! **Configuration & Lexicons**
//!
//! * [`Lexicon`]: The locale tables driving detection, including loading
//!   from YAML and the embedded defaults.
//! * [`merge_lexicons`]: Merges a user lexicon over the defaults.
//!
//! **Detection & Restoration**
//!
//! * [`Detector`]: Detects PII and produces `(redacted_text, map)`.
//! * [`restore`]: Replaces placeholders in third-party output with their
//!   original values.
//!
//! **Safe-Rephrase Pipeline**
//!
//! * [`Rewriter`] / [`FnRewriter`]: The asynchronous seam to the external
//!   rewriting service.
//! * [`Detector::rewrite_with_redaction`]: detect → rewrite → restore.
//! * [`safe_rephrase`]: One-shot pipeline over the default lexicon.
//!
//! ## Usage Example
//!
//! ```rust
//! use notesafe_core::{restore, Detector};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let detector = Detector::with_default_lexicon()?;
//!
//!     let note = "Client can be reached at 0412345678 or john.smith@email.com.";
//!     let detection = detector.detect(note);
//!     assert!(!detection.redacted_text.contains("0412345678"));
//!     assert!(!detection.redacted_text.contains("john.smith@email.com"));
//!
//!     // An identity rewrite round-trips exactly.
//!     let restored = restore(&detection.redacted_text, &detection.map);
//!     assert_eq!(restored, note);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Detection and restoration accept any string and never fail. Building a
//! detector from a bad lexicon surfaces a [`RedactError`]; a failing
//! rewrite callback is propagated unchanged to the pipeline's caller,
//! never swallowed or logged on its behalf.
//!
//! ## Design Principles
//!
//! * **Deterministic:** The same input and lexicon always produce the
//!   same redacted text and map. Heuristic passes make no statistical
//!   guarantees, only reproducible ones.
//! * **Stateless:** Redaction maps live for one run and are never
//!   persisted.
//! * **Swappable lexicons:** Locale tables are data, injected at
//!   construction time, so the algorithm never changes for a new locale.
//! * **Collaborator seam:** The rewrite step is a trait object; any
//!   function from redacted text to rewritten text can be supplied,
//!   including synchronous-wrapped mocks in tests.
//!
//! ---
//! License: MIT OR Apache-2.0

// All modules must be declared before they can be used.
pub mod config;
pub mod detector;
pub mod errors;
pub mod matchers;
pub mod orchestrator;
pub mod redaction_map;
pub mod restorer;

/// Re-exports the public configuration types and functions for managing lexicons.
pub use config::{
    merge_lexicons, Lexicon, DEFAULT_POSTCODE_MAX, DEFAULT_POSTCODE_MIN, MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::RedactError;

/// Re-exports the detector.
pub use detector::Detector;

/// Re-exports types for redaction entries, categories, and sensitive-data reporting.
pub use redaction_map::{
    canonical_value_hash, redact_sensitive, Category, Detection, RedactionEntry, RedactionSummary,
};

/// Re-exports the restoration entry point.
pub use restorer::restore;

/// Re-exports the safe-rephrase pipeline seam and convenience wrapper.
pub use orchestrator::{safe_rephrase, FnRewriter, Rewriter};

// Re-export key types from the matchers::compiler module for advanced usage.
pub use matchers::compiler::{
    compile_passes, get_or_compile_passes, CompiledPass, CompiledPasses, PassGuard,
};
