//! Detection pass compilation for Notesafe.
//!
//! This module is responsible for turning a `Lexicon` into the ordered
//! list of compiled detection passes the detector runs. Each pass pairs a
//! regular expression with a category and an optional guard (the postcode
//! range check, the common-word exclusion) so that lexical tables stay
//! data and the matching machinery stays code.
//!
//! This module works closely with `config` (for the lexicon definition)
//! and `redaction_map` (for categories and result types).

pub mod compiler;
