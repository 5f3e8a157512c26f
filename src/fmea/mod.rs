//! FMEA lookup tables
//!
//! Read-only tables that turn free-text failure reasons into the numbers the
//! duration estimator works with:
//! - `vocabulary`: device reason codes to the canonical defect vocabulary
//! - `severity`: canonical reasons to a 1-10 FMEA severity and a base duration
//! - `category`: failure category and its duration multiplier
//!
//! Every lookup key is normalized first (trimmed, upper-cased, internal
//! whitespace collapsed). Unmatched text falls back to documented defaults
//! instead of failing.

mod category;
mod severity;
mod vocabulary;

pub use category::FailureCategory;
pub use severity::{base_duration_minutes, severity_for, SeverityMatch, DEFAULT_SEVERITY};
pub use vocabulary::translate_reason;

/// Normalize a reason string into a table key: uppercase, single spaces.
pub fn normalize_reason(reason: &str) -> String {
    reason.to_uppercase().split_whitespace().collect::<Vec<_>>().join(" ")
}
