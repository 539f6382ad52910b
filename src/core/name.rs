//! Author name normalization.
//!
//! A normalized name is the identity key used for gender resolution. Two
//! different people whose names normalize to the same string share a cache
//! entry; no attempt is made to tell them apart.

use std::sync::LazyLock;

use regex::Regex;

/// A single word character followed by a period, e.g. `J.` in `Doe, J. K.`.
static INITIAL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\.").unwrap());

/// Normalize a raw author name into its lookup key.
///
/// Initials are removed, the last non-empty comma-separated token is kept,
/// and the result is lowercased with whitespace collapsed.
///
/// # Examples
///
/// ```
/// use bibbias::core::normalize_name;
///
/// assert_eq!(normalize_name("Doe, J."), "doe");
/// assert_eq!(normalize_name("Doe, Jane K."), "jane");
/// assert_eq!(normalize_name("  Lee, C.  "), "lee");
/// assert_eq!(normalize_name("jane"), "jane");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let without_initials = INITIAL_REGEX.replace_all(raw, " ");

    let token = without_initials
        .split(',')
        .map(str::trim)
        .rfind(|token| !token.is_empty())
        .unwrap_or("");

    token
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
