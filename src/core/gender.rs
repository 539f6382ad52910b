//! Gender labels as stored in the name cache and reported per author.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A confident gender label for a normalized name.
///
/// Unresolved names are represented as `Option::<Gender>::None` rather than a
/// third variant, so the cache can never hold an unresolved entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    /// Map a remote service label onto a cache label.
    ///
    /// Only `"female"` maps to [`Gender::Female`]; every other label maps to
    /// [`Gender::Male`].
    pub fn from_service_label(label: &str) -> Self {
        if label == "female" {
            Gender::Female
        } else {
            Gender::Male
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label used in reports for a possibly unresolved gender.
pub const UNRESOLVED_LABEL: &str = "None";

/// Report form of a gender label: `"M"`, `"F"` or `"None"`.
pub fn label(gender: Option<Gender>) -> &'static str {
    gender.map_or(UNRESOLVED_LABEL, Gender::as_str)
}
