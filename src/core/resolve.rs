//! Cache-only name resolution.

use std::collections::{BTreeMap, BTreeSet};

use super::{cache::NameMap, gender::Gender};

/// Names split into those found in the cache and those that were not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub resolved: BTreeMap<String, Gender>,
    pub missed: BTreeSet<String>,
}

impl Resolution {
    /// Gender for `name`, or `None` if it was missed.
    pub fn gender(&self, name: &str) -> Option<Gender> {
        self.resolved.get(name).copied()
    }
}

/// Look up every name in `cache`.
///
/// A name absent from `resolved` is unresolved and appears in `missed`.
pub fn resolve(names: &BTreeSet<String>, cache: &NameMap) -> Resolution {
    let mut resolution = Resolution::default();

    for name in names {
        match cache.get(name) {
            Some(gender) => {
                resolution.resolved.insert(name.clone(), *gender);
            }
            None => {
                resolution.missed.insert(name.clone());
            }
        }
    }

    resolution
}
