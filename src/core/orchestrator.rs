//! Two-pass gender resolution for bibliography records.
//!
//! Pass one resolves every author against the stored cache. Names it misses
//! are sent to the remote lookup, confident answers are written back to the
//! cache, and a second and final pass resolves against the enriched cache.
//! Anything still missing stays unresolved for the rest of the run.

use std::collections::BTreeSet;

use anyhow::Result;
use tracing::{debug, warn};

use super::{
    cache::{NameCache, NameMap},
    extract::BibRecord,
    gender::Gender,
    lookup::GenderLookup,
    resolve::{Resolution, resolve},
};

/// Minimum accuracy a remote answer needs before it is cached.
pub const DEFAULT_CONFIDENCE_THRESHOLD: u8 = 60;

/// Counters for one remote lookup batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupSummary {
    /// Names that were missing from the cache when the batch started.
    pub pending: usize,
    pub queried: usize,
    pub accepted: usize,
    pub low_confidence: usize,
    pub failed: usize,
    /// No credential was configured, so nothing was queried.
    pub skipped_no_credential: bool,
}

impl LookupSummary {
    /// Names that left the batch without a cache entry.
    pub fn unmapped(&self) -> usize {
        self.pending - self.accepted
    }
}

#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub cache: NameMap,
    pub summary: LookupSummary,
}

/// Query the remote service for names absent from `cache` and store the
/// confident answers.
///
/// Without a `lookup` (no credential) the cache is returned unchanged and
/// nothing is written. Names are queried one at a time in sorted order; a
/// failed lookup leaves that name unresolved and the batch continues.
pub fn query_and_cache(
    missing: &BTreeSet<String>,
    mut cache: NameMap,
    lookup: Option<&dyn GenderLookup>,
    store: &dyn NameCache,
    confidence_threshold: u8,
) -> Result<QueryOutcome> {
    let pending: Vec<&String> = missing
        .iter()
        .filter(|name| !cache.contains_key(name.as_str()))
        .collect();

    let mut summary = LookupSummary {
        pending: pending.len(),
        ..LookupSummary::default()
    };

    if pending.is_empty() {
        return Ok(QueryOutcome { cache, summary });
    }

    let Some(lookup) = lookup else {
        warn!(
            "No Gender API key - {} names could not be mapped.",
            pending.len()
        );
        summary.skipped_no_credential = true;
        return Ok(QueryOutcome { cache, summary });
    };

    for name in pending {
        debug!(name = %name, "querying gender");
        summary.queried += 1;

        match lookup.lookup(name) {
            Ok(response) if response.accuracy >= u32::from(confidence_threshold) => {
                cache.insert(name.clone(), Gender::from_service_label(&response.gender));
                summary.accepted += 1;
            }
            Ok(response) => {
                debug!(name = %name, accuracy = response.accuracy, "confidence below threshold");
                summary.low_confidence += 1;
            }
            Err(err) => {
                warn!(name = %name, error = %err, "lookup failed");
                summary.failed += 1;
            }
        }
    }

    store.save(&cache)?;

    Ok(QueryOutcome { cache, summary })
}

/// An author name with its resolved gender, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAuthor {
    pub name: String,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub citation_key: String,
    pub first: ResolvedAuthor,
    pub last: ResolvedAuthor,
}

/// Outcome of a full resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolutionRun {
    /// One entry per input record, in input order.
    pub records: Vec<ResolvedRecord>,
    /// Names still unresolved after the final pass.
    pub missed: BTreeSet<String>,
    /// Present when the remote lookup step ran.
    pub lookup: Option<LookupSummary>,
}

/// Drives the two-pass resolution against an injected cache and lookup.
pub struct ResolutionOrchestrator<'a> {
    store: &'a dyn NameCache,
    lookup: Option<&'a dyn GenderLookup>,
    confidence_threshold: u8,
    offline: bool,
}

impl<'a> ResolutionOrchestrator<'a> {
    pub fn new(store: &'a dyn NameCache) -> Self {
        Self {
            store,
            lookup: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            offline: false,
        }
    }

    pub fn with_lookup(mut self, lookup: Option<&'a dyn GenderLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: u8) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Resolve from the cache only; the remote step is skipped entirely.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn run(&self, records: &[BibRecord]) -> Result<ResolutionRun> {
        let names = author_names(records);
        let cache = self.store.load()?;

        let first_pass = resolve(&names, &cache);
        if first_pass.missed.is_empty() || self.offline {
            return Ok(assemble(records, first_pass, None));
        }

        let outcome = query_and_cache(
            &first_pass.missed,
            cache,
            self.lookup,
            self.store,
            self.confidence_threshold,
        )?;

        let second_pass = resolve(&names, &outcome.cache);
        Ok(assemble(records, second_pass, Some(outcome.summary)))
    }
}

/// Every non-empty first and last author name.
///
/// Names that normalize to an empty string can never be resolved and are
/// kept out of lookups.
fn author_names(records: &[BibRecord]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|record| [&record.first_author, &record.last_author])
        .filter(|name| !name.is_empty())
        .cloned()
        .collect()
}

fn assemble(
    records: &[BibRecord],
    resolution: Resolution,
    lookup: Option<LookupSummary>,
) -> ResolutionRun {
    let author = |name: &String| ResolvedAuthor {
        name: name.clone(),
        gender: resolution.gender(name),
    };

    ResolutionRun {
        records: records
            .iter()
            .map(|record| ResolvedRecord {
                citation_key: record.citation_key.clone(),
                first: author(&record.first_author),
                last: author(&record.last_author),
            })
            .collect(),
        missed: resolution.missed,
        lookup,
    }
}
