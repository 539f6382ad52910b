//! Gender resolution core.
//!
//! Data flows leaf to root:
//!
//! - `extract`: bibliography text → citation keys with first/last authors
//! - `name`: raw author name → normalized lookup key
//! - `cache`: persistent name → gender store
//! - `resolve`: cache-only resolution of a name set
//! - `lookup`: remote lookup capability
//! - `orchestrator`: two-pass resolution, remote enrichment, record assembly
//! - `report`: category tallies and ratios

pub mod cache;
pub mod extract;
pub mod gender;
pub mod lookup;
pub mod name;
pub mod orchestrator;
pub mod report;
pub mod resolve;

pub use cache::{CACHE_FILE_NAME, FileNameCache, MemoryNameCache, NameCache, NameMap};
pub use extract::{BibRecord, CountMismatch, ExtractError, Extraction, RawRecord, extract_records};
pub use gender::Gender;
pub use lookup::{GenderLookup, LookupError, LookupResponse};
pub use name::normalize_name;
pub use orchestrator::{
    DEFAULT_CONFIDENCE_THRESHOLD, LookupSummary, QueryOutcome, ResolutionOrchestrator,
    ResolutionRun, ResolvedAuthor, ResolvedRecord, query_and_cache,
};
pub use report::{Category, GenderReport, Stats};
pub use resolve::{Resolution, resolve};
