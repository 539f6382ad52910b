//! Bibbias - gender analytics for BibTeX bibliographies
//!
//! Bibbias extracts the first and last author of every record in a BibTeX
//! file, resolves their gender through a local name cache backed by the
//! gender-api.com lookup service, and reports how records distribute over the
//! nine first-author × last-author gender categories.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction, normalization, caching, two-pass resolution, reporting
//! - `export`: Tab-separated report files
//! - `gender_api`: HTTP client for the remote lookup service

pub mod cli;
pub mod config;
pub mod core;
pub mod export;
pub mod gender_api;
