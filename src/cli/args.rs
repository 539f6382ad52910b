//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `analyze`: Resolve author genders for a BibTeX file and report statistics
//! - `cache`: Inspect the persistent name cache
//! - `init`: Initialize bibbias configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::{API_KEY_ENV, API_URL_ENV, CACHE_PATH_ENV};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Analyze(cmd)) => cmd.common.verbose,
            Some(Command::Cache(CacheCommand::Path(cmd) | CacheCommand::Show(cmd))) => {
                cmd.common.verbose
            }
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Name cache directory (overrides config file)
    #[arg(long, env = CACHE_PATH_ENV)]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeCommand {
    /// The input bibtex file
    pub bib_file: PathBuf,

    /// Where to write names that could not be resolved
    pub missed_query_file: Option<PathBuf>,

    /// Where to write per-record author names and genders
    pub resolved_query_file: Option<PathBuf>,

    /// Where to write category counts
    pub gender_report_file: Option<PathBuf>,

    /// Where to write category ratios
    pub stats_report_file: Option<PathBuf>,

    /// gender-api.com key; without it only cached names are resolved
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Lookup endpoint (overrides config file)
    #[arg(long, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Minimum lookup accuracy (0-100) to accept a gender (overrides config file)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// Resolve from the cache only, never query the lookup service
    #[arg(long)]
    pub offline: bool,

    /// Fail when record headers and author fields cannot be paired one to one
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Print the location of the name cache file
    Path(CacheArgs),
    /// List cached names with their gender labels
    Show(CacheArgs),
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve first/last author genders of a BibTeX file and report statistics
    Analyze(AnalyzeCommand),
    /// Inspect the name cache
    #[command(subcommand)]
    Cache(CacheCommand),
    /// Initialize a new .bibbiasrc.json configuration file
    Init,
}
