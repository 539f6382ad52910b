use std::env;

use anyhow::Result;
use colored::Colorize;

use super::super::{
    args::{CacheCommand, CommonArgs},
    exit_status::ExitStatus,
    report::{SUCCESS_MARK, print_cache_to},
};
use crate::{
    config::{Config, load_config},
    core::{FileNameCache, NameCache},
};

pub fn cache(cmd: CacheCommand) -> Result<ExitStatus> {
    let config = load_config(&env::current_dir()?)?.config;

    match cmd {
        CacheCommand::Path(args) => {
            let store = open_store(&args.common, &config)?;
            println!("{}", store.path().display());
        }
        CacheCommand::Show(args) => {
            let store = open_store(&args.common, &config)?;
            let names = store.load()?;
            if names.is_empty() {
                println!("No cached names in {}", store.path().display());
            } else {
                print_cache_to(&names, &mut std::io::stdout().lock());
                println!(
                    "{} {}",
                    SUCCESS_MARK.green(),
                    format!(
                        "{} cached {}",
                        names.len(),
                        if names.len() == 1 { "name" } else { "names" }
                    )
                    .green()
                );
            }
        }
    }

    Ok(ExitStatus::Success)
}

/// Open the file-backed cache, honouring `--cache-dir` / `BIBBIAS_CACHE_PATH`.
pub(super) fn open_store(common: &CommonArgs, config: &Config) -> Result<FileNameCache> {
    let root = config.cache_root(common.cache_dir.as_deref())?;
    FileNameCache::open(&root)
}
