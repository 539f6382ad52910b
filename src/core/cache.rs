//! Persistent name → gender cache.
//!
//! The cache is a single pretty-printed JSON object mapping normalized names
//! to `"M"` or `"F"`. Unresolved names are never written. Saving overwrites
//! the whole file without locking, so two runs writing at the same time
//! keep only the last writer's entries.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::gender::Gender;

/// File name of the cache inside the cache root.
pub const CACHE_FILE_NAME: &str = "names.cache";

/// Normalized name → confident gender label.
pub type NameMap = BTreeMap<String, Gender>;

/// Load/save capability for the name cache.
pub trait NameCache {
    /// Read the whole cache. A cache that was never written is empty.
    fn load(&self) -> Result<NameMap>;

    /// Replace the stored cache with `names`.
    fn save(&self, names: &NameMap) -> Result<()>;
}

/// Cache stored as `names.cache` under a root directory.
#[derive(Debug, Clone)]
pub struct FileNameCache {
    path: PathBuf,
}

impl FileNameCache {
    /// Open the cache under `root`, creating the directory if needed.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create cache directory: {}", root.display()))?;
        Ok(Self {
            path: root.join(CACHE_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NameCache for FileNameCache {
    fn load(&self) -> Result<NameMap> {
        if !self.path.exists() {
            return Ok(NameMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read name cache: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse name cache: {}", self.path.display()))
    }

    fn save(&self, names: &NameMap) -> Result<()> {
        let content =
            serde_json::to_string_pretty(names).context("Failed to serialize name cache.")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write name cache: {}", self.path.display()))
    }
}

/// In-memory cache, mainly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryNameCache {
    names: RefCell<NameMap>,
    saves: Cell<usize>,
}

impl MemoryNameCache {
    pub fn new(names: NameMap) -> Self {
        Self {
            names: RefCell::new(names),
            saves: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> NameMap {
        self.names.borrow().clone()
    }

    /// Number of times [`NameCache::save`] was called.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl NameCache for MemoryNameCache {
    fn load(&self) -> Result<NameMap> {
        Ok(self.snapshot())
    }

    fn save(&self, names: &NameMap) -> Result<()> {
        *self.names.borrow_mut() = names.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
