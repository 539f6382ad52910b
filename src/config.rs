use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_CONFIDENCE_THRESHOLD;

pub const CONFIG_FILE_NAME: &str = ".bibbiasrc.json";

/// Environment variable overriding the cache root directory.
pub const CACHE_PATH_ENV: &str = "BIBBIAS_CACHE_PATH";

/// Environment variable holding the gender-api.com key.
pub const API_KEY_ENV: &str = "GENDER_API_KEY";

/// Environment variable overriding the lookup endpoint.
pub const API_URL_ENV: &str = "BIBBIAS_API_URL";

pub const DEFAULT_API_URL: &str = "https://gender-api.com/get";

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: u8,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_root: Option<String>,
}

fn default_confidence_threshold() -> u8 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            cache_root: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.confidence_threshold > 100 {
            bail!(
                "Invalid 'confidenceThreshold': {} (must be between 0 and 100)",
                self.confidence_threshold
            );
        }
        if self.api_url.trim().is_empty() {
            bail!("Invalid 'apiUrl': must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("Invalid 'timeoutSecs': must be greater than 0");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cache root: `override_root` (flag or `BIBBIAS_CACHE_PATH`), then
    /// `cacheRoot` from the config file, then `~/.cache/bibbias`.
    pub fn cache_root(&self, override_root: Option<&Path>) -> Result<PathBuf> {
        if let Some(root) = override_root {
            return Ok(root.to_path_buf());
        }
        if let Some(root) = &self.cache_root {
            return Ok(PathBuf::from(root));
        }
        default_cache_root()
    }
}

pub fn default_cache_root() -> Result<PathBuf> {
    let home = dirs::home_dir().with_context(|| {
        format!(
            "Could not determine home directory; set {} to choose a cache location.",
            CACHE_PATH_ENV
        )
    })?;
    Ok(home.join(".cache").join("bibbias"))
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
