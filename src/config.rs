use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cleanup::ScanRoot;
use crate::cleanup::scanner::{DEFAULT_LARGE_FILE_MIN_MB, default_large_scan_roots};
use crate::system::history::DEFAULT_CAPACITY;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub cleanup: CleanupConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub history_length: usize,
    pub disk_path: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 2000,
            history_length: DEFAULT_CAPACITY,
            disk_path: PathBuf::from("/"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub large_file_min_mb: u64,
    pub large_file_roots: Vec<ScanRoot>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        CleanupConfig {
            large_file_min_mb: DEFAULT_LARGE_FILE_MIN_MB,
            large_file_roots: default_large_scan_roots(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sysdeck").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "invalid config, using defaults");
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}
