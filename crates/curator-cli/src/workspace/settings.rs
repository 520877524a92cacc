use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::WorkspaceResult;
use super::atomic::write_bytes_atomic;

/// Settings read from `curator.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratorSettings {
    /// Directory holding one JSON file per connection.
    pub store_dir: PathBuf,
    /// JSON log file; logs go to stderr when unset.
    pub log_path: Option<PathBuf>,
    /// Maximum distinct values sampled per column.
    pub sample_limit: i64,
    /// Overrides the connection's own DSN for catalog and enrichment queries.
    pub database_url: Option<String>,
}

impl Default for CuratorSettings {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("connections"),
            log_path: None,
            sample_limit: 50,
            database_url: None,
        }
    }
}

/// Read settings from `path`, writing the defaults there first if it is missing.
pub fn load_or_create_settings(path: &Path) -> WorkspaceResult<CuratorSettings> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let settings = CuratorSettings::default();
    let encoded = toml::to_string_pretty(&settings)?;
    write_bytes_atomic(path, encoded.as_bytes())?;
    Ok(settings)
}
