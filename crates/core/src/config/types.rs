use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Where cache entries live. Defaults to `{{vault_root}}/.vaultdex/cache`.
    pub cache_dir: Option<String>,
    /// Folders to exclude from indexing (relative to vault_root).
    #[serde(default)]
    pub excluded_folders: Vec<String>,
    /// File extensions that are indexed, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    pub cache_dir: PathBuf,
    /// Folders to exclude, after `~` and `{{vault_root}}` expansion.
    pub excluded_folders: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub logging: LoggingConfig,
}
