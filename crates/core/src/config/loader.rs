use crate::config::types::{ConfigFile, LoggingConfig, Profile, ResolvedConfig};
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

/// Overrides the profile's `vault_root`.
pub const ENV_VAULT_ROOT: &str = "VAULTDEX_VAULT_ROOT";
/// Overrides the profile's `cache_dir`.
pub const ENV_CACHE_DIR: &str = "VAULTDEX_CACHE_DIR";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "VAULTDEX_LOG_LEVEL";

const DEFAULT_CACHE_DIR: &str = "{{vault_root}}/.vaultdex/cache";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and resolve the config, applying `VAULTDEX_*` overrides from the
    /// process environment.
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        Self::load_with_env(config_path, profile_override, |key| env::var(key).ok())
    }

    /// Like [`load`](Self::load), reading overrides through `lookup`.
    pub fn load_with_env<F>(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
        lookup: F,
    ) -> Result<ResolvedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let active = profile_override
            .map(ToOwned::to_owned)
            .or(cf.profile.clone())
            .unwrap_or_else(|| "default".to_string());

        let mut prof = cf
            .profiles
            .get(&active)
            .cloned()
            .ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;
        let mut logging = cf.logging.clone();

        apply_env_overrides(&mut prof, &mut logging, lookup);

        Self::resolve_profile(&active, &prof, &logging)
    }

    fn resolve_profile(
        active: &str,
        prof: &Profile,
        log_cfg: &LoggingConfig,
    ) -> Result<ResolvedConfig, ConfigError> {
        let vault_root = expand_path(&prof.vault_root)?;
        let sub = |s: &str| s.replace("{{vault_root}}", &vault_root.to_string_lossy());

        let cache_dir =
            expand_path(&sub(prof.cache_dir.as_deref().unwrap_or(DEFAULT_CACHE_DIR)))?;

        let excluded_folders = prof
            .excluded_folders
            .iter()
            .map(|folder| expand_path(&sub(folder)))
            .collect::<Result<Vec<_>, _>>()?;

        // Resolve log file path if present
        let logging = if let Some(ref file) = log_cfg.file {
            let expanded_file = expand_path(&sub(&file.to_string_lossy()))?;
            LoggingConfig {
                level: log_cfg.level.clone(),
                file_level: log_cfg.file_level.clone(),
                file: Some(expanded_file),
            }
        } else {
            log_cfg.clone()
        };

        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            vault_root,
            cache_dir,
            excluded_folders,
            extensions: prof.extensions.clone(),
            logging,
        })
    }
}

fn apply_env_overrides<F>(prof: &mut Profile, logging: &mut LoggingConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(root) = set(ENV_VAULT_ROOT) {
        prof.vault_root = root;
    }
    if let Some(cache_dir) = set(ENV_CACHE_DIR) {
        prof.cache_dir = Some(cache_dir);
    }
    if let Some(level) = set(ENV_LOG_LEVEL) {
        logging.level = level;
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("vaultdex").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("vaultdex").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
