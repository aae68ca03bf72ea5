use std::path::Path;
use std::process::ExitCode;

use vaultdex_core::cache::{CacheReader, JsonCache};
use vaultdex_core::config::loader::{ConfigLoader, default_config_path};

use crate::logging;

pub fn run(config: Option<&Path>, profile: Option<&str>) -> ExitCode {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            logging::init(&rc.logging);
            tracing::debug!(profile = %rc.active_profile, "configuration resolved");

            println!("OK   vaultdex doctor");
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("vault_root: {}", rc.vault_root.display());
            println!("cache_dir: {}", rc.cache_dir.display());
            let excluded: Vec<String> =
                rc.excluded_folders.iter().map(|p| p.display().to_string()).collect();
            println!("excluded_folders: [{}]", excluded.join(", "));
            println!("extensions: [{}]", rc.extensions.join(", "));
            println!("logging.level: {}", rc.logging.level);
            if let Some(ref file) = rc.logging.file {
                println!("logging.file: {}", file.display());
            }

            match JsonCache::new(&rc.cache_dir).list() {
                Ok(entries) => println!("cache_entries: {}", entries.len()),
                Err(e) => println!("cache_entries: unreadable ({e})"),
            }
            match super::read_last_run(&rc.cache_dir) {
                Some(at) => println!("last_run: {}", at.to_rfc3339()),
                None => println!("last_run: never"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("FAIL vaultdex doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            ExitCode::FAILURE
        }
    }
}
