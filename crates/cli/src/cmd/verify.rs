//! Cache consistency check.

use std::process::ExitCode;

use vaultdex_core::cache::JsonCache;
use vaultdex_core::config::ResolvedConfig;
use vaultdex_core::index::Indexer;

use super::output::format_consistency;

pub fn run(rc: &ResolvedConfig) -> ExitCode {
    let cache = JsonCache::new(&rc.cache_dir);
    let walker = match super::open_walker(rc) {
        Ok(walker) => walker,
        Err(e) => {
            eprintln!("Error scanning vault: {e}");
            return ExitCode::FAILURE;
        }
    };

    let indexer = Indexer::new(&walker, &cache, &cache, None, super::indexer_options(rc, &walker));
    match indexer.verify_cache() {
        Ok(report) => {
            print!("{}", format_consistency(&report));
            if report.is_consistent() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
        Err(e) => {
            eprintln!("Error verifying cache: {e}");
            ExitCode::FAILURE
        }
    }
}
