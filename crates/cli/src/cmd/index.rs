//! Full index command.

use std::process::ExitCode;

use chrono::Utc;
use vaultdex_core::cache::JsonCache;
use vaultdex_core::cancel::CancelToken;
use vaultdex_core::config::ResolvedConfig;
use vaultdex_core::frontmatter::FrontmatterExtractor;
use vaultdex_core::index::{IndexStats, Indexer};

use super::output::format_stats;

pub fn run(rc: &ResolvedConfig, clean: bool) -> ExitCode {
    let started = Utc::now();
    let cache = JsonCache::new(&rc.cache_dir);

    if clean {
        match cache.clear() {
            Ok(removed) => println!("Removed {removed} cache entries"),
            Err(e) => {
                eprintln!("Error clearing cache: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let walker = match super::open_walker(rc) {
        Ok(walker) => walker,
        Err(e) => {
            print!("{}", format_stats("Indexing", &IndexStats::default(), false));
            eprintln!("Error during indexing: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("Indexing vault: {}", walker.root().display());

    let indexer = Indexer::new(
        &walker,
        &cache,
        &cache,
        Some(&FrontmatterExtractor),
        super::indexer_options(rc, &walker),
    );

    match indexer.build(&CancelToken::new()) {
        Ok(stats) => {
            print!("{}", format_stats("Indexing", &stats, false));
            println!("Cache stored at: {}", cache.root().display());
            super::record_run(&rc.cache_dir, started);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print!("{}", format_stats("Indexing", &IndexStats::default(), false));
            eprintln!("Error during indexing: {e}");
            ExitCode::FAILURE
        }
    }
}
