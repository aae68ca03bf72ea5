//! Incremental refresh command.

use std::process::ExitCode;

use chrono::{DateTime, NaiveDate, Utc};
use vaultdex_core::cache::JsonCache;
use vaultdex_core::cancel::CancelToken;
use vaultdex_core::config::ResolvedConfig;
use vaultdex_core::frontmatter::FrontmatterExtractor;
use vaultdex_core::index::{IndexStats, Indexer};

use super::output::format_stats;

/// Parse `--since`: an RFC 3339 timestamp or a plain `YYYY-MM-DD` date
/// (midnight UTC).
pub fn parse_since(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{raw}' (expected RFC 3339 or YYYY-MM-DD)"))
}

pub fn run(rc: &ResolvedConfig, since: Option<DateTime<Utc>>) -> ExitCode {
    let started = Utc::now();
    let cache = JsonCache::new(&rc.cache_dir);
    let since = since
        .or_else(|| super::read_last_run(&rc.cache_dir))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    let walker = match super::open_walker(rc) {
        Ok(walker) => walker,
        Err(e) => {
            print!("{}", format_stats("Refresh", &IndexStats::default(), true));
            eprintln!("Error during refresh: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Refreshing vault: {} (changes since {})",
        walker.root().display(),
        since.to_rfc3339()
    );

    let indexer = Indexer::new(
        &walker,
        &cache,
        &cache,
        Some(&FrontmatterExtractor),
        super::indexer_options(rc, &walker),
    );

    match indexer.refresh(since, &CancelToken::new()) {
        Ok(stats) => {
            print!("{}", format_stats("Refresh", &stats, true));
            super::record_run(&rc.cache_dir, started);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print!("{}", format_stats("Refresh", &IndexStats::default(), true));
            eprintln!("Error during refresh: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_since_rfc3339() {
        let ts = parse_since("2024-01-15T10:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_since_plain_date() {
        let ts = parse_since("2024-01-15").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_since_rejects_garbage() {
        assert!(parse_since("last tuesday").unwrap_err().contains("last tuesday"));
    }
}
