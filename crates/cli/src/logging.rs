use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use vaultdex_core::config::LoggingConfig;

static LOG_GUARD: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> = Mutex::new(None);

/// Install the stderr layer and, when `logging.file` is set, a file layer.
/// `RUST_LOG` directives refine both.
pub fn init(logging: &LoggingConfig) {
    let stderr_level = parse_level(&logging.level).unwrap_or(LevelFilter::INFO);

    let stderr_filter =
        EnvFilter::builder().with_default_directive(stderr_level.into()).from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_filter(stderr_filter);

    let registry = tracing_subscriber::registry().with(stderr_layer);

    let Some(file) = logging.file.as_deref().and_then(open_log_file) else {
        registry.init();
        return;
    };

    let file_level_str = logging.file_level.as_deref().unwrap_or(&logging.level);
    let file_level = parse_level(file_level_str).unwrap_or(LevelFilter::DEBUG);

    let file_filter =
        EnvFilter::builder().with_default_directive(file_level.into()).from_env_lossy();

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    // Keep the worker alive for the life of the process
    if let Ok(mut g) = LOG_GUARD.lock() {
        *g = Some(guard);
    }

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(file_filter);

    registry.with(file_layer).init();
}

/// Create the log file and its parent directory. On failure the error is
/// reported and logging continues on stderr only.
fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        eprintln!("Failed to create log directory {}: {}", parent.display(), e);
        return None;
    }

    match File::create(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Failed to create log file {}: {}", path.display(), e);
            None
        }
    }
}

/// Flush buffered file output. Needed before `process::exit`, which skips
/// destructors.
pub fn flush() {
    if let Ok(mut g) = LOG_GUARD.lock() {
        g.take();
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}
