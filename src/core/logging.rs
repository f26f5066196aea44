//! Logging Module
//!
//! Structured logging via `tracing`:
//! - JSON file logger with daily rotation in the app data directory
//! - Optional pretty stdout logger (omitted in TUI mode)
//! - `log` crate macros bridged into `tracing`
//! - Rotated logs from earlier days gzip-compressed in the background

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "rpm-generator.log";

/// Log directory in the app data directory.
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("rpm-generator").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logging system.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the application
/// to ensure buffered logs are flushed on shutdown.
pub fn init() -> WorkerGuard {
    install(true)
}

/// Initialize the logging system for TUI mode.
///
/// Identical to [`init()`] but omits the stdout layer to avoid corrupting
/// the terminal while ratatui is in raw/alternate-screen mode.
pub fn init_tui() -> WorkerGuard {
    install(false)
}

fn install(with_stdout: bool) -> WorkerGuard {
    let log_dir = log_dir();
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // File Layer: JSON format for easy parsing/ingestion
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(default_filter());

    let stdout_layer = with_stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .pretty()
            .with_filter(default_filter())
    });

    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
    {
        eprintln!("Failed to initialize tracing subscriber: {}", e);
    }

    // Redirect standard `log` macros to `tracing` (no-op if the subscriber already did)
    let _ = tracing_log::LogTracer::init();

    let log_dir_clone = log_dir.clone();
    std::thread::spawn(move || {
        compress_old_logs(&log_dir_clone);
    });

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX)
    );

    guard
}

/// Rolled files (`prefix.YYYY-MM-DD`) from days other than `today`.
fn should_compress(name: &str, today: &str) -> bool {
    name.strip_prefix(LOG_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|suffix| suffix != today && !suffix.ends_with(".gz"))
}

/// Compress old log files
fn compress_old_logs(log_dir: &Path) {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !should_compress(name, &today) {
            continue;
        }
        match compress_file(&path) {
            Ok(()) => log::info!("Compressed old log: {:?}", path),
            Err(e) => log::warn!("Failed to compress old log {:?}: {}", path, e),
        }
    }
}

fn compress_file(path: &Path) -> io::Result<()> {
    let file = fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);

    let mut gz_path_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_path_name.push(".gz");
    let parent_dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?;
    let gz_path = parent_dir.join(gz_path_name);

    // Skip if already exists
    if gz_path.exists() {
        return Ok(());
    }

    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;

    Ok(())
}
