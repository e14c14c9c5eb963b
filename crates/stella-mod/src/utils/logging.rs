//! Tracing setup: warnings on stderr, everything the filter allows in a daily
//! log file under the per-user data directory.

use directories_next::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

const LOG_FILE_PREFIX: &str = "stella-mod";
const DEFAULT_FILTER: &str = "stella_mod=info,stella_mod_lib=info,stella_mod_core=info,stella_overlay=info";
pub const LOG_RETENTION_DAYS: u64 = 7;

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output is flushed.
pub fn init_logging() -> (Option<WorkerGuard>, Option<PathBuf>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    // Progress lines are printed by the commands themselves
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    let (file_guard, file_layer, log_path) = match default_log_dir() {
        Some(log_dir) => match std::fs::create_dir_all(&log_dir) {
            Err(e) => {
                eprintln!(
                    "Failed to create log directory {}: {}",
                    log_dir.display(),
                    e
                );
                (None, None, None)
            }
            Ok(()) => match rolling::RollingFileAppender::builder()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .build(&log_dir)
            {
                Ok(file_appender) => {
                    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                    let layer = tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false);
                    (Some(guard), Some(layer), Some(log_dir))
                }
                Err(e) => {
                    eprintln!("Failed to create log file appender: {}", e);
                    (None, None, None)
                }
            },
        },
        None => (None, None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);
    if let Some(layer) = file_layer {
        registry.with(layer).init();
    } else {
        registry.init();
    }

    if let Some(dir) = &log_path {
        cleanup_old_logs(dir, LOG_RETENTION_DAYS);
    }

    (file_guard, log_path)
}

pub fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "stella-mod").map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Delete log files older than `max_age_days` from the log directory.
/// Returns the number of files removed.
pub fn cleanup_old_logs(log_dir: &Path, max_age_days: u64) -> usize {
    let max_age = Duration::from_secs(max_age_days * 24 * 60 * 60);

    let entries = match std::fs::read_dir(log_dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!("Failed to read log directory for cleanup: {}", e);
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // Only dated log files, e.g. "stella-mod.2026-02-17.log"
        if !file_name.starts_with(&format!("{}.", LOG_FILE_PREFIX)) || !file_name.ends_with(".log")
        {
            continue;
        }

        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        let Ok(age) = SystemTime::now().duration_since(modified) else {
            continue;
        };

        if age > max_age {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!("Deleted old log file: {}", path.display());
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to delete old log file {}: {}", path.display(), e)
                }
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_file(path: &Path, days: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        let then = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
        file.set_modified(then).unwrap();
    }

    #[test]
    fn test_cleanup_only_removes_old_dated_logs() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("stella-mod.2026-01-01.log");
        let fresh = dir.path().join("stella-mod.2026-02-17.log");
        let unrelated = dir.path().join("notes.log");
        for path in [&old, &fresh, &unrelated] {
            std::fs::write(path, b"line").unwrap();
        }
        age_file(&old, 10);
        age_file(&unrelated, 10);

        let removed = cleanup_old_logs(dir.path(), LOG_RETENTION_DAYS);

        assert_eq!(removed, 1);
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_cleanup_tolerates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(&dir.path().join("missing"), 7), 0);
    }
}
