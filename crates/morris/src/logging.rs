use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::util::io::atomic_write;

/// Log size that triggers trimming on startup (5 MB)
const MAX_LOG_SIZE: usize = 5 * 1024 * 1024;
/// Approximate size of the recent tail kept after trimming (1 MB)
const KEEP_SIZE: usize = 1024 * 1024;

const TRIM_MARKER: &[u8] = b"--- earlier morris log entries trimmed ---\n";

/// Trim an oversized log down to its most recent whole lines.
///
/// Returns the number of bytes dropped, or `None` when the file is absent or
/// small enough to keep as is.
fn trim_log(log_path: &Path) -> io::Result<Option<usize>> {
    let content = match fs::read(log_path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if content.len() <= MAX_LOG_SIZE {
        return Ok(None);
    }

    let cut = content.len() - KEEP_SIZE;
    let start = content[cut..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(content.len(), |i| cut + i + 1);

    let mut trimmed = Vec::with_capacity(TRIM_MARKER.len() + content.len() - start);
    trimmed.extend_from_slice(TRIM_MARKER);
    trimmed.extend_from_slice(&content[start..]);
    atomic_write(log_path, &trimmed)?;

    Ok(Some(start))
}

fn env_filter(level: &str) -> EnvFilter {
    let default_filter = format!("morris={level},morris_core={level}");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter))
}

/// Initialize logging to stderr, or to `log_file` when given.
///
/// File logs are appended. A log above 5MB is trimmed to roughly its last
/// 1MB before the subscriber opens it. The level can be overridden with the
/// `RUST_LOG` environment variable.
pub fn init_logging(log_file: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let filter = env_filter(level);

    let Some(log_path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .init();
        return Ok(());
    };

    if let Some(dir) = log_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let trimmed = trim_log(log_path);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    match trimmed {
        Ok(Some(dropped)) => tracing::info!(dropped, "Trimmed oversized log file"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Could not trim log file"),
    }
    tracing::info!(log_path = %log_path.display(), "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_small_log_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("morris.log");
        fs::write(&path, "line one\nline two\n").unwrap();

        assert_eq!(trim_log(&path).unwrap(), None);
        assert_eq!(fs::read_to_string(&path).unwrap(), "line one\nline two\n");
    }

    #[test]
    fn test_large_log_keeps_recent_whole_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("morris.log");
        let line = "x".repeat(99) + "\n";
        let content = line.repeat(MAX_LOG_SIZE / 100 + 10) + "last entry\n";
        fs::write(&path, &content).unwrap();

        let dropped = trim_log(&path).unwrap().unwrap();

        let trimmed = fs::read_to_string(&path).unwrap();
        assert!(trimmed.as_bytes().starts_with(TRIM_MARKER));
        assert!(trimmed.ends_with("last entry\n"));
        assert!(trimmed.len() <= TRIM_MARKER.len() + KEEP_SIZE);
        assert_eq!(dropped + trimmed.len() - TRIM_MARKER.len(), content.len());
        assert!(trimmed.lines().skip(1).all(|l| l.len() == 99 || l == "last entry"));
        assert!(!dir.path().join("morris.log.tmp").exists());
    }

    #[test]
    fn test_missing_log_is_fine() {
        let dir = tempdir().unwrap();
        assert_eq!(trim_log(&dir.path().join("absent.log")).unwrap(), None);
    }

    #[test]
    fn test_oversized_single_line_is_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("morris.log");
        fs::write(&path, "y".repeat(MAX_LOG_SIZE + 1)).unwrap();

        assert_eq!(trim_log(&path).unwrap(), Some(MAX_LOG_SIZE + 1));
        assert_eq!(fs::read(&path).unwrap(), TRIM_MARKER);
    }
}
