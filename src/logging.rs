//! Log setup.
//!
//! The terminal belongs to the UI, so log output goes to a file. The level
//! comes from `RUST_LOG` and defaults to `info`.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to `path`.
///
/// # Arguments
/// * `path` - Log file, created along with its directory if missing
///
/// # Returns
/// * `Result<()>` - Error if the file cannot be opened or a subscriber is
///   already installed
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;
    Ok(())
}

/// Route panic reports to the log instead of stderr, which would draw
/// over the UI.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        let detail = crate::boundary::panic_detail(info.payload());
        tracing::error!(%location, %detail, "panic");
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("portfolio-tui.log");
        init(&path).unwrap();
        tracing::warn!(query = "market-cap(USDT)", "fetch failed");

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("fetch failed"));
        assert!(content.contains("market-cap(USDT)"));
        // A second subscriber is refused
        assert!(init(&path).is_err());
    }
}
