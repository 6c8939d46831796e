//! Small helpers shared by the pipeline and the binary entry point.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Name of the throwaway file used to probe a directory for write access.
const PROBE_FILE: &str = ".trend_scraper_write_probe";

/// Shorten `s` to at most `max` bytes for a log field.
///
/// The cut never splits a UTF-8 character; the number of bytes left out is
/// appended, e.g. `aaaaaaaaaa…(+490 bytes)`.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Create `path` if needed and check that files can be written in it.
///
/// # Errors
///
/// Fails if the directory cannot be created or the probe file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe = Path::new(path).join(PROBE_FILE);
    fs::write(&probe, b"").await?;
    if let Err(e) = fs::remove_file(&probe).await {
        debug!(error = %e, "Could not remove write probe");
    }
    debug!("Directory is writable");
    Ok(())
}
