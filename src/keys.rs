//! Key Source: credential file loading and masking.

use std::fs;
use std::path::Path;

/// Length of the visible prefix in masked credentials.
const MASK_PREFIX_LEN: usize = 15;

/// Read credentials from a plaintext file, one per line.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
/// A missing or unreadable file logs an error and yields an empty list
/// instead of aborting the run. Re-reads the file on every call.
#[must_use]
pub fn load_keys(path: &Path) -> Vec<String> {
    tracing::info!("reading keys from {}", path.display());
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("cannot read key file {}: {e}", path.display());
            return Vec::new();
        }
    };

    let keys: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect();

    tracing::info!("loaded {} key(s)", keys.len());
    keys
}

/// Mask a credential for display: fixed-length prefix plus an ellipsis.
///
/// The full value never appears in per-key log lines.
#[must_use]
pub fn mask(key: &str) -> String {
    let prefix: String = key.chars().take(MASK_PREFIX_LEN).collect();
    format!("{prefix}...")
}
