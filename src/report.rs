//! Result Reporter.
//!
//! Writes both output files at end of run (always, even when empty, so
//! downstream tooling can rely on their presence) and logs a summary. Write
//! failures are logged, never fatal. The invalid list is echoed unmasked to
//! the log, matching the output files; per-key probe logs stay masked.

use std::fs;
use std::path::Path;

use chrono::Local;

use crate::config::ValidatorConfig;
use crate::orchestrator::RunResult;

/// Persist the run result and log the summary.
pub fn write_results(config: &ValidatorConfig, result: &RunResult) {
    tracing::info!(
        "run finished at {}: {} valid, {} invalid",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        result.valid.len(),
        result.invalid.len()
    );

    write_key_file(&config.valid_keys_file(), &result.valid, "valid");
    write_key_file(&config.invalid_keys_file(), &result.invalid, "invalid");

    if result.invalid.is_empty() {
        if result.total() > 0 {
            tracing::info!("all keys validated successfully");
        }
    } else {
        tracing::info!("invalid keys:");
        for key in &result.invalid {
            tracing::info!("{key}");
        }
    }
}

fn write_key_file(path: &Path, keys: &[String], label: &str) {
    let content: String = keys.iter().map(|key| format!("{key}\n")).collect();
    match fs::write(path, content) {
        Ok(()) => {
            tracing::info!("{} {label} key(s) written to {}", keys.len(), path.display());
        }
        Err(e) => {
            tracing::error!("cannot write {label} keys to {}: {e}", path.display());
        }
    }
}
