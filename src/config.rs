//! Run configuration.
//!
//! All tunables live in [`ValidatorConfig`] with compiled defaults matching
//! the documented OpenRouter rate limits (20 RPM free tier). An optional TOML
//! file (`keyvet.toml`) overlays the defaults.
//!
//! ## Precedence
//!
//! 1. `--config` CLI flag (must exist if given)
//! 2. `KEYVET_CONFIG` environment variable
//! 3. `./keyvet.toml` if present
//! 4. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{KeyvetError, Result};

/// Environment variable overriding the config file path.
pub const ENV_CONFIG: &str = "KEYVET_CONFIG";

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "keyvet.toml";

/// How a 429 from the chat-completion probe is classified.
///
/// Rate limiting on the completions endpoint is ambiguous evidence: the
/// request authenticated far enough to be throttled, but the key was never
/// proven to complete a chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitPolicy {
    /// 429 counts as valid: being throttled instead of rejected shows the
    /// key authenticates.
    #[default]
    Optimistic,
    /// 429 counts as invalid: a rate limit proves nothing about validity.
    Conservative,
}

/// Resolved configuration for a validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Input file with one credential per line.
    pub api_keys_file: PathBuf,
    /// Directory for output files and the run log.
    pub output_dir: PathBuf,
    /// API base path, e.g. `https://openrouter.ai/api/v1`.
    pub base_url: String,
    /// Base delay between keys, in seconds.
    pub base_delay: f64,
    /// Uniform jitter applied around `base_delay`, in seconds.
    pub jitter: f64,
    /// Delay between the auth probe and the chat probe, in seconds.
    /// May be zero.
    pub intra_request_delay: f64,
    /// Transport retry budget for idempotent GETs.
    pub max_retries: u32,
    /// Classification of 429 responses from the chat probe.
    pub rate_limit_policy: RateLimitPolicy,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            api_keys_file: PathBuf::from("api_keys.txt"),
            output_dir: PathBuf::from("."),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            base_delay: 5.0,
            jitter: 2.0,
            // 3.1s keeps two probes per key under 20 requests per minute.
            intra_request_delay: 3.1,
            max_retries: 3,
            rate_limit_policy: RateLimitPolicy::default(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration following the documented precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested config file is missing or
    /// unparsable, or if a resolved value is invalid. An absent implicit
    /// config file is not an error.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = override_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(ENV_CONFIG).ok().map(PathBuf::from));

        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                let implicit = PathBuf::from(CONFIG_FILE_NAME);
                if implicit.exists() {
                    Self::from_file(&implicit)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            KeyvetError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| KeyvetError::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Validate resolved values.
    ///
    /// # Errors
    ///
    /// Returns an error for negative delays or an empty base URL.
    pub fn validate(&self) -> Result<()> {
        if self.base_delay < 0.0 || self.jitter < 0.0 || self.intra_request_delay < 0.0 {
            return Err(KeyvetError::Config(
                "delays must be non-negative".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(KeyvetError::Config("base_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Delay between the two probes of one key.
    #[must_use]
    pub fn intra_request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.intra_request_delay)
    }

    /// Inclusive range, in seconds, the inter-key delay is drawn from.
    /// The lower bound is clamped at zero.
    #[must_use]
    pub fn delay_range(&self) -> (f64, f64) {
        let low = (self.base_delay - self.jitter).max(0.0);
        let high = self.base_delay + self.jitter;
        (low, high)
    }

    /// Path of the valid-keys output file.
    #[must_use]
    pub fn valid_keys_file(&self) -> PathBuf {
        self.output_dir.join("valid_keys.txt")
    }

    /// Path of the invalid-keys output file.
    #[must_use]
    pub fn invalid_keys_file(&self) -> PathBuf {
        self.output_dir.join("invalid_keys.txt")
    }

    /// Path of the run log file.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.output_dir.join("validation.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_tunables() {
        let config = ValidatorConfig::default();
        assert_eq!(config.api_keys_file, PathBuf::from("api_keys.txt"));
        assert_eq!(config.base_delay, 5.0);
        assert_eq!(config.jitter, 2.0);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.rate_limit_policy, RateLimitPolicy::Optimistic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overlay_keeps_defaults_for_missing_fields() {
        let config: ValidatorConfig =
            toml::from_str("base_delay = 1.0\nrate_limit_policy = \"conservative\"")
                .expect("valid TOML");
        assert_eq!(config.base_delay, 1.0);
        assert_eq!(config.rate_limit_policy, RateLimitPolicy::Conservative);
        // Untouched fields keep their defaults.
        assert_eq!(config.jitter, 2.0);
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<ValidatorConfig, _> = toml::from_str("bogus = 1");
        assert!(result.is_err());
    }

    #[test]
    fn negative_delay_fails_validation() {
        let config = ValidatorConfig {
            jitter: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn delay_range_clamps_at_zero() {
        let config = ValidatorConfig {
            base_delay: 1.0,
            jitter: 3.0,
            ..Default::default()
        };
        assert_eq!(config.delay_range(), (0.0, 4.0));
    }
}
