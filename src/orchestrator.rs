//! Batch Orchestrator.
//!
//! Walks the credential list sequentially: one key is fully probed before the
//! next begins, with a jittered sleep between keys to stay under provider
//! rate limits. Owns the single RNG that drives both model selection and
//! delay sampling, so a fixed seed reproduces a run's random sequence.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::ModelCatalog;
use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::http;
use crate::keys;
use crate::validator::KeyValidator;

/// Outcome of a validation run: both buckets preserve input order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Credentials that passed both probes.
    pub valid: Vec<String>,
    /// Credentials that failed either probe.
    pub invalid: Vec<String>,
}

impl RunResult {
    /// Total number of classified credentials.
    #[must_use]
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }
}

/// Sequential batch runner over the configured key file.
#[derive(Debug)]
pub struct BatchRunner {
    config: ValidatorConfig,
    validator: KeyValidator,
    catalog: ModelCatalog,
    rng: StdRng,
}

impl BatchRunner {
    /// Create a runner with an entropy-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: ValidatorConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a runner with a fixed seed for reproducible runs.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn with_seed(config: ValidatorConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ValidatorConfig, rng: StdRng) -> Result<Self> {
        let client = http::build_client()?;
        let validator = KeyValidator::new(client.clone(), &config);
        let catalog = ModelCatalog::new(client, &config.base_url, config.max_retries);
        Ok(Self {
            config,
            validator,
            catalog,
            rng,
        })
    }

    /// The configuration this runner was built with.
    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate every loaded credential and return the partitioned result.
    ///
    /// Short-circuits with an empty result when there are no usable keys or
    /// no free models; neither case probes any credential.
    pub async fn run(&mut self) -> RunResult {
        let loaded = keys::load_keys(&self.config.api_keys_file);
        if loaded.is_empty() {
            tracing::error!("no usable keys loaded, nothing to validate");
            return RunResult::default();
        }

        let free_models = self.catalog.free_models().await;
        if free_models.is_empty() {
            tracing::error!("free-model list unavailable, cannot run chat probes");
            return RunResult::default();
        }

        let total = loaded.len();
        tracing::info!("validating {total} key(s)");

        let mut result = RunResult::default();
        for (i, key) in loaded.iter().enumerate() {
            let verdict = self
                .validator
                .validate(key, free_models, &mut self.rng)
                .await;
            if verdict {
                result.valid.push(key.clone());
            } else {
                result.invalid.push(key.clone());
            }
            tracing::info!("validated {}/{total} key(s)", i + 1);

            if i + 1 < total {
                let (low, high) = self.config.delay_range();
                let secs = self.rng.gen_range(low..=high);
                if secs > 0.0 {
                    tracing::info!("sleeping {secs:.2}s before next key");
                    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with_keys(path: PathBuf) -> ValidatorConfig {
        ValidatorConfig {
            api_keys_file: path,
            base_delay: 0.0,
            jitter: 0.0,
            intra_request_delay: 0.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_key_file_short_circuits() {
        let config = config_with_keys(PathBuf::from("/nonexistent/keys.txt"));
        let mut runner = BatchRunner::with_seed(config, 7).expect("runner");
        let result = runner.run().await;
        assert_eq!(result, RunResult::default());
        assert_eq!(result.total(), 0);
    }
}
