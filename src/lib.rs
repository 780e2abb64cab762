//! keyvet - batch validator for OpenRouter API keys.
//!
//! Reads credentials from a flat text file, probes each one against the live
//! API (auth check, then a free-model chat completion), and partitions them
//! into valid/invalid lists written back to disk. Strictly sequential, with
//! jittered delays between keys to respect provider rate limits.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod keys;
pub mod logging;
pub mod orchestrator;
pub mod report;
pub mod validator;

pub use error::{ExitCode, KeyvetError, Result};
