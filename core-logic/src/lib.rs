//! # Core Logic - Shared Utilities for Testnet Automation
//!
//! Chain-agnostic building blocks used by the chain crates under `chains/`.
//!
//! ## Modules
//!
//! - [`config`] - Endpoint validation and secrets read from the environment
//! - [`error`] - Typed error handling with thiserror
//! - [`outcome`] - Per-step success/skip/failure result
//! - `utils` - Retry policy, gas policy, logger and cycle runner

pub mod config;
pub mod error;
pub mod outcome;
pub(crate) mod utils;

pub use config::{require_env, require_secret_env, validate_rpc_url, Secret};
pub use error::{summarize_error, ConfigError, CoreError, NetworkError, TxError};
pub use outcome::StepOutcome;

pub use utils::{
    format_countdown, setup_logger, shutdown_token, CycleRunner, GasConfig, GasConfigToml,
};

pub use utils::retry::{with_retry, RetryPolicy};
