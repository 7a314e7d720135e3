//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Unified error type for core-logic operations.
///
/// This enum wraps all specific error types and provides a unified
/// error interface for the application layer.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Network(NetworkError),

    #[error(transparent)]
    Transaction(TxError),

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

impl From<NetworkError> for CoreError {
    fn from(e: NetworkError) -> Self {
        CoreError::Network(e)
    }
}

impl From<TxError> for CoreError {
    fn from(e: TxError) -> Self {
        CoreError::Transaction(e)
    }
}

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid RPC URL format: '{url}'")]
    InvalidRpcUrl { url: String },

    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Network and HTTP errors raised by faucet and RPC adapters
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Request timeout after {timeout_ms}ms to {endpoint}")]
    Timeout { timeout_ms: u64, endpoint: String },

    #[error("Connection refused to {endpoint}: {reason}")]
    ConnectionRefused { endpoint: String, reason: String },

    #[error("HTTP error {status_code} from {endpoint}: {message}")]
    HttpError {
        status_code: u16,
        endpoint: String,
        message: String,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

/// Failures of a submitted (or about to be submitted) transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    #[error("Transaction {hash} confirmed with failed status")]
    Reverted { hash: String },

    #[error("Transaction {hash} dropped before confirmation")]
    Dropped { hash: String },

    #[error("{operation} failed after {attempts} attempt(s): {reason}")]
    Exhausted {
        operation: String,
        attempts: u32,
        reason: String,
    },
}

/// Shortens an error for one-line status output: first line only, at most
/// `max_chars` characters.
pub fn summarize_error(error: &anyhow::Error, max_chars: usize) -> String {
    let full = format!("{:#}", error);
    let first_line = full.lines().next().unwrap_or_default();
    if first_line.chars().count() > max_chars {
        let truncated: String = first_line.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        first_line.to_string()
    }
}
