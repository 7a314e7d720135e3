//! Shared configuration pieces: chain endpoint validation and secret values
//! resolved from the environment.

use crate::error::ConfigError;
use std::fmt;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Accepts only http(s) endpoints.
pub fn validate_rpc_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidRpcUrl {
        url: raw.to_string(),
    };
    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(invalid()),
    }
}

/// A secret string wiped from memory on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

/// Reads a required, non-blank environment variable.
pub fn require_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingField {
            field: key.to_string(),
        }),
    }
}

/// Like [`require_env`] but wraps the value as a [`Secret`].
pub fn require_secret_env(key: &str) -> Result<Secret, ConfigError> {
    require_env(key).map(Secret::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("0xdeadbeef");
        assert_eq!(format!("{:?}", secret), "***REDACTED***");
        assert_eq!(secret.expose(), "0xdeadbeef");
    }

    #[test]
    fn test_rpc_url_validation() {
        assert!(validate_rpc_url("https://sepolia-rollup.arbitrum.io/rpc").is_ok());
        assert!(validate_rpc_url("http://127.0.0.1:8545").is_ok());
        assert!(matches!(
            validate_rpc_url("ws://127.0.0.1:8546"),
            Err(ConfigError::InvalidRpcUrl { .. })
        ));
        assert!(validate_rpc_url("not a url").is_err());
    }
}
