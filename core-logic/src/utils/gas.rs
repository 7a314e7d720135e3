//! # Core Logic - Gas Configuration
//!
//! Generic gas-limit policy shared by chain implementations. This module
//! provides configuration only; chain crates do the actual estimation.

use serde::Deserialize;

/// Configuration for gas-limit derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasConfig {
    /// Units assumed when the node refuses to estimate a call.
    pub fallback_limit: u64,
    /// Safety margin applied to every estimate, in percent (120 = 1.2x).
    pub buffer_percent: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            fallback_limit: 500_000,
            buffer_percent: 120,
        }
    }
}

impl GasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback_limit(mut self, units: u64) -> Self {
        self.fallback_limit = units;
        self
    }

    pub fn with_buffer_percent(mut self, percent: u64) -> Self {
        self.buffer_percent = percent;
        self
    }

    /// `ceil(units * buffer_percent / 100)`, saturating at `u64::MAX`.
    pub fn buffered_limit(&self, units: u64) -> u64 {
        let scaled = units as u128 * self.buffer_percent as u128;
        let limit = scaled.div_ceil(100);
        u64::try_from(limit).unwrap_or(u64::MAX)
    }

    /// Gas limit for a call whose estimate may have failed.
    pub fn limit_for(&self, estimate: Option<u64>) -> u64 {
        self.buffered_limit(estimate.unwrap_or(self.fallback_limit))
    }
}

/// Deserialize helper for GasConfig from TOML
#[derive(Debug, Default, Deserialize)]
pub struct GasConfigToml {
    pub fallback_gas_limit: Option<u64>,
    pub gas_buffer_percent: Option<u64>,
}

impl From<GasConfigToml> for GasConfig {
    fn from(toml: GasConfigToml) -> Self {
        let defaults = GasConfig::default();
        Self {
            fallback_limit: toml.fallback_gas_limit.unwrap_or(defaults.fallback_limit),
            buffer_percent: toml.gas_buffer_percent.unwrap_or(defaults.buffer_percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_config_defaults() {
        let config = GasConfig::default();
        assert_eq!(config.fallback_limit, 500_000);
        assert_eq!(config.buffer_percent, 120);
    }

    #[test]
    fn test_buffered_limit_rounds_up() {
        let config = GasConfig::default();
        assert_eq!(config.buffered_limit(100_000), 120_000);
        // 21_001 * 1.2 = 25_201.2
        assert_eq!(config.buffered_limit(21_001), 25_202);
        assert_eq!(config.buffered_limit(0), 0);
    }

    #[test]
    fn test_fallback_used_without_estimate() {
        let config = GasConfig::default();
        assert_eq!(config.limit_for(None), 600_000);
        assert_eq!(config.limit_for(Some(50_000)), 60_000);
    }

    #[test]
    fn test_from_toml_partial() {
        let config: GasConfig = GasConfigToml {
            fallback_gas_limit: Some(300_000),
            gas_buffer_percent: None,
        }
        .into();
        assert_eq!(config.fallback_limit, 300_000);
        assert_eq!(config.buffer_percent, 120);
    }
}
