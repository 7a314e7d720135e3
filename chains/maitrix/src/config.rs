use crate::tokens::CHAIN_ID;
use crate::workflow::Pacing;
use anyhow::{Context, Result};
use config::{Config, File};
use core_logic::{
    require_env, require_secret_env, validate_rpc_url, ConfigError, GasConfig, GasConfigToml,
    RetryPolicy, Secret,
};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "chains/maitrix/config.toml";

/// Optional tunables as written in `config.toml`. Every field has a default.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MaitrixFileConfig {
    #[serde(default)]
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
    pub cycle_hours: Option<u64>,
    pub settle_delay_secs: Option<u64>,
    pub step_delay_secs: Option<u64>,
    pub faucet_spacing_secs: Option<u64>,
    pub mint_max_attempts: Option<u32>,
    pub backoff_min_ms: Option<u64>,
    pub backoff_max_ms: Option<u64>,
    pub fallback_gas_limit: Option<u64>,
    pub gas_buffer_percent: Option<u64>,
}

impl MaitrixFileConfig {
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()
            .with_context(|| format!("Failed to read config file {}", path))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid config file {}", path))
    }
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct MaitrixConfig {
    pub rpc_url: String,
    pub private_key: Secret,
    pub chain_id: u64,
    pub cycle: Duration,
    pub pacing: Pacing,
    pub faucet_spacing: Duration,
    pub mint_policy: RetryPolicy,
    pub gas: GasConfig,
}

impl MaitrixConfig {
    /// File at `path`, then `RPC_URL` and `PRIVATE_KEY` from the environment.
    pub fn load(path: &str) -> Result<Self> {
        let file = MaitrixFileConfig::load(path)?;
        let config = Self::resolve(
            file,
            require_env("RPC_URL").ok(),
            require_secret_env("PRIVATE_KEY").ok(),
        )?;
        Ok(config)
    }

    /// `rpc_env` overrides the file's `rpc_url`; the key only comes from the
    /// environment.
    pub fn resolve(
        file: MaitrixFileConfig,
        rpc_env: Option<String>,
        private_key: Option<Secret>,
    ) -> Result<Self, ConfigError> {
        let rpc_url = rpc_env
            .or(file.rpc_url.clone())
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "RPC_URL".to_string(),
            })?;
        validate_rpc_url(&rpc_url)?;

        let private_key = private_key
            .filter(|key| !key.expose().trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "PRIVATE_KEY".to_string(),
            })?;

        let cycle_hours = file.cycle_hours.unwrap_or(24);
        if cycle_hours == 0 {
            return Err(invalid("cycle_hours", "must be at least 1"));
        }
        let mint_attempts = file.mint_max_attempts.unwrap_or(3);
        if mint_attempts == 0 {
            return Err(invalid("mint_max_attempts", "must be at least 1"));
        }

        let gas = GasConfig::from(GasConfigToml {
            fallback_gas_limit: file.fallback_gas_limit,
            gas_buffer_percent: file.gas_buffer_percent,
        });
        if gas.buffer_percent < 100 {
            return Err(invalid("gas_buffer_percent", "must be at least 100"));
        }

        Ok(Self {
            rpc_url,
            private_key,
            chain_id: file.chain_id.unwrap_or(CHAIN_ID),
            cycle: Duration::from_secs(cycle_hours * 60 * 60),
            pacing: Pacing {
                settle_after_claim: Duration::from_secs(file.settle_delay_secs.unwrap_or(10)),
                between_steps: Duration::from_secs(file.step_delay_secs.unwrap_or(5)),
            },
            faucet_spacing: Duration::from_secs(file.faucet_spacing_secs.unwrap_or(2)),
            mint_policy: RetryPolicy::new(
                mint_attempts,
                Duration::from_millis(file.backoff_min_ms.unwrap_or(7_000)),
                Duration::from_millis(file.backoff_max_ms.unwrap_or(10_000)),
            ),
            gas,
        })
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
