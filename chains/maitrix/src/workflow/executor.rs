use crate::rpc::{AccountContext, CallRequest, PreparedTx};
use crate::tokens::EXPLORER_TX_URL;
use anyhow::Result;
use core_logic::{summarize_error, with_retry, GasConfig, RetryPolicy, TxError};
use ethers::types::{Address, Bytes, TxHash, U256};
use tracing::{info, warn};

/// Submits one contract call: fresh nonce, gas estimate with fallback,
/// fresh gas price, one confirmation. Retries per the given policy.
#[derive(Debug, Clone)]
pub struct TransactionExecutor {
    ctx: AccountContext,
    gas: GasConfig,
}

impl TransactionExecutor {
    pub fn new(ctx: AccountContext, gas: GasConfig) -> Self {
        Self { ctx, gas }
    }

    pub async fn execute(
        &self,
        label: &str,
        contract: Address,
        payload: &Bytes,
        policy: RetryPolicy,
    ) -> Result<TxHash, TxError> {
        with_retry(policy, label, move |_| self.attempt(label, contract, payload)).await
    }

    async fn attempt(&self, label: &str, contract: Address, payload: &Bytes) -> Result<TxHash> {
        let rpc = &self.ctx.rpc;

        // A failed attempt may or may not have consumed the previous nonce
        let nonce = rpc.next_nonce(self.ctx.account).await?;
        info!(target: "workflow", "    📝 Preparing {} tx (Nonce: {})...", label, nonce);

        let call = CallRequest {
            from: self.ctx.account,
            to: contract,
            data: payload.clone(),
            nonce,
        };
        let estimate = match rpc.estimate_gas(&call).await {
            Ok(units) => {
                info!(target: "workflow", "    ⛽ Gas estimate: {}", units);
                Some(saturating_u64(units))
            }
            Err(e) => {
                warn!(
                    target: "workflow",
                    "    ⚠️ Gas estimate failed, using default ({}). {}",
                    self.gas.fallback_limit,
                    summarize_error(&e, 40)
                );
                None
            }
        };
        let gas_limit = U256::from(self.gas.limit_for(estimate));
        let gas_price = rpc.gas_price().await?;

        let tx = PreparedTx {
            from: self.ctx.account,
            to: contract,
            data: payload.clone(),
            nonce,
            gas_limit,
            gas_price,
            chain_id: self.ctx.chain_id,
            value: U256::zero(),
        };

        info!(target: "workflow", "    🚀 Sending {} tx...", label);
        let hash = rpc.submit(&tx).await?;
        info!(
            target: "workflow",
            "    ⏳ Waiting for {} confirmation (Tx: {:?})...",
            label, hash
        );

        let confirmation = rpc.wait_for_confirmation(hash, 1).await?;
        if !confirmation.success {
            return Err(TxError::Reverted {
                hash: format!("{:?}", confirmation.hash),
            }
            .into());
        }
        Ok(confirmation.hash)
    }
}

fn saturating_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}

pub fn explorer_link(hash: TxHash) -> String {
    format!("{}{:?}", EXPLORER_TX_URL, hash)
}
