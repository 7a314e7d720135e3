use super::executor::{explorer_link, TransactionExecutor};
use crate::abi;
use crate::tokens::{format_amount, short_address, Token};
use core_logic::{summarize_error, RetryPolicy, StepOutcome};
use ethers::types::{Address, U256};
use tracing::{error, info};

/// Grants exactly `amount` allowance to a spender, single attempt.
#[derive(Debug, Clone)]
pub struct ApprovalManager {
    executor: TransactionExecutor,
}

impl ApprovalManager {
    pub fn new(executor: TransactionExecutor) -> Self {
        Self { executor }
    }

    pub async fn ensure_approval(
        &self,
        token: Token,
        decimals: u32,
        spender: Address,
        amount: U256,
        purpose: &str,
    ) -> StepOutcome {
        info!(
            target: "workflow",
            "  -> Approving {} {} for {} ({})",
            format_amount(amount, decimals),
            token,
            purpose,
            short_address(spender)
        );

        let payload = match abi::encode_approve(spender, amount) {
            Ok(payload) => payload,
            Err(e) => return StepOutcome::failed(summarize_error(&e, 100)),
        };

        let label = format!("approve {}", token);
        match self
            .executor
            .execute(&label, token.address(), &payload, RetryPolicy::single())
            .await
        {
            Ok(hash) => {
                info!(
                    target: "workflow",
                    "    ✅ Approval for {} SUCCESS ({}).",
                    token,
                    explorer_link(hash)
                );
                StepOutcome::success(format!("{:?}", hash))
            }
            Err(e) => {
                error!(target: "workflow", "    ❌ Failed to approve {}: {}", token, e);
                StepOutcome::failed(format!("approval failed: {}", e))
            }
        }
    }
}
