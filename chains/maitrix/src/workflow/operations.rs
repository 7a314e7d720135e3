use super::approval::ApprovalManager;
use super::executor::{explorer_link, TransactionExecutor};
use super::gate::{Holding, TokenLedgerGate};
use crate::abi;
use crate::rpc::AccountContext;
use crate::tokens::Token;
use core_logic::{summarize_error, GasConfig, RetryPolicy, StepOutcome};
use ethers::types::{Address, Bytes, U256};
use tracing::{error, info, warn};

/// How much of the input token a mint approves and spends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintAmount {
    /// Whole balance, but only once it reaches this many whole tokens.
    BalanceAtLeast(u64),
    /// Exactly this many whole tokens.
    Fixed(u64),
    /// Whole balance; only an empty balance is refused.
    FullBalance,
}

impl MintAmount {
    pub fn for_input(input: Token) -> Self {
        match input {
            Token::Ai16z => MintAmount::BalanceAtLeast(5),
            Token::Ath => MintAmount::Fixed(50),
            Token::Virtual => MintAmount::Fixed(2),
            _ => MintAmount::FullBalance,
        }
    }

    /// Amount to approve for `holding`, or why the mint must be skipped.
    pub fn resolve(self, holding: &Holding) -> Result<U256, String> {
        let token = holding.token;
        let whole = |n: u64| {
            holding.whole(n).ok_or_else(|| {
                format!(
                    "{} {} cannot be expressed at {} decimals",
                    n, token, holding.decimals
                )
            })
        };
        match self {
            MintAmount::BalanceAtLeast(minimum) => {
                if holding.covers(whole(minimum)?) && !holding.is_empty() {
                    Ok(holding.balance)
                } else {
                    Err(format!(
                        "Balance {} ({}) < {}",
                        token,
                        holding.formatted_balance(),
                        minimum
                    ))
                }
            }
            MintAmount::Fixed(amount) => {
                let required = whole(amount)?;
                if holding.covers(required) && !holding.is_empty() {
                    Ok(required)
                } else {
                    Err(format!(
                        "Balance {} ({}) < required {}",
                        token,
                        holding.formatted_balance(),
                        amount
                    ))
                }
            }
            MintAmount::FullBalance => {
                if holding.is_empty() {
                    Err(format!("Balance {} is 0", token))
                } else {
                    Ok(holding.balance)
                }
            }
        }
    }
}

/// Named on-chain operations built from the gate, approvals and executor.
#[derive(Debug, Clone)]
pub struct OperationRunner {
    gate: TokenLedgerGate,
    approvals: ApprovalManager,
    executor: TransactionExecutor,
    mint_policy: RetryPolicy,
}

impl OperationRunner {
    pub fn new(ctx: AccountContext, gas: GasConfig) -> Self {
        let executor = TransactionExecutor::new(ctx.clone(), gas);
        Self {
            gate: TokenLedgerGate::new(ctx),
            approvals: ApprovalManager::new(executor.clone()),
            executor,
            mint_policy: RetryPolicy::mint(),
        }
    }

    pub fn with_mint_policy(mut self, policy: RetryPolicy) -> Self {
        self.mint_policy = policy;
        self
    }

    /// Converts `input` into `output` through `contract`. Success only on a
    /// confirmed mint; a skipped or failed mint must not be followed by its
    /// stake.
    pub async fn mint(
        &self,
        output: Token,
        input: Token,
        contract: Address,
        payload: &Bytes,
    ) -> StepOutcome {
        let label = format!("Mint {}", output);
        info!(target: "workflow", "--- {} from {} ---", label, input);

        let holding = self.gate.holding(input, &label).await;
        let amount = match MintAmount::for_input(input).resolve(&holding) {
            Ok(amount) => amount,
            Err(reason) => {
                warn!(target: "workflow", "    🟡 {}. Skipping mint {}.", reason, output);
                end_section(&label, false);
                return StepOutcome::skipped(reason);
            }
        };

        let approval = self
            .approvals
            .ensure_approval(input, holding.decimals, contract, amount, &label)
            .await;
        if !approval.succeeded() {
            end_section(&label, false);
            return approval;
        }

        let outcome = match self
            .executor
            .execute(&label, contract, payload, self.mint_policy)
            .await
        {
            Ok(hash) => {
                info!(
                    target: "workflow",
                    "  ✅ {} SUCCESS ({}).",
                    label,
                    explorer_link(hash)
                );
                StepOutcome::success(format!("{:?}", hash))
            }
            Err(e) => {
                error!(target: "workflow", "  ❌ {} FAILED: {}", label, e);
                StepOutcome::failed(e.to_string())
            }
        };

        end_section(&label, outcome.succeeded());
        if outcome.succeeded() {
            self.gate
                .holding(output, &format!("After {}", label))
                .await;
        }
        outcome
    }

    /// Deposits the whole live balance of `token` into `contract`.
    pub async fn stake(&self, token: Token, contract: Address) -> StepOutcome {
        let label = format!("Stake {}", token);
        info!(target: "workflow", "--- Staking {} ---", token);

        let holding = self.gate.holding(token, &label).await;
        if holding.is_empty() {
            warn!(target: "workflow", "    🟡 Balance {} = 0, skipping staking.", token);
            end_section(&label, false);
            return StepOutcome::skipped(format!("Balance {} is 0", token));
        }

        let approval = self
            .approvals
            .ensure_approval(token, holding.decimals, contract, holding.balance, &label)
            .await;
        if !approval.succeeded() {
            end_section(&label, false);
            return approval;
        }

        info!(
            target: "workflow",
            "  -> Staking {} {}...",
            holding.formatted_balance(),
            token
        );
        let payload = match abi::encode_stake(holding.balance) {
            Ok(payload) => payload,
            Err(e) => {
                end_section(&label, false);
                return StepOutcome::failed(summarize_error(&e, 100));
            }
        };

        let outcome = match self
            .executor
            .execute(&label, contract, &payload, RetryPolicy::single())
            .await
        {
            Ok(hash) => {
                info!(
                    target: "workflow",
                    "  ✅ {} SUCCESS ({}).",
                    label,
                    explorer_link(hash)
                );
                StepOutcome::success(format!("{:?}", hash))
            }
            Err(e) => {
                error!(target: "workflow", "  ❌ {} FAILED: {}", label, e);
                StepOutcome::failed(e.to_string())
            }
        };

        end_section(&label, outcome.succeeded());
        outcome
    }
}

fn end_section(label: &str, success: bool) {
    if success {
        info!(target: "workflow", "--- End {} ---", label);
    } else {
        info!(target: "workflow", "--- End {} (Failed/Skipped) ---", label);
    }
}
