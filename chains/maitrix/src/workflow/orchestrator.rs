use super::operations::OperationRunner;
use crate::faucet::{FaucetCollector, FaucetSummary};
use crate::tokens::{self, mint_payload, ContractRegistry, Token};
use anyhow::{anyhow, Result};
use core_logic::StepOutcome;
use ethers::types::{Address, Bytes};
use std::time::Duration;
use tracing::info;

/// Fixed waits between workflow steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After a significant faucet claim, before spending anything.
    pub settle_after_claim: Duration,
    pub between_steps: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            settle_after_claim: Duration::from_secs(10),
            between_steps: Duration::from_secs(5),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            settle_after_claim: Duration::ZERO,
            between_steps: Duration::ZERO,
        }
    }
}

/// Mint `output` from `input`, then stake what was minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintBlock {
    pub output: Token,
    pub input: Token,
    pub mint_contract: Address,
    pub payload: Bytes,
    pub stake_contract: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeStep {
    pub token: Token,
    pub contract: Address,
}

/// Ordered steps of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowPlan {
    pub mints: Vec<MintBlock>,
    pub stakes: Vec<StakeStep>,
}

impl WorkflowPlan {
    pub fn maitrix(registry: &ContractRegistry) -> Result<Self> {
        let block = |output: Token, input: Token, mint: &str, stake: &str| -> Result<MintBlock> {
            Ok(MintBlock {
                output,
                input,
                mint_contract: registry.address(mint)?,
                payload: mint_payload(output)
                    .ok_or_else(|| anyhow!("No mint payload for {}", output))?,
                stake_contract: registry.address(stake)?,
            })
        };
        let stake = |token: Token, name: &str| -> Result<StakeStep> {
            Ok(StakeStep {
                token,
                contract: registry.address(name)?,
            })
        };

        Ok(Self {
            mints: vec![
                block(Token::Ausd, Token::Ath, tokens::MINT_AUSD, tokens::STAKE_AUSD)?,
                block(Token::Vusd, Token::Virtual, tokens::MINT_VUSD, tokens::STAKE_VUSD)?,
                block(Token::Azusd, Token::Ai16z, tokens::MINT_AZUSD, tokens::STAKE_AZUSD)?,
            ],
            stakes: vec![
                stake(Token::Lvlusd, tokens::STAKE_LVLUSD)?,
                stake(Token::Usde, tokens::STAKE_USDE)?,
                stake(Token::Usd1, tokens::STAKE_USD1)?,
            ],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub label: String,
    pub outcome: StepOutcome,
}

/// Everything that happened in one cycle, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub faucet: Option<FaucetSummary>,
    pub steps: Vec<StepRecord>,
}

impl CycleReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Success { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Failed { .. }))
    }

    pub fn step(&self, label: &str) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|s| s.label == label)
            .map(|s| &s.outcome)
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Cycle finished: {} succeeded, {} skipped, {} failed",
            self.succeeded(),
            self.skipped(),
            self.failed()
        )
    }

    fn count(&self, pred: impl Fn(&StepOutcome) -> bool) -> usize {
        self.steps.iter().filter(|s| pred(&s.outcome)).count()
    }
}

/// Runs one full claim, mint and stake session for the account.
pub struct WorkflowOrchestrator {
    account: Address,
    operations: OperationRunner,
    faucets: Option<FaucetCollector>,
    plan: WorkflowPlan,
    pacing: Pacing,
}

impl WorkflowOrchestrator {
    pub fn new(account: Address, operations: OperationRunner, plan: WorkflowPlan) -> Self {
        Self {
            account,
            operations,
            faucets: None,
            plan,
            pacing: Pacing::default(),
        }
    }

    pub fn with_faucets(mut self, faucets: FaucetCollector) -> Self {
        self.faucets = Some(faucets);
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Never aborts: every step runs to a terminal outcome and the report
    /// lists them in order.
    pub async fn run_cycle(&self) -> CycleReport {
        info!(
            target: "workflow",
            "=== Starting Session for Wallet: {:?} ===",
            self.account
        );
        let mut report = CycleReport::default();

        match &self.faucets {
            Some(collector) => {
                let summary = collector.claim_all(self.account).await;
                if summary.significant {
                    info!(
                        target: "workflow",
                        "Wait {} seconds before next step...",
                        self.pacing.settle_after_claim.as_secs()
                    );
                    pause(self.pacing.settle_after_claim).await;
                }
                report.faucet = Some(summary);
            }
            None => info!(target: "workflow", "Faucet claims disabled, skipping."),
        }

        for block in &self.plan.mints {
            let minted = self
                .operations
                .mint(block.output, block.input, block.mint_contract, &block.payload)
                .await;
            let stake_label = format!("Stake {}", block.output);
            let mint_ok = minted.succeeded();
            report.steps.push(StepRecord {
                label: format!("Mint {}", block.output),
                outcome: minted,
            });

            let staked = if mint_ok {
                pause(self.pacing.between_steps).await;
                self.operations
                    .stake(block.output, block.stake_contract)
                    .await
            } else {
                StepOutcome::skipped(format!("Mint {} did not succeed", block.output))
            };
            report.steps.push(StepRecord {
                label: stake_label,
                outcome: staked,
            });

            pause(self.pacing.between_steps).await;
        }

        for (i, step) in self.plan.stakes.iter().enumerate() {
            if i > 0 {
                pause(self.pacing.between_steps).await;
            }
            let outcome = self.operations.stake(step.token, step.contract).await;
            report.steps.push(StepRecord {
                label: format!("Stake {}", step.token),
                outcome,
            });
        }

        info!(
            target: "workflow",
            "=== Session Done for Wallet: {:?} ===",
            self.account
        );
        report
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
