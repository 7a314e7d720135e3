use crate::rpc::AccountContext;
use crate::tokens::{format_amount, whole_units, Token};
use core_logic::summarize_error;
use ethers::types::U256;
use tracing::{error, info};

/// Live balance of one token, with the decimals used to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holding {
    pub token: Token,
    pub balance: U256,
    pub decimals: u32,
}

impl Holding {
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero()
    }

    pub fn covers(&self, amount: U256) -> bool {
        self.balance >= amount
    }

    /// `n` whole tokens at this holding's decimals, if representable.
    pub fn whole(&self, n: u64) -> Option<U256> {
        whole_units(n, self.decimals)
    }

    pub fn format(&self, amount: U256) -> String {
        format_amount(amount, self.decimals)
    }

    pub fn formatted_balance(&self) -> String {
        self.format(self.balance)
    }
}

/// Answers "how much of token X does the account hold right now".
#[derive(Debug, Clone)]
pub struct TokenLedgerGate {
    ctx: AccountContext,
}

impl TokenLedgerGate {
    pub fn new(ctx: AccountContext) -> Self {
        Self { ctx }
    }

    /// Reads the balance and the contract's decimals. A failed balance read
    /// counts as zero so the caller skips; a failed decimals read falls back
    /// to the static table.
    pub async fn holding(&self, token: Token, purpose: &str) -> Holding {
        let descriptor = token.descriptor();
        info!(target: "workflow", "  -> Checking {} balance for {}", token, purpose);

        let mut decimals = descriptor.decimals as u32;
        match self.ctx.rpc.decimals(descriptor.address).await {
            Ok(live) if live as u32 != decimals => {
                info!(
                    target: "workflow",
                    "     (Info: contract decimals {} = {}, using contract)",
                    token, live
                );
                decimals = live as u32;
            }
            _ => {}
        }

        let balance = match self
            .ctx
            .rpc
            .balance_of(descriptor.address, self.ctx.account)
            .await
        {
            Ok(balance) => balance,
            Err(e) => {
                error!(
                    target: "workflow",
                    "    ❌ Failed to check balance {}: {}",
                    token,
                    summarize_error(&e, 100)
                );
                U256::zero()
            }
        };

        let holding = Holding {
            token,
            balance,
            decimals,
        };
        info!(
            target: "workflow",
            "     Balance {}: {} {}",
            token,
            holding.formatted_balance(),
            token
        );
        holding
    }
}
