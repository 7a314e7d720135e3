#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use core_logic::RetryPolicy;
use ethers::types::{Address, TxHash, U256};
use maitrix_bot::abi;
use maitrix_bot::faucet::{FaucetClient, FaucetResponse, FaucetTarget};
use maitrix_bot::rpc::{AccountContext, CallRequest, ChainRpc, Confirmation, PreparedTx};
use maitrix_bot::tokens::{Token, CHAIN_ID};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn account() -> Address {
    Address::repeat_byte(0xaa)
}

/// `n` whole tokens at 18 decimals.
pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

/// Mint policy with the real attempt budget and no pauses.
pub fn fast_mint_policy() -> RetryPolicy {
    RetryPolicy::mint().with_backoff(Duration::ZERO, Duration::ZERO)
}

/// Balance change applied when a call to a contract confirms.
#[derive(Debug, Clone, Copy)]
pub enum Effect {
    Credit(Token, U256),
    Debit(Token, U256),
    Drain(Token),
}

#[derive(Default)]
struct ChainState {
    balances: HashMap<Token, U256>,
    decimals: HashMap<Token, u8>,
    estimate: Option<U256>,
    failing_balance_reads: HashSet<Token>,
    reverting: HashSet<Address>,
    effects: HashMap<Address, Vec<Effect>>,
    nonce: u64,
    submitted: Vec<PreparedTx>,
    outcomes: HashMap<TxHash, bool>,
    estimated: Vec<CallRequest>,
    gas_price_reads: usize,
    confirmation_requests: Vec<usize>,
}

/// In-memory chain for one account.
pub struct FakeChain {
    state: Mutex<ChainState>,
}

impl FakeChain {
    pub fn new() -> Self {
        let state = ChainState {
            estimate: Some(U256::from(100_000u64)),
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn with_balance(self, token: Token, amount: U256) -> Self {
        self.state.lock().unwrap().balances.insert(token, amount);
        self
    }

    pub fn with_decimals(self, token: Token, decimals: u8) -> Self {
        self.state.lock().unwrap().decimals.insert(token, decimals);
        self
    }

    pub fn with_estimate(self, units: u64) -> Self {
        self.state.lock().unwrap().estimate = Some(U256::from(units));
        self
    }

    pub fn failing_estimates(self) -> Self {
        self.state.lock().unwrap().estimate = None;
        self
    }

    pub fn failing_balance_read(self, token: Token) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_balance_reads
            .insert(token);
        self
    }

    /// Calls to `contract` are mined with a failed status.
    pub fn reverting(self, contract: Address) -> Self {
        self.state.lock().unwrap().reverting.insert(contract);
        self
    }

    pub fn on_call(self, contract: Address, effect: Effect) -> Self {
        self.state
            .lock()
            .unwrap()
            .effects
            .entry(contract)
            .or_default()
            .push(effect);
        self
    }

    pub fn into_ctx(self) -> (Arc<FakeChain>, AccountContext) {
        let chain = Arc::new(self);
        let ctx = AccountContext::new(account(), CHAIN_ID, chain.clone());
        (chain, ctx)
    }

    pub fn balance(&self, token: Token) -> U256 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&token)
            .copied()
            .unwrap_or_default()
    }

    pub fn submitted(&self) -> Vec<PreparedTx> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn submissions_to(&self, contract: Address) -> usize {
        self.submitted().iter().filter(|tx| tx.to == contract).count()
    }

    /// (token contract, spender, amount) of every approve sent.
    pub fn approvals(&self) -> Vec<(Address, Address, U256)> {
        self.submitted()
            .iter()
            .filter(|tx| abi::is_approve(&tx.data))
            .map(|tx| {
                let (spender, amount) = abi::decode_approve(&tx.data).unwrap();
                (tx.to, spender, amount)
            })
            .collect()
    }

    /// (staking contract, amount) of every stake sent.
    pub fn stakes(&self) -> Vec<(Address, U256)> {
        self.submitted()
            .iter()
            .filter(|tx| abi::is_stake(&tx.data))
            .map(|tx| (tx.to, abi::decode_stake(&tx.data).unwrap()))
            .collect()
    }

    pub fn estimated(&self) -> Vec<CallRequest> {
        self.state.lock().unwrap().estimated.clone()
    }

    pub fn gas_price_reads(&self) -> usize {
        self.state.lock().unwrap().gas_price_reads
    }

    /// Confirmation depth asked for by every wait, in order.
    pub fn confirmation_requests(&self) -> Vec<usize> {
        self.state.lock().unwrap().confirmation_requests.clone()
    }

    fn token_at(address: Address) -> Option<Token> {
        Token::ALL.iter().copied().find(|t| t.address() == address)
    }
}

#[async_trait]
impl ChainRpc for FakeChain {
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let token = Self::token_at(token).ok_or_else(|| anyhow!("unknown token {:?}", token))?;
        let state = self.state.lock().unwrap();
        if state.failing_balance_reads.contains(&token) {
            return Err(anyhow!("execution reverted: balanceOf"));
        }
        if owner != account() {
            return Ok(U256::zero());
        }
        Ok(state.balances.get(&token).copied().unwrap_or_default())
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        let token = Self::token_at(token).ok_or_else(|| anyhow!("unknown token {:?}", token))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .decimals
            .get(&token)
            .copied()
            .unwrap_or(token.descriptor().decimals))
    }

    async fn estimate_gas(&self, call: &CallRequest) -> Result<U256> {
        let mut state = self.state.lock().unwrap();
        state.estimated.push(call.clone());
        state
            .estimate
            .ok_or_else(|| anyhow!("execution reverted: estimateGas"))
    }

    async fn gas_price(&self) -> Result<U256> {
        self.state.lock().unwrap().gas_price_reads += 1;
        Ok(U256::from(100_000_000u64))
    }

    async fn next_nonce(&self, _account: Address) -> Result<U256> {
        Ok(U256::from(self.state.lock().unwrap().nonce))
    }

    async fn submit(&self, tx: &PreparedTx) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        state.nonce += 1;
        state.submitted.push(tx.clone());
        let hash = TxHash::from_low_u64_be(state.submitted.len() as u64);

        let success = !state.reverting.contains(&tx.to);
        if success {
            let effects = state.effects.get(&tx.to).cloned().unwrap_or_default();
            for effect in effects {
                match effect {
                    Effect::Credit(token, amount) => {
                        let balance = state.balances.entry(token).or_default();
                        *balance = balance.saturating_add(amount);
                    }
                    Effect::Debit(token, amount) => {
                        let balance = state.balances.entry(token).or_default();
                        *balance = balance.saturating_sub(amount);
                    }
                    Effect::Drain(token) => {
                        state.balances.insert(token, U256::zero());
                    }
                }
            }
        }
        state.outcomes.insert(hash, success);
        Ok(hash)
    }

    async fn wait_for_confirmation(
        &self,
        hash: TxHash,
        confirmations: usize,
    ) -> Result<Confirmation> {
        let mut state = self.state.lock().unwrap();
        state.confirmation_requests.push(confirmations);
        let success = *state
            .outcomes
            .get(&hash)
            .ok_or_else(|| anyhow!("transaction {:?} dropped", hash))?;
        Ok(Confirmation { hash, success })
    }
}

/// Faucet answering from a script keyed by URL; unscripted targets fail.
#[derive(Default)]
pub struct FakeFaucet {
    responses: HashMap<&'static str, std::result::Result<FaucetResponse, String>>,
    visited: Mutex<Vec<&'static str>>,
}

impl FakeFaucet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &'static str, status: u16, body: Option<serde_json::Value>) -> Self {
        self.responses
            .insert(url, Ok(FaucetResponse { status, body }));
        self
    }

    pub fn fail(mut self, url: &'static str, message: &str) -> Self {
        self.responses.insert(url, Err(message.to_string()));
        self
    }

    pub fn visited(&self) -> Vec<&'static str> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl FaucetClient for FakeFaucet {
    async fn post_claim(&self, target: &FaucetTarget, _address: Address) -> Result<FaucetResponse> {
        self.visited.lock().unwrap().push(target.url);
        match self.responses.get(target.url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(anyhow!("{}", message)),
            None => Err(anyhow!("No response from server.")),
        }
    }
}
