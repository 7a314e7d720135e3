//! Narrow view of the chain used by the workflow: token reads, gas, nonces,
//! submission and confirmation. Implemented over ethers by [`EthersRpc`].

use anyhow::Result;
use async_trait::async_trait;
use ethers::types::{Address, Bytes, TxHash, U256};
use std::sync::Arc;

pub mod provider;

pub use provider::EthersRpc;

/// Call shape used for gas estimation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub nonce: U256,
}

/// Fully specified legacy transaction ready for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTx {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub nonce: U256,
    pub gas_limit: U256,
    pub gas_price: U256,
    pub chain_id: u64,
    pub value: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub hash: TxHash,
    pub success: bool,
}

#[async_trait]
pub trait ChainRpc: Send + Sync {
    async fn balance_of(&self, token: Address, account: Address) -> Result<U256>;

    async fn decimals(&self, token: Address) -> Result<u8>;

    async fn estimate_gas(&self, call: &CallRequest) -> Result<U256>;

    async fn gas_price(&self) -> Result<U256>;

    /// Next nonce for `account`, pending transactions included.
    async fn next_nonce(&self, account: Address) -> Result<U256>;

    async fn submit(&self, tx: &PreparedTx) -> Result<TxHash>;

    async fn wait_for_confirmation(&self, hash: TxHash, confirmations: usize)
        -> Result<Confirmation>;
}

/// Everything a component needs to act for one account. Cloned freely; the
/// RPC handle is shared.
#[derive(Clone)]
pub struct AccountContext {
    pub account: Address,
    pub chain_id: u64,
    pub rpc: Arc<dyn ChainRpc>,
}

impl AccountContext {
    pub fn new(account: Address, chain_id: u64, rpc: Arc<dyn ChainRpc>) -> Self {
        Self {
            account,
            chain_id,
            rpc,
        }
    }
}

impl std::fmt::Debug for AccountContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountContext")
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}
