use super::{ChainRpc, CallRequest, Confirmation, PreparedTx};
use crate::abi;
use anyhow::{Context, Result};
use async_trait::async_trait;
use core_logic::{Secret, TxError};
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;

/// [`ChainRpc`] over an HTTP provider with a local signer.
#[derive(Debug)]
pub struct EthersRpc {
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
}

impl EthersRpc {
    pub fn connect(rpc_url: &str, private_key: &Secret, chain_id: u64) -> Result<Self> {
        let provider =
            Provider::<Http>::try_from(rpc_url).context("Failed to create HTTP provider")?;
        let wallet = private_key
            .expose()
            .parse::<LocalWallet>()
            .context("PRIVATE_KEY is not a valid secp256k1 key")?
            .with_chain_id(chain_id);

        Ok(Self {
            client: SignerMiddleware::new(provider, wallet),
        })
    }

    pub fn address(&self) -> Address {
        self.client.address()
    }

    fn read_call(to: Address, data: Bytes) -> TypedTransaction {
        TransactionRequest::new().to(to).data(data).into()
    }
}

#[async_trait]
impl ChainRpc for EthersRpc {
    async fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        let call = Self::read_call(token, abi::encode_balance_of(account)?);
        let output = self
            .client
            .provider()
            .call(&call, None)
            .await
            .context("balanceOf call failed")?;
        abi::decode_balance(&output)
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        let call = Self::read_call(token, abi::encode_decimals()?);
        let output = self
            .client
            .provider()
            .call(&call, None)
            .await
            .context("decimals call failed")?;
        abi::decode_decimals(&output)
    }

    async fn estimate_gas(&self, call: &CallRequest) -> Result<U256> {
        let tx: TypedTransaction = TransactionRequest::new()
            .from(call.from)
            .to(call.to)
            .data(call.data.clone())
            .nonce(call.nonce)
            .into();
        self.client
            .provider()
            .estimate_gas(&tx, None)
            .await
            .context("Gas estimation failed")
    }

    async fn gas_price(&self) -> Result<U256> {
        self.client
            .provider()
            .get_gas_price()
            .await
            .context("Failed to fetch gas price")
    }

    async fn next_nonce(&self, account: Address) -> Result<U256> {
        self.client
            .provider()
            .get_transaction_count(account, Some(BlockNumber::Pending.into()))
            .await
            .context("Failed to fetch nonce")
    }

    async fn submit(&self, tx: &PreparedTx) -> Result<TxHash> {
        let request = TransactionRequest::new()
            .from(tx.from)
            .to(tx.to)
            .data(tx.data.clone())
            .nonce(tx.nonce)
            .gas(tx.gas_limit)
            .gas_price(tx.gas_price)
            .chain_id(tx.chain_id)
            .value(tx.value);

        let pending = self
            .client
            .send_transaction(request, None)
            .await
            .context("Failed to send transaction")?;
        Ok(pending.tx_hash())
    }

    async fn wait_for_confirmation(
        &self,
        hash: TxHash,
        confirmations: usize,
    ) -> Result<Confirmation> {
        let receipt = PendingTransaction::new(hash, self.client.provider())
            .confirmations(confirmations)
            .await
            .context("Failed while waiting for receipt")?
            .ok_or(TxError::Dropped {
                hash: format!("{:?}", hash),
            })?;

        Ok(Confirmation {
            hash: receipt.transaction_hash,
            success: receipt.status == Some(U64::from(1)),
        })
    }
}
