//! # Ethers Chain Client
//!
//! [`ChainClient`] implementation over an ethers-rs HTTP provider.
//!
//! Connecting performs the chain id query, which doubles as the
//! connectivity check; the fee model is probed once per connection via
//! [`ChainClient::probe_profile`].

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::Signer;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{
    Address, BlockNumber, Bytes, Eip1559TransactionRequest, H256,
    TransactionRequest as LegacyRequest, U256,
};
use std::sync::Arc;
use std::time::Duration;

use super::client::{BlockSnapshot, ChainClient, ChainError, ChainResult, TxHash, TxReceipt};
use crate::domain::fee::FeeParams;
use crate::domain::transaction::{CallTarget, PreparedCall, TransactionRequest};
use crate::infrastructure::signer::Account;

/// Receipt polling schedule for confirmation waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPoll {
    /// Delay between polls.
    pub interval: Duration,
    /// Maximum number of polls before giving up.
    pub max_attempts: u32,
}

impl Default for ReceiptPoll {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 100,
        }
    }
}

/// Chain client over an ethers-rs `Provider<Http>`.
#[derive(Debug, Clone)]
pub struct EthersChainClient {
    provider: Arc<Provider<Http>>,
    chain_id: u64,
    poll: ReceiptPoll,
}

impl EthersChainClient {
    /// Connects to an RPC endpoint and queries its chain id.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Connection`] if the provider cannot be
    /// created or the endpoint does not answer the chain id query.
    pub async fn connect(rpc_url: &str, poll: ReceiptPoll) -> ChainResult<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ChainError::connection(e.to_string()))?;
        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| ChainError::connection(e.to_string()))?
            .as_u64();

        Ok(Self {
            provider: Arc::new(provider),
            chain_id,
            poll,
        })
    }

    fn parse_address(address: &str) -> ChainResult<Address> {
        address
            .parse()
            .map_err(|_| ChainError::invalid_address(address.to_string()))
    }

    fn unsigned_call(call: &PreparedCall, from: Address) -> ChainResult<TypedTransaction> {
        let mut tx = LegacyRequest::new()
            .from(from)
            .value(U256::from(call.value))
            .data(Bytes::from(call.data.clone()));
        if let CallTarget::Address(to) = &call.target {
            tx = tx.to(Self::parse_address(to)?);
        }
        Ok(tx.into())
    }

    fn typed_transaction(request: &TransactionRequest, from: Address) -> ChainResult<TypedTransaction> {
        let to = match &request.call.target {
            CallTarget::Deploy => None,
            CallTarget::Address(addr) => Some(Self::parse_address(addr)?),
        };

        let typed = match request.fee_quote.params {
            FeeParams::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                let mut tx = Eip1559TransactionRequest::new()
                    .from(from)
                    .value(U256::from(request.call.value))
                    .data(Bytes::from(request.call.data.clone()))
                    .nonce(request.nonce)
                    .gas(request.fee_quote.gas_limit)
                    .max_fee_per_gas(max_fee_per_gas)
                    .max_priority_fee_per_gas(max_priority_fee_per_gas)
                    .chain_id(request.chain_id);
                if let Some(to) = to {
                    tx = tx.to(to);
                }
                TypedTransaction::Eip1559(tx)
            }
            FeeParams::Legacy { gas_price } => {
                let mut tx = LegacyRequest::new()
                    .from(from)
                    .value(U256::from(request.call.value))
                    .data(Bytes::from(request.call.data.clone()))
                    .nonce(request.nonce)
                    .gas(request.fee_quote.gas_limit)
                    .gas_price(gas_price)
                    .chain_id(request.chain_id);
                if let Some(to) = to {
                    tx = tx.to(to);
                }
                TypedTransaction::Legacy(tx)
            }
        };
        Ok(typed)
    }
}

#[async_trait]
impl ChainClient for EthersChainClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_balance(&self, address: &str) -> ChainResult<u128> {
        let addr = Self::parse_address(address)?;
        self.provider
            .get_balance(addr, None)
            .await
            .map(|b| b.as_u128())
            .map_err(|e| ChainError::rpc(e.to_string()))
    }

    async fn get_transaction_count(&self, address: &str) -> ChainResult<u64> {
        let addr = Self::parse_address(address)?;
        self.provider
            .get_transaction_count(addr, None)
            .await
            .map(|n| n.as_u64())
            .map_err(|e| ChainError::rpc(e.to_string()))
    }

    async fn latest_block(&self) -> ChainResult<BlockSnapshot> {
        let block = self
            .provider
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| ChainError::rpc(e.to_string()))?
            .ok_or_else(|| ChainError::rpc("no latest block returned".to_string()))?;

        Ok(BlockSnapshot {
            number: block.number.unwrap_or_default().as_u64(),
            base_fee_per_gas: block.base_fee_per_gas.map(|f| f.as_u64()),
            extra_data_len: block.extra_data.len(),
        })
    }

    async fn max_priority_fee(&self) -> ChainResult<u64> {
        self.provider
            .request::<_, U256>("eth_maxPriorityFeePerGas", ())
            .await
            .map(|f| f.as_u64())
            .map_err(|e| ChainError::rpc(e.to_string()))
    }

    async fn get_gas_price(&self) -> ChainResult<u64> {
        self.provider
            .get_gas_price()
            .await
            .map(|p| p.as_u64())
            .map_err(|e| ChainError::rpc(e.to_string()))
    }

    async fn estimate_gas(&self, call: &PreparedCall, from: &str) -> ChainResult<u64> {
        let from = Self::parse_address(from)?;
        let tx = Self::unsigned_call(call, from)?;
        self.provider
            .estimate_gas(&tx, None)
            .await
            .map(|g| g.as_u64())
            .map_err(|e| ChainError::gas_estimation(e.to_string()))
    }

    async fn submit(&self, request: &TransactionRequest, account: &Account) -> ChainResult<TxHash> {
        let from = Self::parse_address(&request.from)?;
        let typed = Self::typed_transaction(request, from)?;

        let signer = account.wallet().clone().with_chain_id(request.chain_id);
        let signature = signer
            .sign_transaction(&typed)
            .await
            .map_err(|e| ChainError::submission(e.to_string()))?;
        let raw = typed.rlp_signed(&signature);

        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| ChainError::submission(e.to_string()))?;
        Ok(TxHash::new(format!("{:#x}", pending.tx_hash())))
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> ChainResult<TxReceipt> {
        let hash: H256 = tx_hash
            .as_str()
            .parse()
            .map_err(|_| ChainError::confirmation(format!("invalid tx hash: {tx_hash}")))?;

        for _ in 0..self.poll.max_attempts {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| ChainError::rpc(e.to_string()))?;

            if let Some(receipt) = receipt {
                return Ok(TxReceipt {
                    tx_hash: tx_hash.clone(),
                    block_number: receipt.block_number.unwrap_or_default().as_u64(),
                    gas_used: receipt.gas_used.unwrap_or_default().as_u64(),
                    contract_address: receipt
                        .contract_address
                        .map(|a| ethers::utils::to_checksum(&a, None)),
                    success: receipt.status.map(|s| s.as_u64() == 1).unwrap_or(false),
                });
            }
            tokio::time::sleep(self.poll.interval).await;
        }

        Err(ChainError::confirmation(format!(
            "no receipt for {tx_hash} after {} polls",
            self.poll.max_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_poll_default_is_bounded() {
        let poll = ReceiptPoll::default();
        assert_eq!(poll.interval, Duration::from_secs(3));
        assert_eq!(poll.max_attempts, 100);
    }

    #[test]
    fn parse_address_rejects_garbage() {
        assert!(EthersChainClient::parse_address("not-an-address").is_err());
        assert!(
            EthersChainClient::parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").is_ok()
        );
    }
}
