//! # Scripted Chain Client
//!
//! In-memory [`ChainClient`] implementation for tests.
//!
//! Responses are scripted up front and submissions are recorded, so tests
//! can drive the full build-submit-confirm pipeline without an RPC
//! endpoint or a live network.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use tokio::sync::Mutex;

use super::client::{BlockSnapshot, ChainClient, ChainError, ChainResult, TxHash, TxReceipt};
use crate::domain::transaction::{CallTarget, PreparedCall, TransactionRequest};
use crate::domain::units::WEI_PER_ETHER;
use crate::infrastructure::signer::Account;

/// Contract address reported for scripted deployment receipts.
pub const MOCK_CONTRACT_ADDRESS: &str = "0x00000000000000000000000000000000DeaDBeef";

#[derive(Debug)]
struct MockState {
    balance: u128,
    transaction_count: u64,
    block: BlockSnapshot,
    block_unavailable: bool,
    base_fee_schedule: VecDeque<u64>,
    priority_fee: Option<u64>,
    gas_price: u64,
    gas_estimate: Option<u64>,
    failing_nonces: HashSet<u64>,
    reverting_nonces: HashSet<u64>,
    submitted: Vec<TransactionRequest>,
}

/// Scripted implementation of [`ChainClient`].
///
/// Defaults to a well-funded account on an EIP-1559 chain; individual
/// responses are overridden with the `with_*` builders.
#[derive(Debug)]
pub struct MockChainClient {
    chain_id: u64,
    state: Mutex<MockState>,
}

impl MockChainClient {
    /// Creates a scripted client for the given chain id.
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            state: Mutex::new(MockState {
                balance: WEI_PER_ETHER,
                transaction_count: 0,
                block: BlockSnapshot {
                    number: 100,
                    base_fee_per_gas: Some(10_000_000_000),
                    extra_data_len: 32,
                },
                block_unavailable: false,
                base_fee_schedule: VecDeque::new(),
                priority_fee: Some(2_000_000_000),
                gas_price: 20_000_000_000,
                gas_estimate: Some(50_000),
                failing_nonces: HashSet::new(),
                reverting_nonces: HashSet::new(),
                submitted: Vec::new(),
            }),
        }
    }

    /// Sets the account balance in wei.
    #[must_use]
    pub fn with_balance(mut self, balance: u128) -> Self {
        self.state.get_mut().balance = balance;
        self
    }

    /// Sets the on-chain transaction count.
    #[must_use]
    pub fn with_transaction_count(mut self, count: u64) -> Self {
        self.state.get_mut().transaction_count = count;
        self
    }

    /// Sets the latest block snapshot.
    #[must_use]
    pub fn with_block(mut self, block: BlockSnapshot) -> Self {
        self.state.get_mut().block = block;
        self
    }

    /// Makes every latest-block query fail, as on an endpoint that stops
    /// answering after the connection check.
    #[must_use]
    pub fn failing_block(mut self) -> Self {
        self.state.get_mut().block_unavailable = true;
        self
    }

    /// Scripts a base fee per latest-block query, consumed in order; once
    /// exhausted the static block's base fee applies again. Lets a test
    /// observe base-fee drift between transactions of one burst.
    #[must_use]
    pub fn with_base_fee_schedule(mut self, base_fees: Vec<u64>) -> Self {
        self.state.get_mut().base_fee_schedule = base_fees.into();
        self
    }

    /// Sets the suggested priority fee; `None` makes the query fail, as on
    /// nodes without `eth_maxPriorityFeePerGas`.
    #[must_use]
    pub fn with_priority_fee(mut self, fee: Option<u64>) -> Self {
        self.state.get_mut().priority_fee = fee;
        self
    }

    /// Sets the suggested legacy gas price in wei.
    #[must_use]
    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.state.get_mut().gas_price = gas_price;
        self
    }

    /// Sets the raw gas estimate; `None` makes estimation fail, as for a
    /// call that would revert.
    #[must_use]
    pub fn with_gas_estimate(mut self, estimate: Option<u64>) -> Self {
        self.state.get_mut().gas_estimate = estimate;
        self
    }

    /// Makes submission fail for the given nonce.
    #[must_use]
    pub fn failing_submission_at(mut self, nonce: u64) -> Self {
        self.state.get_mut().failing_nonces.insert(nonce);
        self
    }

    /// Makes the receipt for the given nonce report on-chain failure.
    #[must_use]
    pub fn reverting_at(mut self, nonce: u64) -> Self {
        self.state.get_mut().reverting_nonces.insert(nonce);
        self
    }

    /// Returns the requests broadcast so far, in submission order.
    pub async fn submitted(&self) -> Vec<TransactionRequest> {
        self.state.lock().await.submitted.clone()
    }

    /// Returns the nonces of the requests broadcast so far.
    pub async fn submitted_nonces(&self) -> Vec<u64> {
        self.state
            .lock()
            .await
            .submitted
            .iter()
            .map(|r| r.nonce)
            .collect()
    }

    /// Updates the balance mid-test, e.g. to mimic drift within a burst.
    pub async fn set_balance(&self, balance: u128) {
        self.state.lock().await.balance = balance;
    }

    fn hash_for_nonce(nonce: u64) -> TxHash {
        TxHash::new(format!("0xmock{nonce}"))
    }

    fn nonce_from_hash(hash: &TxHash) -> Option<u64> {
        hash.as_str().strip_prefix("0xmock")?.parse().ok()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_balance(&self, _address: &str) -> ChainResult<u128> {
        Ok(self.state.lock().await.balance)
    }

    async fn get_transaction_count(&self, _address: &str) -> ChainResult<u64> {
        Ok(self.state.lock().await.transaction_count)
    }

    async fn latest_block(&self) -> ChainResult<BlockSnapshot> {
        let mut state = self.state.lock().await;
        if state.block_unavailable {
            return Err(ChainError::rpc("latest block unavailable"));
        }
        if let Some(base_fee) = state.base_fee_schedule.pop_front() {
            state.block.base_fee_per_gas = Some(base_fee);
        }
        Ok(state.block)
    }

    async fn max_priority_fee(&self) -> ChainResult<u64> {
        self.state
            .lock()
            .await
            .priority_fee
            .ok_or_else(|| ChainError::rpc("method eth_maxPriorityFeePerGas not found"))
    }

    async fn get_gas_price(&self) -> ChainResult<u64> {
        Ok(self.state.lock().await.gas_price)
    }

    async fn estimate_gas(&self, _call: &PreparedCall, _from: &str) -> ChainResult<u64> {
        self.state
            .lock()
            .await
            .gas_estimate
            .ok_or_else(|| ChainError::gas_estimation("execution reverted"))
    }

    async fn submit(&self, request: &TransactionRequest, _account: &Account) -> ChainResult<TxHash> {
        let mut state = self.state.lock().await;
        if state.failing_nonces.contains(&request.nonce) {
            return Err(ChainError::submission(format!(
                "broadcast rejected at nonce {}",
                request.nonce
            )));
        }
        state.submitted.push(request.clone());
        Ok(Self::hash_for_nonce(request.nonce))
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> ChainResult<TxReceipt> {
        let state = self.state.lock().await;
        let nonce = Self::nonce_from_hash(tx_hash)
            .ok_or_else(|| ChainError::confirmation(format!("unknown tx hash: {tx_hash}")))?;
        let request = state
            .submitted
            .iter()
            .find(|r| r.nonce == nonce)
            .ok_or_else(|| ChainError::confirmation(format!("no receipt for {tx_hash}")))?;

        let contract_address = match request.call.target {
            CallTarget::Deploy => Some(MOCK_CONTRACT_ADDRESS.to_string()),
            CallTarget::Address(_) => None,
        };

        Ok(TxReceipt {
            tx_hash: tx_hash.clone(),
            block_number: state.block.number + 1 + nonce,
            gas_used: request.fee_quote.gas_limit,
            contract_address,
            success: !state.reverting_nonces.contains(&nonce),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let hash = MockChainClient::hash_for_nonce(42);
        assert_eq!(MockChainClient::nonce_from_hash(&hash), Some(42));
        assert_eq!(MockChainClient::nonce_from_hash(&TxHash::new("0xdead")), None);
    }

    #[tokio::test]
    async fn scripted_block_failure() {
        let client = MockChainClient::new(1).failing_block();
        assert!(client.latest_block().await.is_err());
    }

    #[tokio::test]
    async fn base_fee_schedule_is_consumed_in_order() {
        let client = MockChainClient::new(1).with_base_fee_schedule(vec![7, 8]);
        assert_eq!(client.latest_block().await.unwrap().base_fee_per_gas, Some(7));
        assert_eq!(client.latest_block().await.unwrap().base_fee_per_gas, Some(8));
        // exhausted: the last scripted fee sticks
        assert_eq!(client.latest_block().await.unwrap().base_fee_per_gas, Some(8));
    }

    #[tokio::test]
    async fn scripted_priority_fee_failure() {
        let client = MockChainClient::new(1).with_priority_fee(None);
        assert!(client.max_priority_fee().await.is_err());
    }

    #[tokio::test]
    async fn scripted_estimation_failure() {
        let client = MockChainClient::new(1).with_gas_estimate(None);
        let call = PreparedCall::transfer("0xabc", 1);
        assert!(client.estimate_gas(&call, "0xabc").await.is_err());
    }
}
