//! # Chain Client Trait
//!
//! Port definition for JSON-RPC interactions with one EVM network.
//!
//! This module defines the [`ChainClient`] trait that abstracts the RPC
//! surface the transaction builder consumes: balance, nonce and block
//! queries, gas estimation, fee queries, signed submission and receipt
//! polling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::domain::classifier::{FeeModel, NetworkProfile, classify_block};
use crate::domain::transaction::{PreparedCall, TransactionRequest};
use crate::infrastructure::signer::Account;

/// Snapshot of the latest block header, reduced to the fields the
/// transaction builder needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    /// Block number.
    pub number: u64,
    /// Base fee per gas in wei, absent on legacy chains.
    pub base_fee_per_gas: Option<u64>,
    /// Length of the header `extraData` field in bytes.
    pub extra_data_len: usize,
}

/// Transaction hash (0x-prefixed hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    /// Creates a new transaction hash.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction receipt with inclusion details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block number where the transaction was included.
    pub block_number: u64,
    /// Gas actually used.
    pub gas_used: u64,
    /// Address of the deployed contract, for deployment transactions.
    pub contract_address: Option<String>,
    /// Whether the transaction succeeded on-chain.
    pub success: bool,
}

/// Error type for chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC endpoint unreachable or connection setup failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// An RPC query failed.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// An address failed to parse.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Gas estimation rejected by the node, e.g. the call would revert.
    #[error("gas estimation error: {0}")]
    GasEstimation(String),

    /// Signing or broadcasting a transaction failed.
    #[error("submission error: {0}")]
    Submission(String),

    /// The transaction was not confirmed within the polling budget.
    #[error("confirmation error: {0}")]
    Confirmation(String),
}

impl ChainError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an RPC error.
    #[must_use]
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Creates an invalid address error.
    #[must_use]
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    /// Creates a gas estimation error.
    #[must_use]
    pub fn gas_estimation(msg: impl Into<String>) -> Self {
        Self::GasEstimation(msg.into())
    }

    /// Creates a submission error.
    #[must_use]
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Creates a confirmation error.
    #[must_use]
    pub fn confirmation(msg: impl Into<String>) -> Self {
        Self::Confirmation(msg.into())
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Trait for JSON-RPC interactions with one network.
///
/// One instance is connected per network; the fee model for the network
/// is decided once from [`ChainClient::latest_block`] and cached in a
/// `NetworkProfile`, not re-derived per call.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the numeric chain id the client is connected to.
    fn chain_id(&self) -> u64;

    /// Probes the latest block and builds the per-run [`NetworkProfile`].
    ///
    /// A failed probe classifies the network as legacy; legacy parameters
    /// are accepted everywhere.
    async fn probe_profile(
        &self,
        name: &str,
        rpc_url: &str,
        extra_data_threshold: usize,
    ) -> NetworkProfile {
        let fee_model = match self.latest_block().await {
            Ok(block) => classify_block(
                block.extra_data_len,
                block.base_fee_per_gas.is_some(),
                extra_data_threshold,
            ),
            Err(e) => {
                warn!(network = name, error = %e, "block probe failed, assuming legacy fee model");
                FeeModel::Legacy
            }
        };
        NetworkProfile::new(name, rpc_url, self.chain_id(), fee_model)
    }

    /// Returns the balance of an address in wei.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn get_balance(&self, address: &str) -> ChainResult<u128>;

    /// Returns the on-chain transaction count (next nonce) of an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn get_transaction_count(&self, address: &str) -> ChainResult<u64>;

    /// Returns a snapshot of the latest block header.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn latest_block(&self) -> ChainResult<BlockSnapshot>;

    /// Returns the node's suggested priority fee in wei.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not support the query; the caller
    /// falls back to a fixed default.
    async fn max_priority_fee(&self) -> ChainResult<u64>;

    /// Returns the node's suggested legacy gas price in wei.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn get_gas_price(&self) -> ChainResult<u64>;

    /// Asks the node for a raw gas estimate for the prepared call.
    ///
    /// The estimate is returned unpadded; any safety margin is applied by
    /// the caller's gas policy.
    ///
    /// # Errors
    ///
    /// Returns an error if estimation fails, e.g. the call would revert.
    /// The caller aborts the transaction; there is no fallback guess.
    async fn estimate_gas(&self, call: &PreparedCall, from: &str) -> ChainResult<u64>;

    /// Signs the request with the account's key and broadcasts it.
    ///
    /// # Errors
    ///
    /// Returns an error if signing or broadcast fails.
    async fn submit(&self, request: &TransactionRequest, account: &Account) -> ChainResult<TxHash>;

    /// Polls for the transaction receipt until inclusion or until the
    /// polling budget is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt does not appear in time.
    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> ChainResult<TxReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::rpc::mock::MockChainClient;

    #[tokio::test]
    async fn probe_classifies_from_latest_block() {
        // mock default: base fee present, extraData 32 bytes
        let client = MockChainClient::new(11155111);
        let profile = client.probe_profile("testnet", "http://rpc", 32).await;
        assert_eq!(profile.fee_model, FeeModel::Eip1559);
        assert_eq!(profile.chain_id, 11155111);
    }

    #[tokio::test]
    async fn failed_block_probe_classifies_legacy() {
        let client = MockChainClient::new(1328).failing_block();
        let profile = client.probe_profile("poa", "http://rpc", 32).await;
        assert_eq!(profile.fee_model, FeeModel::Legacy);
        assert_eq!(profile.chain_id, 1328);
    }

    #[test]
    fn tx_hash_display() {
        let hash = TxHash::new("0x1234");
        assert_eq!(hash.to_string(), "0x1234");
        assert_eq!(hash.as_str(), "0x1234");
    }

    #[test]
    fn chain_error_display() {
        let err = ChainError::connection("refused");
        assert_eq!(err.to_string(), "connection error: refused");

        let err = ChainError::gas_estimation("execution reverted");
        assert_eq!(err.to_string(), "gas estimation error: execution reverted");
    }

    #[test]
    fn block_snapshot_base_fee_optional() {
        let block = BlockSnapshot {
            number: 10,
            base_fee_per_gas: None,
            extra_data_len: 97,
        };
        assert!(block.base_fee_per_gas.is_none());
    }
}
