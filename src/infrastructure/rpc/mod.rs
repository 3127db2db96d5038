//! # RPC Clients
//!
//! JSON-RPC access to EVM networks.
//!
//! ## Available Components
//!
//! - [`ChainClient`]: trait for per-network RPC interactions
//! - [`EthersChainClient`]: ethers-rs HTTP implementation
//! - [`MockChainClient`]: scripted implementation for tests
//! - [`BlockSnapshot`], [`TxReceipt`], [`TxHash`]: wire-level types

pub mod client;
pub mod ethereum;
pub mod mock;

pub use client::{BlockSnapshot, ChainClient, ChainError, ChainResult, TxHash, TxReceipt};
pub use ethereum::{EthersChainClient, ReceiptPoll};
pub use mock::MockChainClient;
