//! # Infrastructure Layer
//!
//! External collaborators: RPC clients, the signing account, the solc
//! wrapper and static configuration.

pub mod compiler;
pub mod config;
pub mod rpc;
pub mod signer;

pub use compiler::{CompiledContract, CompilerError, TokenCompiler};
pub use config::{ConfigError, FeeSettings, NetworkConfig, RunnerConfig, private_key_from_env};
pub use rpc::{ChainClient, ChainError, EthersChainClient, MockChainClient, ReceiptPoll};
pub use signer::{Account, AccountError};
