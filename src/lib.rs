//! # Testnet Farmer
//!
//! Automated activity generator for EVM testnets. Deploys throwaway
//! ERC-20 tokens, calls greeting contracts and sends self-transfer
//! bursts across a configured list of networks, negotiating fees per
//! chain (EIP-1559 where supported, legacy gas pricing on PoA chains).
//!
//! ## Architecture
//!
//! The crate follows a layered design:
//!
//! - [`domain`]: pure fee, gas and nonce arithmetic plus the network
//!   fee-model classifier. No I/O.
//! - [`application`]: the transaction build pipeline, the three
//!   workflows and the multi-network runner.
//! - [`infrastructure`]: the RPC client port and its ethers-backed
//!   implementation, signing, Solidity compilation and configuration.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use testnet_farmer::application::{Runner, Workflow};
//! use testnet_farmer::infrastructure::config::{RunnerConfig, private_key_from_env};
//! use testnet_farmer::infrastructure::signer::Account;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunnerConfig::load(Path::new("farmer.toml"))?;
//! let account = Account::from_private_key(&private_key_from_env()?)?;
//! let runner = Runner::new(config, account)?;
//! let report = runner.run(Workflow::SelfTransfer { count: 5 }).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
