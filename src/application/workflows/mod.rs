//! # Workflows
//!
//! One module per on-chain activity: token deployment, greeting calls
//! and self-transfer bursts. Each workflow drives the shared
//! [`TransactionBuilder`](crate::application::builder::TransactionBuilder)
//! pipeline against a [`ChainClient`](crate::infrastructure::rpc::ChainClient)
//! and reports a typed summary.

pub mod deploy_token;
pub mod greeting;
pub mod self_transfer;

pub use deploy_token::{DeploySummary, deploy_token, generate_token_identity};
pub use greeting::{GreetingSummary, send_greeting};
pub use self_transfer::{BurstSummary, self_transfer_burst};
