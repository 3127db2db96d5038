//! # Application Layer
//!
//! Orchestrates the on-chain workflows. The [`builder`] module turns an
//! abstract payload into a fully priced transaction request, the
//! [`workflows`] modules drive individual activities, and the [`runner`]
//! fans one workflow out across every configured network.

pub mod builder;
pub mod error;
pub mod payload;
pub mod runner;
pub mod workflows;

pub use builder::{BuildSettings, TransactionBuilder};
pub use error::{ApplicationError, ApplicationResult};
pub use payload::Payload;
pub use runner::{RunReport, Runner, Workflow, WorkflowSummary};
