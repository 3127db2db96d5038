//! # Application Errors
//!
//! Error taxonomy for workflow execution.
//!
//! Every failure path funnels into [`ApplicationError`]; the run loop
//! converts per-network errors into outcomes and always continues to the
//! next network. Nothing in the crate retries automatically — a retry is
//! a human re-running the process.

use thiserror::Error;

use crate::domain::fee::FeeError;
use crate::infrastructure::compiler::CompilerError;
use crate::infrastructure::config::ConfigError;
use crate::infrastructure::rpc::ChainError;
use crate::infrastructure::signer::AccountError;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// RPC failure: connectivity, query, submission or confirmation.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// Fee negotiation failure: ceiling breach or insufficient balance.
    #[error("fee error: {0}")]
    Fee(#[from] FeeError),

    /// Contract compilation failure; fatal for the whole run.
    #[error("compiler error: {0}")]
    Compiler(#[from] CompilerError),

    /// Configuration failure.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Account construction or verification failure.
    #[error("account error: {0}")]
    Account(#[from] AccountError),

    /// ABI encoding failure.
    #[error("abi error: {0}")]
    Abi(String),

    /// The transaction was included but reverted on-chain.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates an ABI encoding error.
    #[must_use]
    pub fn abi(msg: impl Into<String>) -> Self {
        Self::Abi(msg.into())
    }

    /// Creates a reverted-transaction error.
    #[must_use]
    pub fn reverted(msg: impl Into<String>) -> Self {
        Self::Reverted(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true for a fee ceiling breach, which is a hard stop with
    /// no override.
    #[must_use]
    pub fn is_ceiling_breach(&self) -> bool {
        matches!(self, Self::Fee(FeeError::CeilingExceeded { .. }))
    }

    /// Returns true for an insufficient balance diagnostic.
    #[must_use]
    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, Self::Fee(FeeError::InsufficientBalance { .. }))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_breach_classification() {
        let err: ApplicationError = FeeError::CeilingExceeded {
            max_fee: 151,
            ceiling: 150,
        }
        .into();
        assert!(err.is_ceiling_breach());
        assert!(!err.is_insufficient_balance());
    }

    #[test]
    fn insufficient_balance_classification() {
        let err: ApplicationError = FeeError::InsufficientBalance {
            required: 10,
            available: 9,
        }
        .into();
        assert!(err.is_insufficient_balance());
    }

    #[test]
    fn chain_error_wraps_with_context() {
        let err: ApplicationError = ChainError::connection("refused").into();
        assert!(err.to_string().contains("chain error"));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn reverted_display() {
        let err = ApplicationError::reverted("out of gas");
        assert_eq!(err.to_string(), "transaction reverted: out of gas");
    }
}
