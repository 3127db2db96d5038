//! # Transaction Model
//!
//! The prepared call and the fully negotiated transaction request.
//!
//! A [`TransactionRequest`] is built once by the transaction builder,
//! handed to the signer for broadcast, and then discarded.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::fee::FeeQuote;

/// Destination of a call: contract creation or an existing address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallTarget {
    /// Contract deployment; the payload is init code.
    Deploy,
    /// Call or transfer to an address (0x-prefixed hex).
    Address(String),
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deploy => write!(f, "deploy"),
            Self::Address(addr) => write!(f, "{addr}"),
        }
    }
}

/// An unsigned call prepared by a workflow: target, payload and value,
/// before any fee negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCall {
    /// Call destination.
    pub target: CallTarget,
    /// Call data, or init code for a deployment. Empty for plain transfers.
    pub data: Vec<u8>,
    /// Native currency value in wei.
    pub value: u128,
}

impl PreparedCall {
    /// Prepares a contract deployment from init code.
    #[must_use]
    pub fn deployment(init_code: Vec<u8>) -> Self {
        Self {
            target: CallTarget::Deploy,
            data: init_code,
            value: 0,
        }
    }

    /// Prepares a contract call.
    #[must_use]
    pub fn contract_call(to: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            target: CallTarget::Address(to.into()),
            data,
            value: 0,
        }
    }

    /// Prepares a plain value transfer.
    #[must_use]
    pub fn transfer(to: impl Into<String>, value: u128) -> Self {
        Self {
            target: CallTarget::Address(to.into()),
            data: Vec::new(),
            value,
        }
    }
}

/// A fully negotiated transaction, ready for signing and broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Sender address.
    pub from: String,
    /// Prepared call.
    pub call: PreparedCall,
    /// Locally assigned nonce.
    pub nonce: u64,
    /// Negotiated gas limit and fee parameters.
    pub fee_quote: FeeQuote,
    /// Chain id the transaction is bound to.
    pub chain_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_has_empty_data() {
        let call = PreparedCall::transfer("0xabc", 10_000);
        assert!(call.data.is_empty());
        assert_eq!(call.value, 10_000);
        assert_eq!(call.target, CallTarget::Address("0xabc".to_string()));
    }

    #[test]
    fn deployment_carries_no_value() {
        let call = PreparedCall::deployment(vec![0x60, 0x80]);
        assert_eq!(call.target, CallTarget::Deploy);
        assert_eq!(call.value, 0);
    }

    #[test]
    fn call_target_display() {
        assert_eq!(CallTarget::Deploy.to_string(), "deploy");
        assert_eq!(CallTarget::Address("0xabc".into()).to_string(), "0xabc");
    }
}
