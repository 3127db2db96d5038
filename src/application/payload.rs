//! # Workflow Payloads
//!
//! The single abstraction separating the three workflows: how the call
//! data is built and how the gas limit is determined.
//!
//! The transaction builder is payload-agnostic; everything else in the
//! fee negotiation pipeline is shared.

use crate::domain::gas::{GasMargin, GasPolicy};
use crate::domain::transaction::PreparedCall;

/// A workflow-specific transaction intent.
pub trait Payload: Send + Sync {
    /// Short human-readable description for logs.
    fn describe(&self) -> String;

    /// Builds the unsigned call: target, call data and value.
    fn prepare(&self) -> PreparedCall;

    /// How the gas limit is determined for this payload.
    fn gas_policy(&self) -> GasPolicy;
}

/// Token contract deployment: init code with constructor arguments
/// already appended.
#[derive(Debug, Clone)]
pub struct TokenDeployment {
    token_name: String,
    init_code: Vec<u8>,
    margin: GasMargin,
}

impl TokenDeployment {
    /// Creates a deployment payload.
    #[must_use]
    pub fn new(token_name: impl Into<String>, init_code: Vec<u8>, margin: GasMargin) -> Self {
        Self {
            token_name: token_name.into(),
            init_code,
            margin,
        }
    }

    /// Returns the generated token name.
    #[must_use]
    pub fn token_name(&self) -> &str {
        &self.token_name
    }
}

impl Payload for TokenDeployment {
    fn describe(&self) -> String {
        format!("deploy token {}", self.token_name)
    }

    fn prepare(&self) -> PreparedCall {
        PreparedCall::deployment(self.init_code.clone())
    }

    fn gas_policy(&self) -> GasPolicy {
        GasPolicy::estimated(self.margin)
    }
}

/// Greeting call to a deployed contract.
#[derive(Debug, Clone)]
pub struct GreetingCall {
    contract: String,
    calldata: Vec<u8>,
    margin: GasMargin,
}

impl GreetingCall {
    /// Creates a greeting payload for the given contract.
    #[must_use]
    pub fn new(contract: impl Into<String>, calldata: Vec<u8>, margin: GasMargin) -> Self {
        Self {
            contract: contract.into(),
            calldata,
            margin,
        }
    }
}

impl Payload for GreetingCall {
    fn describe(&self) -> String {
        format!("greeting call to {}", self.contract)
    }

    fn prepare(&self) -> PreparedCall {
        PreparedCall::contract_call(self.contract.clone(), self.calldata.clone())
    }

    fn gas_policy(&self) -> GasPolicy {
        GasPolicy::estimated(self.margin)
    }
}

/// Native currency transfer to the account's own address.
#[derive(Debug, Clone)]
pub struct SelfTransfer {
    to: String,
    amount_wei: u128,
}

impl SelfTransfer {
    /// Creates a self-transfer payload.
    #[must_use]
    pub fn new(to: impl Into<String>, amount_wei: u128) -> Self {
        Self {
            to: to.into(),
            amount_wei,
        }
    }
}

impl Payload for SelfTransfer {
    fn describe(&self) -> String {
        format!("self-transfer of {} wei", self.amount_wei)
    }

    fn prepare(&self) -> PreparedCall {
        PreparedCall::transfer(self.to.clone(), self.amount_wei)
    }

    fn gas_policy(&self) -> GasPolicy {
        GasPolicy::transfer()
    }
}
