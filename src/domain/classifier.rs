//! # Network Fee-Model Classifier
//!
//! Decides whether a network uses the EIP-1559 fee market or legacy gas
//! pricing, based on the latest block header.
//!
//! Proof-of-authority chains historically pad the block header `extraData`
//! field with signer vanity and seal data beyond the 32 bytes allowed on
//! proof-of-stake chains. An `extraData` length above
//! [`POA_EXTRA_DATA_THRESHOLD`] therefore classifies the chain as legacy.
//! A block that reports no base fee is legacy regardless of `extraData`,
//! and any probe failure defaults to legacy: legacy parameters are a
//! strict superset of what every chain accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum `extraData` length (in bytes) still consistent with a
/// proof-of-stake chain. Lengths strictly greater classify as PoA/legacy.
pub const POA_EXTRA_DATA_THRESHOLD: usize = 32;

/// Fee model supported by a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeModel {
    /// EIP-1559 fee market: base fee plus priority tip.
    Eip1559,
    /// Single scalar gas price, used by older and PoA-style chains.
    Legacy,
}

impl FeeModel {
    /// Returns whether this is the EIP-1559 fee market.
    #[must_use]
    pub const fn is_eip1559(&self) -> bool {
        matches!(self, Self::Eip1559)
    }
}

impl fmt::Display for FeeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eip1559 => write!(f, "eip1559"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// Classifies a network from its latest block header.
///
/// # Arguments
///
/// * `extra_data_len` - Length of the header `extraData` field in bytes
/// * `has_base_fee` - Whether the header carries a `baseFeePerGas` field
/// * `threshold` - Maximum `extraData` length for an EIP-1559 chain,
///   normally [`POA_EXTRA_DATA_THRESHOLD`]
#[must_use]
pub const fn classify_block(extra_data_len: usize, has_base_fee: bool, threshold: usize) -> FeeModel {
    if !has_base_fee || extra_data_len > threshold {
        FeeModel::Legacy
    } else {
        FeeModel::Eip1559
    }
}

/// A network as seen by one run: identity plus the fee model decided once
/// at connection time.
///
/// Probed once per run per network and immutable thereafter; the fee model
/// is never re-derived per transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// Configured network identifier.
    pub name: String,
    /// RPC endpoint the profile was probed from.
    pub rpc_url: String,
    /// Numeric chain id reported by the node.
    pub chain_id: u64,
    /// Fee model decided at probe time.
    pub fee_model: FeeModel,
}

impl NetworkProfile {
    /// Creates a new network profile.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        rpc_url: impl Into<String>,
        chain_id: u64,
        fee_model: FeeModel,
    ) -> Self {
        Self {
            name: name.into(),
            rpc_url: rpc_url.into(),
            chain_id,
            fee_model,
        }
    }
}

impl fmt::Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (chain id {}, {})",
            self.name, self.chain_id, self.fee_model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_data_over_threshold_is_legacy() {
        assert_eq!(
            classify_block(33, true, POA_EXTRA_DATA_THRESHOLD),
            FeeModel::Legacy
        );
        assert_eq!(
            classify_block(97, true, POA_EXTRA_DATA_THRESHOLD),
            FeeModel::Legacy
        );
    }

    #[test]
    fn extra_data_at_threshold_is_eip1559() {
        assert_eq!(
            classify_block(32, true, POA_EXTRA_DATA_THRESHOLD),
            FeeModel::Eip1559
        );
        assert_eq!(
            classify_block(0, true, POA_EXTRA_DATA_THRESHOLD),
            FeeModel::Eip1559
        );
    }

    #[test]
    fn missing_base_fee_is_legacy_regardless_of_extra_data() {
        assert_eq!(
            classify_block(0, false, POA_EXTRA_DATA_THRESHOLD),
            FeeModel::Legacy
        );
        assert_eq!(
            classify_block(64, false, POA_EXTRA_DATA_THRESHOLD),
            FeeModel::Legacy
        );
    }

    #[test]
    fn threshold_is_a_parameter() {
        // a chain padding extraData to 64 bytes could be admitted by
        // raising the threshold
        assert_eq!(classify_block(64, true, 64), FeeModel::Eip1559);
        assert_eq!(classify_block(65, true, 64), FeeModel::Legacy);
    }

    #[test]
    fn fee_model_display() {
        assert_eq!(FeeModel::Eip1559.to_string(), "eip1559");
        assert_eq!(FeeModel::Legacy.to_string(), "legacy");
        assert!(FeeModel::Eip1559.is_eip1559());
        assert!(!FeeModel::Legacy.is_eip1559());
    }

    #[test]
    fn network_profile_display() {
        let profile = NetworkProfile::new("somnia", "https://rpc.example", 50312, FeeModel::Eip1559);
        assert_eq!(profile.to_string(), "somnia (chain id 50312, eip1559)");
    }
}
