//! # Gas Limits
//!
//! Gas limit policies: estimation with a safety margin for contract
//! interactions, or the protocol-fixed cost for plain value transfers.

use serde::{Deserialize, Serialize};

/// Protocol-fixed gas cost of a plain native-currency transfer.
///
/// Requires no estimation and no margin.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Safety margin applied on top of a node gas estimate.
///
/// Estimates can be stale by the time the transaction is included, so the
/// limit is padded by a percentage. The unused portion is refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasMargin {
    percent: u64,
}

impl GasMargin {
    /// Default margin percentage.
    pub const DEFAULT_PERCENT: u64 = 10;

    /// Creates a margin with the given percentage.
    #[must_use]
    pub const fn new(percent: u64) -> Self {
        Self { percent }
    }

    /// Returns the margin percentage.
    #[must_use]
    pub const fn percent(&self) -> u64 {
        self.percent
    }

    /// Applies the margin to a raw estimate: `estimate + estimate * p / 100`,
    /// with the product floored by integer division.
    #[must_use]
    pub const fn apply(&self, estimate: u64) -> u64 {
        estimate + estimate * self.percent / 100
    }
}

impl Default for GasMargin {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERCENT)
    }
}

/// How the gas limit for a transaction is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPolicy {
    /// Ask the node for an estimate and pad it with a margin. An estimation
    /// failure aborts the transaction; there is no fallback guess.
    Estimate {
        /// Margin applied to the raw estimate.
        margin: GasMargin,
    },
    /// Use a fixed limit without asking the node.
    Fixed(u64),
}

impl GasPolicy {
    /// Policy for plain value transfers: fixed [`TRANSFER_GAS_LIMIT`].
    #[must_use]
    pub const fn transfer() -> Self {
        Self::Fixed(TRANSFER_GAS_LIMIT)
    }

    /// Policy for contract interactions with the given margin.
    #[must_use]
    pub const fn estimated(margin: GasMargin) -> Self {
        Self::Estimate { margin }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn margin_pads_estimate() {
        let margin = GasMargin::new(10);
        assert_eq!(margin.apply(100_000), 110_000);
        assert_eq!(margin.apply(21_000), 23_100);
        // floored, never the raw estimate rounded up
        assert_eq!(margin.apply(15), 16);
    }

    #[test]
    fn default_margin_is_ten_percent() {
        assert_eq!(GasMargin::default().percent(), 10);
    }

    #[test]
    fn transfer_policy_is_fixed_21000() {
        assert_eq!(GasPolicy::transfer(), GasPolicy::Fixed(TRANSFER_GAS_LIMIT));
        assert_eq!(TRANSFER_GAS_LIMIT, 21_000);
    }

    proptest! {
        #[test]
        fn margin_matches_floored_formula(estimate in 0u64..=10_000_000) {
            let margin = GasMargin::default();
            prop_assert_eq!(margin.apply(estimate), estimate + estimate * 10 / 100);
        }

        #[test]
        fn margin_never_below_estimate(estimate in 0u64..=10_000_000, percent in 0u64..=100) {
            prop_assert!(GasMargin::new(percent).apply(estimate) >= estimate);
        }
    }
}
