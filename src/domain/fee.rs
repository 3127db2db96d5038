//! # Fee Quoting
//!
//! Fee parameters, ceiling enforcement and the affordability check.
//!
//! Supports both legacy gas pricing and EIP-1559 dynamic fees. Fee rates
//! are stored as `u64` wei, which is sufficient for practical gas prices;
//! transaction costs and balances use `u128` wei.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::units::{WEI_PER_GWEI, format_gwei};

/// Fallback priority fee (2 gwei) used when the node does not answer the
/// `eth_maxPriorityFeePerGas` query.
pub const DEFAULT_PRIORITY_FEE: u64 = 2 * WEI_PER_GWEI;

/// Fee parameters for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeeParams {
    /// EIP-1559 dynamic fee.
    Eip1559 {
        /// Maximum total fee per gas in wei.
        max_fee_per_gas: u64,
        /// Maximum priority fee per gas in wei.
        max_priority_fee_per_gas: u64,
    },
    /// Legacy scalar gas price in wei.
    Legacy {
        /// Gas price in wei.
        gas_price: u64,
    },
}

impl FeeParams {
    /// Creates EIP-1559 parameters from a base fee and a priority fee:
    /// `max_fee_per_gas = base_fee + priority_fee`.
    #[must_use]
    pub const fn eip1559(base_fee: u64, priority_fee: u64) -> Self {
        Self::Eip1559 {
            max_fee_per_gas: base_fee.saturating_add(priority_fee),
            max_priority_fee_per_gas: priority_fee,
        }
    }

    /// Creates legacy parameters.
    #[must_use]
    pub const fn legacy(gas_price: u64) -> Self {
        Self::Legacy { gas_price }
    }

    /// Returns the worst-case fee rate in wei per gas unit.
    ///
    /// For EIP-1559 this is the max fee per gas; for legacy the gas price.
    #[must_use]
    pub const fn max_rate(&self) -> u64 {
        match self {
            Self::Eip1559 {
                max_fee_per_gas, ..
            } => *max_fee_per_gas,
            Self::Legacy { gas_price } => *gas_price,
        }
    }

    /// Returns whether these are EIP-1559 parameters.
    #[must_use]
    pub const fn is_eip1559(&self) -> bool {
        matches!(self, Self::Eip1559 { .. })
    }
}

impl fmt::Display for FeeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => write!(
                f,
                "eip1559: max_fee={} gwei, priority_fee={} gwei",
                format_gwei(*max_fee_per_gas),
                format_gwei(*max_priority_fee_per_gas)
            ),
            Self::Legacy { gas_price } => {
                write!(f, "legacy: gas_price={} gwei", format_gwei(*gas_price))
            }
        }
    }
}

/// Configured maximum acceptable fee rate.
///
/// A quote whose worst-case rate exceeds the ceiling is never constructed;
/// the breach is a hard stop, not a retry condition. Whether the ceiling
/// also applies to the legacy path is configurable and defaults to yes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCeiling {
    /// Maximum fee rate in wei per gas unit.
    max_fee_per_gas: u64,
    /// Whether the ceiling is enforced on legacy gas prices too.
    applies_to_legacy: bool,
}

impl FeeCeiling {
    /// Creates a ceiling enforced on both fee models.
    #[must_use]
    pub const fn new(max_fee_per_gas: u64) -> Self {
        Self {
            max_fee_per_gas,
            applies_to_legacy: true,
        }
    }

    /// Sets whether the ceiling applies to legacy gas prices.
    #[must_use]
    pub const fn with_legacy_enforcement(mut self, applies: bool) -> Self {
        self.applies_to_legacy = applies;
        self
    }

    /// Returns the ceiling rate in wei per gas unit.
    #[must_use]
    pub const fn max_fee_per_gas(&self) -> u64 {
        self.max_fee_per_gas
    }

    /// Returns whether the given parameters pass the ceiling.
    #[must_use]
    pub const fn admits(&self, params: &FeeParams) -> bool {
        match params {
            FeeParams::Eip1559 { .. } => params.max_rate() <= self.max_fee_per_gas,
            FeeParams::Legacy { .. } => {
                !self.applies_to_legacy || params.max_rate() <= self.max_fee_per_gas
            }
        }
    }
}

/// Gas limit and fee parameters for one transaction.
///
/// Derived transiently per transaction and never cached across a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    /// Gas limit including any safety margin.
    pub gas_limit: u64,
    /// Fee parameters.
    pub params: FeeParams,
}

impl FeeQuote {
    /// Worst-case transaction fee in wei: `gas_limit * max rate`.
    #[must_use]
    pub const fn max_cost(&self) -> u128 {
        self.gas_limit as u128 * self.params.max_rate() as u128
    }
}

/// Fee negotiation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeError {
    /// The quoted fee rate exceeds the configured ceiling.
    #[error("fee ceiling exceeded: {max_fee} wei per gas over ceiling {ceiling} wei per gas")]
    CeilingExceeded {
        /// Quoted worst-case rate in wei per gas unit.
        max_fee: u64,
        /// Configured ceiling in wei per gas unit.
        ceiling: u64,
    },

    /// The account cannot cover the worst-case transaction fee.
    #[error("insufficient balance: required {required} wei, available {available} wei")]
    InsufficientBalance {
        /// Worst-case fee in wei.
        required: u128,
        /// Current account balance in wei.
        available: u128,
    },
}

/// Result type for fee negotiation.
pub type FeeResult<T> = Result<T, FeeError>;

/// Builds a fee quote, enforcing the ceiling.
///
/// # Errors
///
/// Returns [`FeeError::CeilingExceeded`] when the worst-case rate is above
/// the ceiling; the quote is never constructed in that case.
pub const fn quote(gas_limit: u64, params: FeeParams, ceiling: &FeeCeiling) -> FeeResult<FeeQuote> {
    if ceiling.admits(&params) {
        Ok(FeeQuote { gas_limit, params })
    } else {
        Err(FeeError::CeilingExceeded {
            max_fee: params.max_rate(),
            ceiling: ceiling.max_fee_per_gas(),
        })
    }
}

/// Checks that a balance covers the worst-case cost. The boundary
/// `cost == balance` proceeds.
///
/// # Errors
///
/// Returns [`FeeError::InsufficientBalance`] with required and available
/// amounts when the balance falls short.
pub const fn check_affordability(cost: u128, balance: u128) -> FeeResult<()> {
    if cost <= balance {
        Ok(())
    } else {
        Err(FeeError::InsufficientBalance {
            required: cost,
            available: balance,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::units::gwei;

    #[test]
    fn eip1559_max_fee_is_base_plus_priority() {
        let params = FeeParams::eip1559(gwei(10), gwei(2));
        assert_eq!(
            params,
            FeeParams::Eip1559 {
                max_fee_per_gas: gwei(12),
                max_priority_fee_per_gas: gwei(2),
            }
        );
        assert_eq!(params.max_rate(), gwei(12));
        assert!(params.is_eip1559());
    }

    #[test]
    fn legacy_rate_is_gas_price() {
        let params = FeeParams::legacy(gwei(25));
        assert_eq!(params.max_rate(), gwei(25));
        assert!(!params.is_eip1559());
    }

    #[test]
    fn ceiling_boundary_one_unit_below_passes() {
        let ceiling = FeeCeiling::new(gwei(150));
        let params = FeeParams::eip1559(gwei(150) - 1 - gwei(2), gwei(2));
        assert_eq!(params.max_rate(), gwei(150) - 1);
        assert!(quote(21_000, params, &ceiling).is_ok());
    }

    #[test]
    fn ceiling_boundary_at_ceiling_passes() {
        let ceiling = FeeCeiling::new(gwei(150));
        let params = FeeParams::eip1559(gwei(148), gwei(2));
        assert!(quote(21_000, params, &ceiling).is_ok());
    }

    #[test]
    fn ceiling_boundary_one_unit_above_aborts() {
        let ceiling = FeeCeiling::new(gwei(150));
        let params = FeeParams::eip1559(gwei(148) + 1, gwei(2));
        assert_eq!(params.max_rate(), gwei(150) + 1);
        assert_eq!(
            quote(21_000, params, &ceiling),
            Err(FeeError::CeilingExceeded {
                max_fee: gwei(150) + 1,
                ceiling: gwei(150),
            })
        );
    }

    #[test]
    fn ceiling_applies_to_legacy_by_default() {
        let ceiling = FeeCeiling::new(gwei(150));
        let params = FeeParams::legacy(gwei(151));
        assert!(quote(21_000, params, &ceiling).is_err());
    }

    #[test]
    fn ceiling_legacy_enforcement_can_be_disabled() {
        let ceiling = FeeCeiling::new(gwei(150)).with_legacy_enforcement(false);
        assert!(quote(21_000, FeeParams::legacy(gwei(151)), &ceiling).is_ok());
        // eip1559 stays enforced
        let params = FeeParams::eip1559(gwei(151), 0);
        assert!(quote(21_000, params, &ceiling).is_err());
    }

    #[test]
    fn max_cost_is_limit_times_rate() {
        let q = quote(
            21_000,
            FeeParams::eip1559(gwei(10), gwei(2)),
            &FeeCeiling::new(gwei(150)),
        )
        .unwrap();
        assert_eq!(q.max_cost(), 21_000u128 * gwei(12) as u128);
    }

    #[test]
    fn affordability_exact_balance_proceeds() {
        assert!(check_affordability(1_000, 1_000).is_ok());
    }

    #[test]
    fn affordability_one_wei_short_aborts() {
        assert_eq!(
            check_affordability(1_001, 1_000),
            Err(FeeError::InsufficientBalance {
                required: 1_001,
                available: 1_000,
            })
        );
    }

    #[test]
    fn fee_error_display_includes_amounts() {
        let err = FeeError::InsufficientBalance {
            required: 42,
            available: 7,
        };
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("7"));
    }

    #[test]
    fn fee_params_display() {
        let params = FeeParams::eip1559(gwei(10), gwei(2));
        assert_eq!(
            params.to_string(),
            "eip1559: max_fee=12 gwei, priority_fee=2 gwei"
        );
        let legacy = FeeParams::legacy(gwei(25));
        assert_eq!(legacy.to_string(), "legacy: gas_price=25 gwei");
    }
}
