//! # Domain Layer
//!
//! Pure fee-negotiation logic with no I/O: fee-model classification, gas
//! limit policies, fee quoting with ceiling enforcement, affordability and
//! nonce sequencing.
//!
//! ## Available Components
//!
//! - [`FeeModel`] and [`classify_block`]: network fee-model classification
//! - [`GasMargin`] and [`GasPolicy`]: gas limit determination
//! - [`FeeParams`], [`FeeQuote`], [`FeeCeiling`]: fee quoting
//! - [`NonceSequence`]: burst nonce assignment
//! - [`TransactionRequest`]: the negotiated transaction

pub mod classifier;
pub mod fee;
pub mod gas;
pub mod nonce;
pub mod transaction;
pub mod units;

pub use classifier::{FeeModel, NetworkProfile, POA_EXTRA_DATA_THRESHOLD, classify_block};
pub use fee::{
    DEFAULT_PRIORITY_FEE, FeeCeiling, FeeError, FeeParams, FeeQuote, FeeResult,
    check_affordability, quote,
};
pub use gas::{GasMargin, GasPolicy, TRANSFER_GAS_LIMIT};
pub use nonce::NonceSequence;
pub use transaction::{CallTarget, PreparedCall, TransactionRequest};
