//! # Runner Configuration
//!
//! Static per-run configuration: the network list, fee ceilings, margins
//! and tool paths.
//!
//! Configuration is layered from a TOML file plus environment overrides
//! of the form `FARMER__<FIELD>`. The private key is deliberately not part of the
//! file; it comes from the [`PRIVATE_KEY_ENV`] environment variable
//! (usually via `.env`) and is wrapped into an `Account` at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::domain::classifier::POA_EXTRA_DATA_THRESHOLD;
use crate::domain::fee::FeeCeiling;
use crate::domain::gas::GasMargin;
use crate::domain::units::gwei;
use crate::infrastructure::rpc::ethereum::ReceiptPoll;

/// Environment variable holding the account private key.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file failed to load or deserialize.
    #[error("configuration load error: {0}")]
    Load(#[from] config::ConfigError),

    /// The configuration is structurally valid but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The private key environment variable is missing or empty.
    #[error("private key not found: set the {PRIVATE_KEY_ENV} environment variable")]
    MissingPrivateKey,
}

/// One target network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network identifier used in logs and reports.
    pub name: String,
    /// RPC endpoint URL.
    pub rpc_url: String,
    /// Deployed greeting contract address. Empty or absent means the
    /// contract is not deployed on this network and the greeting workflow
    /// skips it.
    #[serde(default)]
    pub greeting_contract: Option<String>,
}

impl NetworkConfig {
    /// Returns the greeting contract address, treating an empty entry as
    /// not deployed.
    #[must_use]
    pub fn greeting_address(&self) -> Option<&str> {
        self.greeting_contract
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Fee ceilings and the priority-fee fallback, in gwei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSettings {
    /// Ceiling for token deployments.
    pub deploy_ceiling_gwei: u64,
    /// Ceiling for greeting calls.
    pub greeting_ceiling_gwei: u64,
    /// Ceiling for self-transfers.
    pub transfer_ceiling_gwei: u64,
    /// Priority fee used when the node rejects the suggestion query.
    pub priority_fee_fallback_gwei: u64,
    /// Whether ceilings also apply to legacy gas prices.
    pub ceiling_applies_to_legacy: bool,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            deploy_ceiling_gwei: 200,
            greeting_ceiling_gwei: 150,
            transfer_ceiling_gwei: 150,
            priority_fee_fallback_gwei: 2,
            ceiling_applies_to_legacy: true,
        }
    }
}

impl FeeSettings {
    /// Ceiling for the deployment workflow.
    #[must_use]
    pub const fn deploy_ceiling(&self) -> FeeCeiling {
        FeeCeiling::new(gwei(self.deploy_ceiling_gwei))
            .with_legacy_enforcement(self.ceiling_applies_to_legacy)
    }

    /// Ceiling for the greeting workflow.
    #[must_use]
    pub const fn greeting_ceiling(&self) -> FeeCeiling {
        FeeCeiling::new(gwei(self.greeting_ceiling_gwei))
            .with_legacy_enforcement(self.ceiling_applies_to_legacy)
    }

    /// Ceiling for the self-transfer workflow.
    #[must_use]
    pub const fn transfer_ceiling(&self) -> FeeCeiling {
        FeeCeiling::new(gwei(self.transfer_ceiling_gwei))
            .with_legacy_enforcement(self.ceiling_applies_to_legacy)
    }

    /// Priority-fee fallback in wei.
    #[must_use]
    pub const fn priority_fee_fallback(&self) -> u64 {
        gwei(self.priority_fee_fallback_gwei)
    }
}

fn default_gas_margin_percent() -> u64 {
    GasMargin::DEFAULT_PERCENT
}

fn default_transfer_amount_wei() -> u128 {
    // 0.00001 ether
    10_000_000_000_000
}

fn default_burst_count() -> u32 {
    5
}

fn default_extra_data_threshold() -> usize {
    POA_EXTRA_DATA_THRESHOLD
}

fn default_solc_path() -> String {
    "solc".to_string()
}

fn default_openzeppelin_path() -> String {
    "./node_modules/@openzeppelin".to_string()
}

fn default_receipt_poll_interval_secs() -> u64 {
    3
}

fn default_receipt_poll_attempts() -> u32 {
    100
}

/// The full run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Expected account address, checked against the one derived from the
    /// private key when present.
    #[serde(default)]
    pub account_address: Option<String>,
    /// Networks to process, strictly in order.
    pub networks: Vec<NetworkConfig>,
    /// Fee ceilings and fallbacks.
    #[serde(default)]
    pub fees: FeeSettings,
    /// Safety margin applied to gas estimates, in percent.
    #[serde(default = "default_gas_margin_percent")]
    pub gas_margin_percent: u64,
    /// Self-transfer amount in wei.
    #[serde(default = "default_transfer_amount_wei")]
    pub transfer_amount_wei: u128,
    /// Number of self-transfers per network.
    #[serde(default = "default_burst_count")]
    pub burst_count: u32,
    /// `extraData` length above which a chain classifies as PoA/legacy.
    #[serde(default = "default_extra_data_threshold")]
    pub extra_data_threshold: usize,
    /// Path to the solc binary.
    #[serde(default = "default_solc_path")]
    pub solc_path: String,
    /// Directory the `@openzeppelin` import remaps to.
    #[serde(default = "default_openzeppelin_path")]
    pub openzeppelin_path: String,
    /// Seconds between receipt polls.
    #[serde(default = "default_receipt_poll_interval_secs")]
    pub receipt_poll_interval_secs: u64,
    /// Maximum receipt polls before a confirmation error.
    #[serde(default = "default_receipt_poll_attempts")]
    pub receipt_poll_attempts: u32,
}

impl RunnerConfig {
    /// Loads configuration from a TOML file with `FARMER__<FIELD>`
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file fails to load or deserialize, or if
    /// the result fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings: Self = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FARMER").separator("__"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.networks.is_empty() {
            return Err(ConfigError::Invalid("network list is empty".to_string()));
        }
        for network in &self.networks {
            if network.rpc_url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "network {} has no RPC endpoint",
                    network.name
                )));
            }
        }
        if self.burst_count == 0 {
            return Err(ConfigError::Invalid(
                "burst_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Gas margin for contract interactions.
    #[must_use]
    pub const fn gas_margin(&self) -> GasMargin {
        GasMargin::new(self.gas_margin_percent)
    }

    /// Receipt polling schedule.
    #[must_use]
    pub const fn receipt_poll(&self) -> ReceiptPoll {
        ReceiptPoll {
            interval: Duration::from_secs(self.receipt_poll_interval_secs),
            max_attempts: self.receipt_poll_attempts,
        }
    }
}

/// Reads the private key from the environment.
///
/// # Errors
///
/// Returns [`ConfigError::MissingPrivateKey`] when the variable is unset
/// or empty.
pub fn private_key_from_env() -> Result<String, ConfigError> {
    match std::env::var(PRIVATE_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::MissingPrivateKey),
    }
}
