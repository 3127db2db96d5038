//! # Account
//!
//! The single controlled account: checksummed address plus signing key.
//!
//! The key is supplied externally (environment or secret store), wrapped
//! once at startup and threaded explicitly through calls; nothing in the
//! crate reads it as ambient global state. The `Debug` representation
//! never includes key material.

use ethers::signers::{LocalWallet, Signer};
use ethers::utils::to_checksum;
use std::fmt;
use thiserror::Error;

/// Errors constructing an [`Account`].
#[derive(Debug, Error)]
pub enum AccountError {
    /// The private key is missing or not valid hex.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The configured address does not match the one derived from the key.
    #[error("account address mismatch: configured {configured}, derived {derived}")]
    AddressMismatch {
        /// Address from configuration.
        configured: String,
        /// Address derived from the private key.
        derived: String,
    },
}

/// The account all workflows transact from.
///
/// Long-lived for the process lifetime and never mutated.
#[derive(Clone)]
pub struct Account {
    address: String,
    wallet: LocalWallet,
}

impl Account {
    /// Creates an account from a hex private key, deriving the address.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidPrivateKey`] if the key does not
    /// parse.
    pub fn from_private_key(private_key: &str) -> Result<Self, AccountError> {
        let wallet: LocalWallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse()
            .map_err(|e| AccountError::InvalidPrivateKey(format!("{e}")))?;
        let address = to_checksum(&wallet.address(), None);
        Ok(Self { address, wallet })
    }

    /// Verifies the derived address against a configured one
    /// (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::AddressMismatch`] when they differ.
    pub fn verify_address(&self, configured: &str) -> Result<(), AccountError> {
        if configured.eq_ignore_ascii_case(&self.address) {
            Ok(())
        } else {
            Err(AccountError::AddressMismatch {
                configured: configured.to_string(),
                derived: self.address.clone(),
            })
        }
    }

    /// Returns the checksummed account address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the signing wallet.
    #[must_use]
    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // well-known test vector key, never funded
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDR: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn derives_checksummed_address() {
        let account = Account::from_private_key(TEST_KEY).unwrap();
        assert_eq!(account.address(), TEST_ADDR);
    }

    #[test]
    fn accepts_key_without_prefix() {
        let account = Account::from_private_key(TEST_KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(account.address(), TEST_ADDR);
    }

    #[test]
    fn rejects_garbage_key() {
        assert!(Account::from_private_key("not-a-key").is_err());
    }

    #[test]
    fn verify_address_is_case_insensitive() {
        let account = Account::from_private_key(TEST_KEY).unwrap();
        assert!(account.verify_address(&TEST_ADDR.to_lowercase()).is_ok());
        assert!(
            account
                .verify_address("0x0000000000000000000000000000000000000000")
                .is_err()
        );
    }

    #[test]
    fn debug_redacts_key_material() {
        let account = Account::from_private_key(TEST_KEY).unwrap();
        let rendered = format!("{account:?}");
        assert!(rendered.contains(TEST_ADDR));
        assert!(!rendered.contains("ac0974be"));
    }
}
