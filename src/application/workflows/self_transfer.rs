//! # Self-Transfer Burst Workflow
//!
//! Sends a burst of small transfers from the account back to itself.
//! Nonces are allocated locally and advance by one per iteration whether
//! or not the iteration succeeds, so a failed send never shifts the
//! nonces of the sends after it. Fees are re-quoted from fresh chain
//! data on every iteration.

use tracing::{info, warn};

use crate::application::builder::{BuildSettings, TransactionBuilder};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::payload::SelfTransfer;
use crate::domain::classifier::NetworkProfile;
use crate::domain::nonce::NonceSequence;
use crate::infrastructure::rpc::{ChainClient, TxReceipt};
use crate::infrastructure::signer::Account;

/// Outcome of a transfer burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstSummary {
    /// Transfers attempted, always the configured burst size.
    pub attempted: u32,
    /// Transfers that confirmed successfully.
    pub confirmed: u32,
}

impl BurstSummary {
    /// True when every attempted transfer confirmed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.confirmed == self.attempted
    }
}

/// Runs a burst of `count` self-transfers on one network.
///
/// Individual failures are logged and tolerated; the burst always runs
/// to its configured length.
///
/// # Errors
///
/// Returns an error only if the starting nonce cannot be fetched.
pub async fn self_transfer_burst<C: ChainClient + ?Sized>(
    client: &C,
    profile: &NetworkProfile,
    account: &Account,
    amount_wei: u128,
    count: u32,
    settings: BuildSettings,
) -> ApplicationResult<BurstSummary> {
    let start = client.get_transaction_count(account.address()).await?;
    let mut nonces = NonceSequence::starting_at(start);
    info!(
        network = %profile.name,
        count,
        start_nonce = start,
        "starting transfer burst"
    );

    let mut confirmed = 0u32;
    for _ in 0..count {
        let nonce = nonces.next();
        match send_one(client, profile, account, amount_wei, nonce, settings).await {
            Ok(receipt) => {
                info!(nonce, block = receipt.block_number, "transfer confirmed");
                confirmed += 1;
            }
            Err(e) => warn!(nonce, error = %e, "transfer failed, continuing burst"),
        }
    }

    let summary = BurstSummary {
        attempted: count,
        confirmed,
    };
    info!(
        attempted = summary.attempted,
        confirmed = summary.confirmed,
        "burst finished"
    );
    Ok(summary)
}

async fn send_one<C: ChainClient + ?Sized>(
    client: &C,
    profile: &NetworkProfile,
    account: &Account,
    amount_wei: u128,
    nonce: u64,
    settings: BuildSettings,
) -> ApplicationResult<TxReceipt> {
    let payload = SelfTransfer::new(account.address(), amount_wei);
    let builder = TransactionBuilder::new(client, profile, settings);
    let request = builder.build(account.address(), &payload, nonce).await?;

    let tx_hash = client.submit(&request, account).await?;
    info!(%tx_hash, nonce, "transfer sent");

    let receipt = client.wait_for_receipt(&tx_hash).await?;
    if !receipt.success {
        return Err(ApplicationError::reverted(format!(
            "transfer {tx_hash} failed in block {}",
            receipt.block_number
        )));
    }
    Ok(receipt)
}
