//! # Greeting Workflow
//!
//! Calls `sendGM("GM")` on a pre-deployed greeting contract. Networks
//! without a configured contract address are skipped, not failed.

use ethers::abi::{Token, parse_abi};
use tracing::info;

use crate::application::builder::{BuildSettings, TransactionBuilder};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::payload::GreetingCall;
use crate::domain::classifier::NetworkProfile;
use crate::domain::gas::GasMargin;
use crate::infrastructure::rpc::{ChainClient, TxHash};
use crate::infrastructure::signer::Account;

/// Message passed to the greeting contract.
pub const GREETING: &str = "GM";

/// Encodes the `sendGM(string)` call with the fixed greeting message.
///
/// # Errors
///
/// Returns an error if the ABI fragment fails to parse or encode.
pub fn greeting_calldata() -> ApplicationResult<Vec<u8>> {
    let abi = parse_abi(&["function sendGM(string greeting)"])
        .map_err(|e| ApplicationError::abi(e.to_string()))?;
    let function = abi
        .function("sendGM")
        .map_err(|e| ApplicationError::abi(e.to_string()))?;
    function
        .encode_input(&[Token::String(GREETING.to_string())])
        .map_err(|e| ApplicationError::abi(e.to_string()))
}

/// Outcome of a confirmed greeting call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingSummary {
    /// Greeting transaction hash.
    pub tx_hash: TxHash,
    /// Block the call was included in.
    pub block_number: u64,
}

/// Sends one greeting transaction to `contract` on one network.
///
/// # Errors
///
/// Returns an error on estimation failure, ceiling breach, insufficient
/// balance, submission failure or an on-chain revert.
pub async fn send_greeting<C: ChainClient + ?Sized>(
    client: &C,
    profile: &NetworkProfile,
    account: &Account,
    contract: &str,
    margin: GasMargin,
    settings: BuildSettings,
) -> ApplicationResult<GreetingSummary> {
    info!(network = %profile.name, %contract, "sending greeting");

    let calldata = greeting_calldata()?;
    let payload = GreetingCall::new(contract, calldata, margin);

    let nonce = client.get_transaction_count(account.address()).await?;
    let builder = TransactionBuilder::new(client, profile, settings);
    let request = builder.build(account.address(), &payload, nonce).await?;

    let tx_hash = client.submit(&request, account).await?;
    info!(%tx_hash, "greeting sent");

    let receipt = client.wait_for_receipt(&tx_hash).await?;
    if !receipt.success {
        return Err(ApplicationError::reverted(format!(
            "greeting {tx_hash} failed in block {}",
            receipt.block_number
        )));
    }
    info!(block = receipt.block_number, "greeting confirmed");

    Ok(GreetingSummary {
        tx_hash,
        block_number: receipt.block_number,
    })
}
