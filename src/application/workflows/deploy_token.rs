//! # Token Deployment Workflow
//!
//! Deploys the fixed ERC-20 token contract with a per-network unique name
//! and symbol. Single shot: any failure aborts the deployment for that
//! network.

use ethers::abi::Token;
use ethers::types::U256;
use ethers::utils::{hex, keccak256};
use rand::RngCore;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::application::builder::{BuildSettings, TransactionBuilder};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::payload::TokenDeployment;
use crate::domain::classifier::NetworkProfile;
use crate::domain::gas::GasMargin;
use crate::infrastructure::compiler::CompiledContract;
use crate::infrastructure::rpc::{ChainClient, TxHash};
use crate::infrastructure::signer::Account;

/// Initial token supply: one million whole tokens at 18 decimals.
#[must_use]
pub fn initial_supply() -> U256 {
    U256::from(1_000_000u64) * U256::exp10(18)
}

/// Generates a unique token name and symbol from a keccak digest of the
/// current time and fresh randomness.
///
/// The name is `Token_` plus the first 8 hex characters of the digest,
/// the symbol `TKN` plus the first 3.
#[must_use]
pub fn generate_token_identity() -> (String, String) {
    let mut salt = [0u8; 32];
    rand::rng().fill_bytes(&mut salt);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut seed = Vec::with_capacity(48);
    seed.extend_from_slice(&nanos.to_le_bytes());
    seed.extend_from_slice(&salt);
    let digest = hex::encode(keccak256(&seed));

    let name = format!("Token_{}", digest.chars().take(8).collect::<String>());
    let symbol = format!("TKN{}", digest.chars().take(3).collect::<String>());
    (name, symbol)
}

/// Appends ABI-encoded constructor arguments to the creation bytecode.
///
/// # Errors
///
/// Returns an error if the artifact has no constructor or encoding fails.
pub fn encode_init_code(
    artifact: &CompiledContract,
    name: &str,
    symbol: &str,
    supply: U256,
) -> ApplicationResult<Vec<u8>> {
    let constructor = artifact
        .abi
        .constructor
        .as_ref()
        .ok_or_else(|| ApplicationError::abi("token contract has no constructor"))?;
    constructor
        .encode_input(
            artifact.bytecode.to_vec(),
            &[
                Token::String(name.to_string()),
                Token::String(symbol.to_string()),
                Token::Uint(supply),
            ],
        )
        .map_err(|e| ApplicationError::abi(e.to_string()))
}

/// Outcome of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySummary {
    /// Generated token name.
    pub token_name: String,
    /// Address of the deployed contract.
    pub contract_address: String,
    /// Block the deployment was included in.
    pub block_number: u64,
    /// Deployment transaction hash.
    pub tx_hash: TxHash,
}

/// Deploys the token contract on one network.
///
/// # Errors
///
/// Returns an error on estimation failure, ceiling breach, insufficient
/// balance, submission failure or an on-chain revert; none are retried.
pub async fn deploy_token<C: ChainClient + ?Sized>(
    client: &C,
    profile: &NetworkProfile,
    account: &Account,
    artifact: &CompiledContract,
    margin: GasMargin,
    settings: BuildSettings,
) -> ApplicationResult<DeploySummary> {
    let (name, symbol) = generate_token_identity();
    info!(network = %profile.name, token = %name, symbol = %symbol, "deploying token");

    let init_code = encode_init_code(artifact, &name, &symbol, initial_supply())?;
    let payload = TokenDeployment::new(name.clone(), init_code, margin);

    let nonce = client.get_transaction_count(account.address()).await?;
    let builder = TransactionBuilder::new(client, profile, settings);
    let request = builder.build(account.address(), &payload, nonce).await?;

    let tx_hash = client.submit(&request, account).await?;
    info!(%tx_hash, "deployment sent");

    let receipt = client.wait_for_receipt(&tx_hash).await?;
    if !receipt.success {
        return Err(ApplicationError::reverted(format!(
            "deployment {tx_hash} failed in block {}",
            receipt.block_number
        )));
    }
    let contract_address = receipt
        .contract_address
        .ok_or_else(|| ApplicationError::internal("deployment receipt has no contract address"))?;
    info!(
        contract = %contract_address,
        block = receipt.block_number,
        "token deployed"
    );

    Ok(DeploySummary {
        token_name: name,
        contract_address,
        block_number: receipt.block_number,
        tx_hash,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ethers::abi::Abi;
    use ethers::types::Bytes;
    use crate::domain::classifier::FeeModel;
    use crate::domain::fee::FeeCeiling;
    use crate::domain::units::gwei;
    use crate::infrastructure::rpc::mock::{MOCK_CONTRACT_ADDRESS, MockChainClient};

    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_artifact() -> CompiledContract {
        let abi: Abi = serde_json::from_str(
            r#"[{
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [
                    {"name": "name", "type": "string"},
                    {"name": "symbol", "type": "string"},
                    {"name": "initialSupply", "type": "uint256"}
                ]
            }]"#,
        )
        .unwrap();
        CompiledContract {
            abi,
            bytecode: Bytes::from(vec![0x60, 0x80, 0x60, 0x40]),
        }
    }

    fn settings() -> BuildSettings {
        BuildSettings {
            ceiling: FeeCeiling::new(gwei(200)),
            priority_fee_fallback: gwei(2),
        }
    }

    fn profile() -> NetworkProfile {
        NetworkProfile::new("testnet", "http://rpc", 11155111, FeeModel::Eip1559)
    }

    #[test]
    fn token_identity_shape() {
        let (name, symbol) = generate_token_identity();
        assert_eq!(name.len(), "Token_".len() + 8);
        assert!(name.starts_with("Token_"));
        assert!(symbol.starts_with("TKN"));
        assert_eq!(symbol.len(), 6);
        assert!(
            name.trim_start_matches("Token_")
                .chars()
                .all(|c| c.is_ascii_hexdigit())
        );
    }

    #[test]
    fn token_identity_is_unique_across_calls() {
        let (a, _) = generate_token_identity();
        let (b, _) = generate_token_identity();
        assert_ne!(a, b);
    }

    #[test]
    fn init_code_starts_with_bytecode() {
        let artifact = test_artifact();
        let init_code =
            encode_init_code(&artifact, "Token_deadbeef", "TKNdea", initial_supply()).unwrap();
        assert!(init_code.starts_with(&artifact.bytecode.to_vec()));
        assert!(init_code.len() > artifact.bytecode.len());
    }

    #[test]
    fn initial_supply_is_one_million_tokens() {
        assert_eq!(
            initial_supply(),
            U256::from_dec_str("1000000000000000000000000").unwrap()
        );
    }

    #[tokio::test]
    async fn deploy_reports_contract_address() {
        let client = MockChainClient::new(11155111).with_transaction_count(4);
        let account = Account::from_private_key(TEST_KEY).unwrap();
        let summary = deploy_token(
            &client,
            &profile(),
            &account,
            &test_artifact(),
            GasMargin::default(),
            settings(),
        )
        .await
        .unwrap();

        assert_eq!(summary.contract_address, MOCK_CONTRACT_ADDRESS);
        assert_eq!(client.submitted_nonces().await, vec![4]);
        // 50_000 estimate + 10% margin
        let submitted = client.submitted().await;
        assert_eq!(submitted[0].fee_quote.gas_limit, 55_000);
    }

    #[tokio::test]
    async fn reverted_deployment_is_an_error() {
        let client = MockChainClient::new(1).reverting_at(0);
        let account = Account::from_private_key(TEST_KEY).unwrap();
        let err = deploy_token(
            &client,
            &profile(),
            &account,
            &test_artifact(),
            GasMargin::default(),
            settings(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("reverted"));
    }
}
