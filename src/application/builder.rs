//! # Transaction Builder
//!
//! The shared fee-negotiation pipeline: gas limit, fee parameters,
//! ceiling, affordability, assembly.
//!
//! All three workflows go through [`TransactionBuilder::build`] with a
//! workflow-specific [`Payload`]; none of them carries its own fee logic.
//! The builder never signs or broadcasts — the finished
//! [`TransactionRequest`] is handed to the chain client for that.

use tracing::{debug, info, warn};

use super::error::ApplicationResult;
use super::payload::Payload;
use crate::domain::classifier::{FeeModel, NetworkProfile};
use crate::domain::fee::{self, FeeCeiling, FeeParams};
use crate::domain::gas::GasPolicy;
use crate::domain::transaction::TransactionRequest;
use crate::domain::units::{format_ether, format_gwei};
use crate::infrastructure::rpc::ChainClient;

/// Fee-negotiation settings shared by every transaction of one workflow.
#[derive(Debug, Clone, Copy)]
pub struct BuildSettings {
    /// Maximum acceptable fee rate.
    pub ceiling: FeeCeiling,
    /// Priority fee used when the node rejects the suggestion query.
    pub priority_fee_fallback: u64,
}

/// Negotiates gas and fee parameters for one network.
pub struct TransactionBuilder<'a, C: ChainClient + ?Sized> {
    client: &'a C,
    profile: &'a NetworkProfile,
    settings: BuildSettings,
}

impl<'a, C: ChainClient + ?Sized> TransactionBuilder<'a, C> {
    /// Creates a builder for one network.
    #[must_use]
    pub const fn new(client: &'a C, profile: &'a NetworkProfile, settings: BuildSettings) -> Self {
        Self {
            client,
            profile,
            settings,
        }
    }

    /// Runs the full pipeline for one payload and nonce.
    ///
    /// Fee parameters are quoted from fresh chain data on every call and
    /// the balance is re-read for the affordability check; nothing is
    /// cached between transactions of a burst.
    ///
    /// # Errors
    ///
    /// Returns an error on estimation failure, ceiling breach,
    /// insufficient balance or any RPC failure. None of these are
    /// retried.
    pub async fn build(
        &self,
        from: &str,
        payload: &dyn Payload,
        nonce: u64,
    ) -> ApplicationResult<TransactionRequest> {
        info!(
            network = %self.profile.name,
            payload = %payload.describe(),
            nonce,
            "building transaction"
        );
        let call = payload.prepare();

        let gas_limit = match payload.gas_policy() {
            GasPolicy::Fixed(limit) => limit,
            GasPolicy::Estimate { margin } => {
                let estimate = self.client.estimate_gas(&call, from).await?;
                let limit = margin.apply(estimate);
                info!(estimate, limit, "gas estimated");
                limit
            }
        };

        let params = self.quote_params().await?;
        let quote = fee::quote(gas_limit, params, &self.settings.ceiling)?;

        let cost = quote.max_cost();
        let balance = self.client.get_balance(from).await?;
        fee::check_affordability(cost, balance)?;
        info!(
            cost_eth = %format_ether(cost),
            balance_eth = %format_ether(balance),
            "transaction affordable"
        );

        Ok(TransactionRequest {
            from: from.to_string(),
            call,
            nonce,
            fee_quote: quote,
            chain_id: self.profile.chain_id,
        })
    }

    /// Quotes fee parameters along the path decided at profile time.
    async fn quote_params(&self) -> ApplicationResult<FeeParams> {
        let params = match self.profile.fee_model {
            FeeModel::Eip1559 => {
                let priority_fee = match self.client.max_priority_fee().await {
                    Ok(fee) => fee,
                    Err(e) => {
                        debug!(error = %e, fallback = self.settings.priority_fee_fallback,
                            "priority fee query unsupported, using fallback");
                        self.settings.priority_fee_fallback
                    }
                };
                let block = self.client.latest_block().await?;
                match block.base_fee_per_gas {
                    Some(base_fee) => {
                        info!(
                            base_fee_gwei = %format_gwei(base_fee),
                            priority_fee_gwei = %format_gwei(priority_fee),
                            "eip1559 fee quoted"
                        );
                        FeeParams::eip1559(base_fee, priority_fee)
                    }
                    None => {
                        // profile said eip1559 but the chain stopped
                        // reporting a base fee; quote legacy for this one
                        warn!(network = %self.profile.name, "base fee missing, quoting legacy");
                        self.legacy_params().await?
                    }
                }
            }
            FeeModel::Legacy => self.legacy_params().await?,
        };
        Ok(params)
    }

    async fn legacy_params(&self) -> ApplicationResult<FeeParams> {
        let gas_price = self.client.get_gas_price().await?;
        info!(gas_price_gwei = %format_gwei(gas_price), "legacy gas price quoted");
        Ok(FeeParams::legacy(gas_price))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::payload::{GreetingCall, SelfTransfer};
    use crate::domain::gas::{GasMargin, TRANSFER_GAS_LIMIT};
    use crate::domain::units::gwei;
    use crate::infrastructure::rpc::{BlockSnapshot, MockChainClient};

    const FROM: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn settings(ceiling_gwei: u64) -> BuildSettings {
        BuildSettings {
            ceiling: FeeCeiling::new(gwei(ceiling_gwei)),
            priority_fee_fallback: gwei(2),
        }
    }

    fn eip1559_profile() -> NetworkProfile {
        NetworkProfile::new("testnet", "http://rpc", 11155111, FeeModel::Eip1559)
    }

    fn legacy_profile() -> NetworkProfile {
        NetworkProfile::new("poa", "http://rpc", 1328, FeeModel::Legacy)
    }

    #[tokio::test]
    async fn transfer_uses_fixed_limit_and_summed_fee() {
        let client = MockChainClient::new(11155111);
        let profile = eip1559_profile();
        let builder = TransactionBuilder::new(&client, &profile, settings(150));

        let payload = SelfTransfer::new(FROM, 10_000_000_000_000);
        let request = builder.build(FROM, &payload, 3).await.unwrap();

        assert_eq!(request.fee_quote.gas_limit, TRANSFER_GAS_LIMIT);
        // mock defaults: base fee 10 gwei, priority fee 2 gwei
        assert_eq!(
            request.fee_quote.params,
            FeeParams::Eip1559 {
                max_fee_per_gas: gwei(12),
                max_priority_fee_per_gas: gwei(2),
            }
        );
        assert_eq!(request.nonce, 3);
        assert_eq!(request.chain_id, 11155111);
    }

    #[tokio::test]
    async fn estimated_limit_carries_margin() {
        let client = MockChainClient::new(1).with_gas_estimate(Some(100_000));
        let profile = eip1559_profile();
        let builder = TransactionBuilder::new(&client, &profile, settings(150));

        let payload = GreetingCall::new("0xContract", vec![1], GasMargin::default());
        let request = builder.build(FROM, &payload, 0).await.unwrap();
        assert_eq!(request.fee_quote.gas_limit, 110_000);
    }

    #[tokio::test]
    async fn estimation_failure_aborts_without_fallback() {
        let client = MockChainClient::new(1).with_gas_estimate(None);
        let profile = eip1559_profile();
        let builder = TransactionBuilder::new(&client, &profile, settings(150));

        let payload = GreetingCall::new("0xContract", vec![1], GasMargin::default());
        let err = builder.build(FROM, &payload, 0).await.unwrap_err();
        assert!(err.to_string().contains("gas estimation"));
        assert!(client.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn priority_fee_fallback_applies() {
        let client = MockChainClient::new(1).with_priority_fee(None);
        let profile = eip1559_profile();
        let builder = TransactionBuilder::new(&client, &profile, settings(150));

        let payload = SelfTransfer::new(FROM, 1);
        let request = builder.build(FROM, &payload, 0).await.unwrap();
        assert_eq!(
            request.fee_quote.params,
            FeeParams::Eip1559 {
                max_fee_per_gas: gwei(12),
                max_priority_fee_per_gas: gwei(2),
            }
        );
    }

    #[tokio::test]
    async fn ceiling_breach_never_constructs_request() {
        let client = MockChainClient::new(1).with_block(BlockSnapshot {
            number: 1,
            base_fee_per_gas: Some(gwei(149)),
            extra_data_len: 32,
        });
        let profile = eip1559_profile();
        let builder = TransactionBuilder::new(&client, &profile, settings(150));

        // 149 + 2 = 151 gwei, one gwei over the ceiling
        let payload = SelfTransfer::new(FROM, 1);
        let err = builder.build(FROM, &payload, 0).await.unwrap_err();
        assert!(err.is_ceiling_breach());
    }

    #[tokio::test]
    async fn legacy_profile_quotes_gas_price() {
        let client = MockChainClient::new(1328).with_gas_price(gwei(25));
        let profile = legacy_profile();
        let builder = TransactionBuilder::new(&client, &profile, settings(150));

        let payload = SelfTransfer::new(FROM, 1);
        let request = builder.build(FROM, &payload, 0).await.unwrap();
        assert_eq!(request.fee_quote.params, FeeParams::legacy(gwei(25)));
    }

    #[tokio::test]
    async fn missing_base_fee_falls_back_to_legacy_quote() {
        let client = MockChainClient::new(1)
            .with_block(BlockSnapshot {
                number: 1,
                base_fee_per_gas: None,
                extra_data_len: 32,
            })
            .with_gas_price(gwei(30));
        let profile = eip1559_profile();
        let builder = TransactionBuilder::new(&client, &profile, settings(150));

        let payload = SelfTransfer::new(FROM, 1);
        let request = builder.build(FROM, &payload, 0).await.unwrap();
        assert_eq!(request.fee_quote.params, FeeParams::legacy(gwei(30)));
    }

    #[tokio::test]
    async fn affordability_reads_fresh_balance() {
        // 21000 * 12 gwei = 252_000 gwei of fees; fund exactly that
        let exact_cost = 21_000u128 * gwei(12) as u128;
        let client = MockChainClient::new(1).with_balance(exact_cost);
        let profile = eip1559_profile();
        let builder = TransactionBuilder::new(&client, &profile, settings(150));

        let payload = SelfTransfer::new(FROM, 1);
        assert!(builder.build(FROM, &payload, 0).await.is_ok());

        // one wei short now
        client.set_balance(exact_cost - 1).await;
        let err = builder.build(FROM, &payload, 1).await.unwrap_err();
        assert!(err.is_insufficient_balance());
        assert!(err.to_string().contains(&exact_cost.to_string()));
    }
}
