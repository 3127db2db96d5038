//! # Multi-Network Runner
//!
//! Drives one workflow across every configured network, strictly in
//! configuration order. A network that fails is reported and the run
//! moves on; one bad RPC endpoint never blocks the networks after it.

use std::fmt;
use tracing::{error, info, warn};

use crate::application::builder::BuildSettings;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::workflows::{
    BurstSummary, DeploySummary, GreetingSummary, deploy_token, self_transfer_burst, send_greeting,
};
use crate::domain::units::format_ether;
use crate::infrastructure::compiler::{CompiledContract, TokenCompiler};
use crate::infrastructure::config::{NetworkConfig, RunnerConfig};
use crate::infrastructure::rpc::ChainClient;
use crate::infrastructure::rpc::ethereum::EthersChainClient;
use crate::infrastructure::signer::Account;

/// The activity to run on each network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Deploy a fresh token contract.
    DeployToken,
    /// Call the greeting contract where one is configured.
    Greeting,
    /// Send a burst of self-transfers.
    SelfTransfer {
        /// Number of transfers per network.
        count: u32,
    },
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeployToken => write!(f, "deploy-token"),
            Self::Greeting => write!(f, "greeting"),
            Self::SelfTransfer { count } => write!(f, "self-transfer x{count}"),
        }
    }
}

/// What a workflow produced on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowSummary {
    /// A token was deployed.
    Deployed(DeploySummary),
    /// A greeting call confirmed.
    Greeted(GreetingSummary),
    /// A transfer burst ran to completion.
    Burst(BurstSummary),
    /// The workflow did not apply to this network.
    Skipped {
        /// Why the network was skipped.
        reason: String,
    },
}

impl fmt::Display for WorkflowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deployed(d) => write!(
                f,
                "deployed {} at {} (block {})",
                d.token_name, d.contract_address, d.block_number
            ),
            Self::Greeted(g) => write!(f, "greeting {} in block {}", g.tx_hash, g.block_number),
            Self::Burst(b) => write!(f, "{}/{} transfers confirmed", b.confirmed, b.attempted),
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

/// Per-network result.
#[derive(Debug)]
pub struct NetworkOutcome {
    /// Network name from the configuration.
    pub network: String,
    /// What happened there.
    pub result: ApplicationResult<WorkflowSummary>,
}

/// Aggregated results for a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One outcome per configured network, in processing order.
    pub outcomes: Vec<NetworkOutcome>,
}

impl RunReport {
    /// Number of networks that completed their workflow.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of networks that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} network(s) processed, {} succeeded, {} failed",
            self.outcomes.len(),
            self.succeeded(),
            self.failed()
        )?;
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(summary) => writeln!(f, "  {}: {summary}", outcome.network)?,
                Err(e) => writeln!(f, "  {}: FAILED: {e}", outcome.network)?,
            }
        }
        Ok(())
    }
}

/// Runs one workflow across all configured networks.
#[derive(Debug)]
pub struct Runner {
    config: RunnerConfig,
    account: Account,
}

impl Runner {
    /// Creates a runner, checking the derived account address against the
    /// configured one when present.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured address does not match the
    /// address derived from the private key.
    pub fn new(config: RunnerConfig, account: Account) -> ApplicationResult<Self> {
        if let Some(expected) = &config.account_address {
            account.verify_address(expected)?;
        }
        Ok(Self { config, account })
    }

    /// Runs `workflow` on every configured network, in order.
    ///
    /// # Errors
    ///
    /// Returns an error only for run-wide preconditions, currently a
    /// failed contract compilation for the deployment workflow.
    /// Per-network failures are captured in the report instead.
    pub async fn run(&self, workflow: Workflow) -> ApplicationResult<RunReport> {
        info!(%workflow, account = %self.account.address(), "starting run");

        // Compile once up front; a broken toolchain fails the whole run
        // before any network is touched.
        let artifact = match workflow {
            Workflow::DeployToken => {
                let compiler =
                    TokenCompiler::new(&self.config.solc_path, &self.config.openzeppelin_path);
                Some(compiler.compile()?)
            }
            _ => None,
        };

        let mut report = RunReport::default();
        for network in &self.config.networks {
            info!(network = %network.name, "processing network");
            let result = self
                .run_network(network, workflow, artifact.as_ref())
                .await;
            match &result {
                Ok(summary) => info!(network = %network.name, %summary, "network complete"),
                Err(e) => error!(network = %network.name, error = %e, "network failed, continuing"),
            }
            report.outcomes.push(NetworkOutcome {
                network: network.name.clone(),
                result,
            });
        }
        info!(succeeded = report.succeeded(), failed = report.failed(), "run finished");
        Ok(report)
    }

    async fn run_network(
        &self,
        network: &NetworkConfig,
        workflow: Workflow,
        artifact: Option<&CompiledContract>,
    ) -> ApplicationResult<WorkflowSummary> {
        let client = EthersChainClient::connect(&network.rpc_url, self.config.receipt_poll()).await?;
        let profile = client
            .probe_profile(&network.name, &network.rpc_url, self.config.extra_data_threshold)
            .await;
        info!(
            chain_id = profile.chain_id,
            fee_model = %profile.fee_model,
            "connected"
        );

        let balance = client.get_balance(self.account.address()).await?;
        info!(balance_eth = %format_ether(balance), "account balance");

        match workflow {
            Workflow::DeployToken => {
                let artifact = artifact
                    .ok_or_else(|| ApplicationError::internal("deployment artifact missing"))?;
                let settings = BuildSettings {
                    ceiling: self.config.fees.deploy_ceiling(),
                    priority_fee_fallback: self.config.fees.priority_fee_fallback(),
                };
                deploy_token(
                    &client,
                    &profile,
                    &self.account,
                    artifact,
                    self.config.gas_margin(),
                    settings,
                )
                .await
                .map(WorkflowSummary::Deployed)
            }
            Workflow::Greeting => {
                let Some(contract) = network.greeting_address() else {
                    warn!(network = %network.name, "greeting contract not deployed, skipping");
                    return Ok(WorkflowSummary::Skipped {
                        reason: "greeting contract not deployed".to_string(),
                    });
                };
                let settings = BuildSettings {
                    ceiling: self.config.fees.greeting_ceiling(),
                    priority_fee_fallback: self.config.fees.priority_fee_fallback(),
                };
                send_greeting(
                    &client,
                    &profile,
                    &self.account,
                    contract,
                    self.config.gas_margin(),
                    settings,
                )
                .await
                .map(WorkflowSummary::Greeted)
            }
            Workflow::SelfTransfer { count } => {
                let settings = BuildSettings {
                    ceiling: self.config.fees.transfer_ceiling(),
                    priority_fee_fallback: self.config.fees.priority_fee_fallback(),
                };
                self_transfer_burst(
                    &client,
                    &profile,
                    &self.account,
                    self.config.transfer_amount_wei,
                    count,
                    settings,
                )
                .await
                .map(WorkflowSummary::Burst)
            }
        }
    }
}
