//! Command-line entrypoint for the testnet farmer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use testnet_farmer::application::{Runner, Workflow};
use testnet_farmer::infrastructure::config::{RunnerConfig, private_key_from_env};
use testnet_farmer::infrastructure::signer::Account;

#[derive(Debug, Parser)]
#[command(name = "testnet-farmer", version, about = "EVM testnet activity farmer")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "farmer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Deploy a fresh ERC-20 token on every network.
    Deploy,
    /// Call the greeting contract on networks where one is configured.
    Greet,
    /// Send a burst of self-transfers on every network.
    Send {
        /// Override the configured burst size.
        #[arg(long)]
        count: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = RunnerConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    let private_key = private_key_from_env()?;
    let account = Account::from_private_key(&private_key).context("deriving account")?;

    let workflow = match cli.command {
        Command::Deploy => Workflow::DeployToken,
        Command::Greet => Workflow::Greeting,
        Command::Send { count } => Workflow::SelfTransfer {
            count: count.unwrap_or(config.burst_count),
        },
    };

    let runner = Runner::new(config, account)?;
    let report = runner.run(workflow).await?;
    println!("{report}");

    if report.failed() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
