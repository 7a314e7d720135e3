use maitrix_bot::config::{MaitrixConfig, DEFAULT_CONFIG_PATH};
use maitrix_bot::faucet::{FaucetCollector, HttpFaucetClient};
use maitrix_bot::rpc::{AccountContext, EthersRpc};
use maitrix_bot::tokens::CONTRACTS;
use maitrix_bot::workflow::{OperationRunner, WorkflowOrchestrator, WorkflowPlan};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use core_logic::{format_countdown, setup_logger, shutdown_token, CycleRunner};
use dotenv::dotenv;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
    #[arg(long)]
    skip_faucets: bool,
}

#[tokio::main]
async fn main() {
    let log_guard = setup_logger();
    dotenv().ok();
    let args = Args::parse();

    let config = match MaitrixConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            drop(log_guard);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args, config).await {
        error!("💥 Fatal error: {:#}", e);
        drop(log_guard);
        std::process::exit(1);
    }
}

async fn run(args: Args, config: MaitrixConfig) -> Result<()> {
    let rpc = EthersRpc::connect(&config.rpc_url, &config.private_key, config.chain_id)?;
    let account = rpc.address();
    info!(target: "workflow", "🤖 Maitrix Auto Task Bot Started 🤖");
    info!(target: "workflow", "Wallet: {:?}", account);

    let ctx = AccountContext::new(account, config.chain_id, Arc::new(rpc));
    let operations =
        OperationRunner::new(ctx, config.gas).with_mint_policy(config.mint_policy);
    let mut orchestrator = WorkflowOrchestrator::new(
        account,
        operations,
        WorkflowPlan::maitrix(&CONTRACTS)?,
    )
    .with_pacing(config.pacing);

    if !args.skip_faucets {
        let faucets = FaucetCollector::new(Arc::new(HttpFaucetClient::new()?))
            .with_spacing(config.faucet_spacing);
        orchestrator = orchestrator.with_faucets(faucets);
    }

    if args.once {
        let report = orchestrator.run_cycle().await;
        info!(target: "workflow", "{}", report.summary_line());
        return Ok(());
    }

    let runner = CycleRunner::new(config.cycle, Duration::from_secs(1));
    let orchestrator = &orchestrator;
    let cycles = runner
        .run(
            shutdown_token(),
            |cycle| async move {
                if cycle > 1 {
                    println!();
                }
                info!(target: "workflow", "=== Cycle {} ===", cycle);
                let report = orchestrator.run_cycle().await;
                info!(target: "workflow", "{}", report.summary_line());
                info!(target: "workflow", "Waiting for next cycle");
                Ok::<(), anyhow::Error>(())
            },
            |remaining| {
                print!(
                    "\r{}",
                    format!("⏳ Next cycle in {}   ", format_countdown(remaining)).blue()
                );
                std::io::stdout().flush().ok();
            },
        )
        .await?;

    println!();
    info!(target: "workflow", "Stopped after {} cycle(s).", cycles);
    Ok(())
}
