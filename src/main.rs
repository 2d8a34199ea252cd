//! Runs the full workflow against an in-process ledger network.
//!
//! The operator named by `MY_ACCOUNT_ID` / `MY_PRIVATE_KEY` (process environment or
//! `.env`) becomes the network's genesis account, so any freshly generated key pair
//! works. The network itself is configured by [`NetworkConfig::load`].

use ledger_orchestrator::lifecycle::{setup_tracing, GenesisAccount, LedgerNetwork, NetworkConfig};
use ledger_orchestrator::model::Hbar;
use ledger_orchestrator::orchestrator::{Orchestrator, WorkflowConfig};
use std::sync::Arc;
use tracing::{error, info};

const GENESIS_BALANCE: Hbar = Hbar::new(10_000);

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    // Credentials are validated before anything is started.
    let config = WorkflowConfig::from_env().map_err(|e| e.to_string())?;
    let network_config = NetworkConfig::load().map_err(|e| e.to_string())?;

    let network = LedgerNetwork::start(network_config.with_genesis_account(GenesisAccount::new(
        config.operator.account_id,
        config.operator.private_key.public_key(),
        GENESIS_BALANCE,
    )));

    let orchestrator = Orchestrator::new(config, Arc::new(network.ledger()));
    let result = orchestrator.run_with(|outcome| println!("{outcome}")).await;
    drop(orchestrator);

    let outcome = match result {
        Ok(report) => {
            info!(new_account = ?report.new_account_id(), token = ?report.token_id(), "Workflow finished");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Workflow failed");
            Err(e.to_string())
        }
    };

    let shutdown = network.shutdown().await;
    if let Err(e) = &shutdown {
        error!(error = %e, "Network shutdown failed");
    }
    exit_status(outcome, shutdown)
}

/// A workflow error takes precedence over a shutdown error.
fn exit_status(workflow: Result<(), String>, shutdown: Result<(), String>) -> Result<(), String> {
    workflow.and(shutdown)
}
