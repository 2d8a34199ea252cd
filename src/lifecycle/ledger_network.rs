use crate::account_actor::Account;
use crate::clients::{AccountClient, TokenClient, TransactionClient};
use crate::lifecycle::NetworkConfig;
use crate::sdk::NetworkLedger;
use crate::transaction_actor::TransactionContext;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tracing::{error, info};

/// An in-process ledger network built from account, token and transaction actors.
///
/// `LedgerNetwork` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the three actors
/// - **Dependency Wiring**: The transaction actor receives the account and token clients
/// - **Shared Resources**: One entity-number sequence for accounts and tokens
///
/// # Example
///
/// ```ignore
/// let network = LedgerNetwork::start(NetworkConfig::default().with_genesis_account(operator));
/// let client = Client::new(Arc::new(network.ledger())).with_operator(operator_id, operator_key);
/// // ... run transactions ...
/// drop(client);
/// network.shutdown().await?;
/// ```
pub struct LedgerNetwork {
    pub account_client: AccountClient,
    pub token_client: TokenClient,
    pub transaction_client: TransactionClient,
    config: NetworkConfig,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl LedgerNetwork {
    /// Spawns the network actors, seeding the genesis accounts.
    pub fn start(config: NetworkConfig) -> Self {
        let entity_counter = Arc::new(AtomicU64::new(config.next_entity_num()));

        let (mut account_actor, account_client) =
            crate::account_actor::new(config.buffer_size, entity_counter.clone());
        let (token_actor, token_client) = crate::token_actor::new(config.buffer_size, entity_counter);
        let (transaction_actor, transaction_client) = crate::transaction_actor::new(config.buffer_size);

        for genesis in &config.genesis {
            account_actor.seed(
                genesis.account_id,
                Account::new(genesis.account_id, genesis.key, genesis.balance),
            );
        }

        let account_handle = tokio::spawn(account_actor.run(()));
        let token_handle = tokio::spawn(token_actor.run(()));
        let transaction_handle = tokio::spawn(transaction_actor.run(TransactionContext {
            accounts: account_client.clone(),
            tokens: token_client.clone(),
            fees: config.fees.clone(),
            node_account_id: config.node_account_id,
        }));

        info!(genesis = config.genesis.len(), "Ledger network started");
        Self {
            account_client,
            token_client,
            transaction_client,
            config,
            handles: vec![transaction_handle, account_handle, token_handle],
        }
    }

    /// A [`Ledger`](crate::sdk::Ledger) backed by this network.
    pub fn ledger(&self) -> NetworkLedger {
        NetworkLedger::new(
            self.transaction_client.clone(),
            self.account_client.clone(),
            self.config.balance_query_cost,
        )
    }

    /// Gracefully shuts down the network.
    ///
    /// The actors stop once every client is gone, so any [`NetworkLedger`] handed
    /// out by [`LedgerNetwork::ledger`] must be dropped before calling this.
    /// The transaction actor stops first and releases its account and token clients.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down ledger network...");

        drop(self.transaction_client);
        drop(self.account_client);
        drop(self.token_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Ledger network shutdown complete.");
        Ok(())
    }
}
