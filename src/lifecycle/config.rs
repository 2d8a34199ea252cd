//! Configuration for the simulated ledger network.
//!
//! [`NetworkConfig::load`] layers, over the defaults:
//! 1. an optional `ledger-network.{json,toml,yaml}` file in the working directory
//! 2. `LEDGER_`-prefixed environment variables, `__` separating nested keys
//!    (`LEDGER_FEES__TOKEN_CREATE=100000000`)

use crate::model::{AccountId, Hbar, PublicKey, TransactionKind};
use serde::Deserialize;

pub const NETWORK_CONFIG_FILE: &str = "ledger-network";
pub const NETWORK_ENV_PREFIX: &str = "LEDGER";

/// Flat fee charged to the payer, per kind of transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub account_create: Hbar,
    pub hbar_transfer: Hbar,
    pub token_transfer: Hbar,
    pub token_create: Hbar,
    pub token_associate: Hbar,
}

impl FeeSchedule {
    pub fn fee_for(&self, kind: TransactionKind) -> Hbar {
        match kind {
            TransactionKind::AccountCreate => self.account_create,
            TransactionKind::HbarTransfer => self.hbar_transfer,
            TransactionKind::TokenTransfer => self.token_transfer,
            TransactionKind::TokenCreate => self.token_create,
            TransactionKind::TokenAssociate => self.token_associate,
        }
    }

    /// Every transaction is free.
    pub fn free() -> Self {
        Self {
            account_create: Hbar::ZERO,
            hbar_transfer: Hbar::ZERO,
            token_transfer: Hbar::ZERO,
            token_create: Hbar::ZERO,
            token_associate: Hbar::ZERO,
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            account_create: Hbar::from_tinybars(5_000_000),
            hbar_transfer: Hbar::from_tinybars(10_000),
            token_transfer: Hbar::from_tinybars(100_000),
            token_create: Hbar::new(1),
            token_associate: Hbar::from_tinybars(5_000_000),
        }
    }
}

/// An account that exists before the network starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenesisAccount {
    pub account_id: AccountId,
    pub key: PublicKey,
    pub balance: Hbar,
}

impl GenesisAccount {
    pub fn new(account_id: AccountId, key: PublicKey, balance: Hbar) -> Self {
        Self { account_id, key, balance }
    }
}

/// Configuration for [`LedgerNetwork`](crate::lifecycle::LedgerNetwork).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub fees: FeeSchedule,

    /// Charged to the querying operator per balance query; the query fails if
    /// it exceeds the client's max query payment.
    pub balance_query_cost: Hbar,

    /// Node account named in every transaction body.
    pub node_account_id: AccountId,

    /// Lowest number handed out to new accounts and tokens.
    pub first_entity_num: u64,

    /// Capacity of each actor's request channel.
    pub buffer_size: usize,

    pub genesis: Vec<GenesisAccount>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            fees: FeeSchedule::default(),
            balance_query_cost: Hbar::ZERO,
            node_account_id: AccountId::from(3),
            first_entity_num: 1001,
            buffer_size: 32,
            genesis: Vec::new(),
        }
    }
}

impl NetworkConfig {
    /// Defaults, overridden by the optional config file and `LEDGER_*` variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(NETWORK_CONFIG_FILE)
    }

    /// Like [`load`](Self::load), reading the optional file `name` instead.
    pub fn load_from(name: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix(NETWORK_ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn with_genesis_account(mut self, account: GenesisAccount) -> Self {
        self.genesis.push(account);
        self
    }

    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_balance_query_cost(mut self, cost: Hbar) -> Self {
        self.balance_query_cost = cost;
        self
    }

    /// First number the shared entity sequence hands out: past every genesis account.
    pub fn next_entity_num(&self) -> u64 {
        self.genesis
            .iter()
            .map(|g| g.account_id.num + 1)
            .fold(self.first_entity_num, u64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrivateKey;

    #[test]
    fn test_entity_sequence_skips_genesis_accounts() {
        let key = PrivateKey::generate_ed25519().public_key();
        let config = NetworkConfig::default();
        assert_eq!(config.next_entity_num(), 1001);

        let config = config
            .with_genesis_account(GenesisAccount::new(AccountId::from(2), key, Hbar::new(1)))
            .with_genesis_account(GenesisAccount::new(AccountId::from(4515), key, Hbar::new(1)));
        assert_eq!(config.next_entity_num(), 4516);
    }

    fn write_config_file(contents: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("ledger-network-{nanos}.json"));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let key = PrivateKey::generate_ed25519().public_key();
        let path = write_config_file(&format!(
            r#"{{
                "buffer_size": 8,
                "balance_query_cost": 10,
                "fees": {{ "token_create": 5 }},
                "genesis": [
                    {{ "account_id": {{ "shard": 0, "realm": 0, "num": 2 }}, "key": "{key}", "balance": 700 }}
                ]
            }}"#
        ));

        let config = NetworkConfig::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.buffer_size, 8);
        assert_eq!(config.balance_query_cost, Hbar::from_tinybars(10));
        assert_eq!(config.fees.token_create, Hbar::from_tinybars(5));
        assert_eq!(config.fees.hbar_transfer, FeeSchedule::default().hbar_transfer);
        assert_eq!(config.node_account_id, AccountId::from(3));
        assert_eq!(
            config.genesis,
            vec![GenesisAccount::new(AccountId::from(2), key, Hbar::from_tinybars(700))]
        );
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = NetworkConfig::load_from("ledger-network-does-not-exist").unwrap();
        assert_eq!(config.fees, FeeSchedule::default());
        assert_eq!(config.first_entity_num, 1001);
    }
}
