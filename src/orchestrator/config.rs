//! Workflow configuration.
//!
//! Credentials come from the environment (or a `.env` file) only through
//! [`WorkflowConfig::from_env`]; everything downstream receives an explicit
//! [`WorkflowConfig`] value.

use crate::model::{AccountId, Hbar, IdParseError, KeyError, PrivateKey, TokenSupplyType};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

pub const ACCOUNT_ID_VAR: &str = "MY_ACCOUNT_ID";
pub const PRIVATE_KEY_VAR: &str = "MY_PRIVATE_KEY";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("environment variable {0} must be set and non-empty")]
    Missing(&'static str),

    #[error("{var} is not a valid account id: {source}")]
    InvalidAccountId {
        var: &'static str,
        #[source]
        source: IdParseError,
    },

    // The key itself is never echoed.
    #[error("{var} is not a valid ED25519 private key: {source}")]
    InvalidPrivateKey {
        var: &'static str,
        #[source]
        source: KeyError,
    },
}

/// The account paying for and signing the workflow's transactions.
#[derive(Debug, Clone)]
pub struct OperatorConfig {
    pub account_id: AccountId,
    pub private_key: PrivateKey,
}

/// A debit and a credit, both given as magnitudes. Balanced when equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountPair {
    pub debit: i64,
    pub credit: i64,
}

impl AmountPair {
    pub const fn balanced(amount: i64) -> Self {
        Self {
            debit: amount,
            credit: amount,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// The signed debit leg, or `None` if `debit` has no negation.
    pub fn debit_leg(&self) -> Option<i64> {
        self.debit.checked_neg()
    }
}

/// Definition of the fungible token the workflow creates.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpec {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub initial_supply: u64,
    pub supply_type: TokenSupplyType,
    /// Only meaningful for [`TokenSupplyType::Finite`].
    pub max_supply: u64,
}

impl Default for TokenSpec {
    fn default() -> Self {
        Self {
            name: "Maarifa".to_string(),
            symbol: "Maa".to_string(),
            decimals: 2,
            initial_supply: 10_000,
            supply_type: TokenSupplyType::Infinite,
            max_supply: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub operator: OperatorConfig,
    pub max_transaction_fee: Hbar,
    pub max_query_payment: Hbar,
    /// Balance the new account starts with, paid by the operator.
    pub initial_balance: Hbar,
    /// Tinybars moved from the operator to the new account.
    pub hbar_transfer: AmountPair,
    pub token: TokenSpec,
    /// Token units moved from the treasury to the new account.
    pub token_transfer: AmountPair,
}

impl WorkflowConfig {
    pub const DEFAULT_MAX_TRANSACTION_FEE: Hbar = Hbar::new(100);
    pub const DEFAULT_MAX_QUERY_PAYMENT: Hbar = Hbar::new(50);

    pub fn new(account_id: AccountId, private_key: PrivateKey) -> Self {
        Self {
            operator: OperatorConfig {
                account_id,
                private_key,
            },
            max_transaction_fee: Self::DEFAULT_MAX_TRANSACTION_FEE,
            max_query_payment: Self::DEFAULT_MAX_QUERY_PAYMENT,
            initial_balance: Hbar::from_tinybars(1000),
            hbar_transfer: AmountPair::balanced(1000),
            token: TokenSpec::default(),
            token_transfer: AmountPair::balanced(10),
        }
    }

    /// Reads the operator credentials from the process environment, falling back to
    /// a `.env` file in the working directory or one of its parents.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_env_and(dotenv_vars(dotenvy::dotenv_iter()))
    }

    /// Like [`from_env`](Self::from_env), with the fallback file at `path`.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        Self::from_env_and(dotenv_vars(dotenvy::from_path_iter(path)))
    }

    /// Process variables win over file entries. The process environment is left untouched.
    fn from_env_and(file_vars: HashMap<String, String>) -> Result<Self, ConfigurationError> {
        Self::from_lookup(|var| {
            std::env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .or_else(|| file_vars.get(var).cloned())
        })
    }

    /// Reads the operator credentials through `lookup`.
    ///
    /// Unset, empty and whitespace-only values all count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigurationError::Missing(var))
        };

        let account_id = required(ACCOUNT_ID_VAR)?;
        let private_key = required(PRIVATE_KEY_VAR)?;

        let account_id = account_id
            .parse::<AccountId>()
            .map_err(|source| ConfigurationError::InvalidAccountId {
                var: ACCOUNT_ID_VAR,
                source,
            })?;
        let private_key =
            PrivateKey::from_str_ed25519(&private_key).map_err(|source| ConfigurationError::InvalidPrivateKey {
                var: PRIVATE_KEY_VAR,
                source,
            })?;

        Ok(Self::new(account_id, private_key))
    }

    pub fn with_max_transaction_fee(mut self, fee: Hbar) -> Self {
        self.max_transaction_fee = fee;
        self
    }

    pub fn with_max_query_payment(mut self, payment: Hbar) -> Self {
        self.max_query_payment = payment;
        self
    }

    pub fn with_initial_balance(mut self, balance: Hbar) -> Self {
        self.initial_balance = balance;
        self
    }

    pub fn with_hbar_transfer(mut self, amounts: AmountPair) -> Self {
        self.hbar_transfer = amounts;
        self
    }

    pub fn with_token(mut self, token: TokenSpec) -> Self {
        self.token = token;
        self
    }

    pub fn with_token_transfer(mut self, amounts: AmountPair) -> Self {
        self.token_transfer = amounts;
        self
    }
}

/// Entries of a dotenv file; a missing or unreadable file yields none.
fn dotenv_vars<R: Read>(iter: Result<dotenvy::Iter<R>, dotenvy::Error>) -> HashMap<String, String> {
    iter.map(|vars| vars.filter_map(Result::ok).collect())
        .unwrap_or_default()
}
