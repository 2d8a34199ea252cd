//! Ledger entity identifiers in `shard.realm.num` form, and transaction ids.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Failure to parse an identifier string.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IdParseError {
    #[error("expected `shard.realm.num`, got `{0}`")]
    Format(String),
    #[error("invalid number `{part}` in `{input}`")]
    Number { input: String, part: String },
}

fn parse_entity_id(input: &str) -> Result<(u64, u64, u64), IdParseError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split('.').collect();
    let parse = |part: &str| {
        part.parse::<u64>().map_err(|_| IdParseError::Number {
            input: trimmed.to_string(),
            part: part.to_string(),
        })
    };
    match parts.as_slice() {
        [shard, realm, num] => Ok((parse(shard)?, parse(realm)?, parse(num)?)),
        _ => Err(IdParseError::Format(trimmed.to_string())),
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            pub shard: u64,
            pub realm: u64,
            pub num: u64,
        }

        impl $name {
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }
        }

        /// `0.0.num`
        impl From<u64> for $name {
            fn from(num: u64) -> Self {
                Self::new(0, 0, num)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, num) = parse_entity_id(s)?;
                Ok(Self::new(shard, realm, num))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }
    };
}

entity_id!(
    /// Identifier of an account on the ledger.
    AccountId
);

entity_id!(
    /// Identifier of a token on the ledger.
    TokenId
);

static LAST_VALID_START: AtomicU64 = AtomicU64::new(0);

/// Identifies a transaction by its payer and the instant it became valid.
///
/// Displayed as `payer@seconds.nanos`. Ids generated in one process are strictly
/// increasing, so two transactions frozen in the same nanosecond never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start_nanos: u64,
}

impl TransactionId {
    pub fn generate(payer: AccountId) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let previous = LAST_VALID_START
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or(now);
        Self {
            account_id: payer,
            valid_start_nanos: now.max(previous + 1),
        }
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id,
            self.valid_start_nanos / 1_000_000_000,
            self.valid_start_nanos % 1_000_000_000
        )
    }
}
