use crate::model::{AccountId, Hbar, Status, TokenId, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Acknowledgement that a transaction reached consensus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_id: TransactionId,
    pub status: Status,
    /// Set by a successful account creation.
    pub account_id: Option<AccountId>,
    /// Set by a successful token creation.
    pub token_id: Option<TokenId>,
}

impl TransactionReceipt {
    pub fn new(transaction_id: TransactionId, status: Status) -> Self {
        Self {
            transaction_id,
            status,
            account_id: None,
            token_id: None,
        }
    }
}

/// Result of a balance query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub hbars: Hbar,
    pub tokens: BTreeMap<TokenId, u64>,
}
