//! Error types for the Account actor.

use crate::model::{AccountId, Hbar, Status, TokenId};
use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccountError {
    /// The debit would take the balance below zero.
    #[error("Account {account_id} has {balance}, cannot debit {requested}")]
    InsufficientBalance {
        account_id: AccountId,
        balance: Hbar,
        requested: Hbar,
    },

    /// Accounts cannot be opened with a negative balance.
    #[error("Invalid initial balance: {0}")]
    InvalidInitialBalance(Hbar),

    #[error("Token {token_id} is not associated with account {account_id}")]
    TokenNotAssociated { account_id: AccountId, token_id: TokenId },

    #[error("Token {token_id} is already associated with account {account_id}")]
    TokenAlreadyAssociated { account_id: AccountId, token_id: TokenId },

    #[error("Account {account_id} holds {balance} of token {token_id}, cannot debit {requested}")]
    InsufficientTokenBalance {
        account_id: AccountId,
        token_id: TokenId,
        balance: u64,
        requested: u64,
    },

    #[error("Balance overflow on account {0}")]
    Overflow(AccountId),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl AccountError {
    /// The ledger status this error is reported as, if it is a ledger rule violation.
    pub fn status(&self) -> Option<Status> {
        match self {
            AccountError::InsufficientBalance { .. } => Some(Status::InsufficientAccountBalance),
            AccountError::InvalidInitialBalance(_) => Some(Status::InvalidInitialBalance),
            AccountError::TokenNotAssociated { .. } => Some(Status::TokenNotAssociatedToAccount),
            AccountError::TokenAlreadyAssociated { .. } => Some(Status::TokenAlreadyAssociatedToAccount),
            AccountError::InsufficientTokenBalance { .. } => Some(Status::InsufficientTokenBalance),
            AccountError::Overflow(_) => Some(Status::InvalidAccountAmounts),
            AccountError::ActorCommunicationError(_) => None,
        }
    }
}

impl From<String> for AccountError {
    fn from(msg: String) -> Self {
        AccountError::ActorCommunicationError(msg)
    }
}
