//! Error types for the Transaction actor.

use crate::account_actor::AccountError;
use crate::model::Status;
use crate::token_actor::TokenError;
use thiserror::Error;

/// Errors that stop a transaction from being recorded at all.
///
/// Rule violations found after the fee is charged are not errors: they are recorded
/// as the receipt status.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransactionError {
    /// The transaction was rejected before reaching consensus.
    #[error("Precheck failed: {0}")]
    Precheck(Status),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Token(#[from] TokenError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for TransactionError {
    fn from(msg: String) -> Self {
        TransactionError::ActorCommunicationError(msg)
    }
}
