use crate::model::{Status, TransactionId};
use crate::sdk::LedgerError;
use thiserror::Error;

/// Errors surfaced by the SDK surface ([`Client`](crate::sdk::Client), builders, queries).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SdkError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The transaction reached consensus but did not succeed.
    #[error("transaction {transaction_id} failed with status {status}")]
    ReceiptStatus {
        transaction_id: TransactionId,
        status: Status,
    },

    #[error("receipt of {transaction_id} carries no {field}")]
    MissingReceiptField {
        transaction_id: TransactionId,
        field: &'static str,
    },

    /// The receipt names an entity id that already belongs to another workflow entity.
    #[error("receipt of {transaction_id} reports id {id}, which is already {holder}")]
    ConflictingEntityId {
        transaction_id: TransactionId,
        id: String,
        holder: &'static str,
    },

    /// A transfer amount whose debit leg cannot be represented.
    #[error("transfer amount {0} cannot be debited")]
    InvalidAmount(i64),

    #[error("client has no operator")]
    MissingOperator,

    #[error("transaction is missing its {0}")]
    IncompleteTransaction(&'static str),

    #[error("query has no account id")]
    MissingAccountId,

    #[error("failed to serialize transaction body: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}
