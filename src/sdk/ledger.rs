//! The seam between the orchestrator and whatever ledger it talks to.

use crate::model::{AccountBalance, AccountId, Hbar, SignedTransaction, Status, TransactionId, TransactionReceipt};
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a [`Ledger`] before a receipt exists.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// The ledger refused the transaction or query outright.
    #[error("precheck failed with status {0}")]
    Precheck(Status),

    #[error("no receipt for transaction {0}")]
    ReceiptNotFound(TransactionId),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// A ledger network: accepts signed transactions, reports receipts, answers balance queries.
///
/// [`NetworkLedger`](crate::sdk::NetworkLedger) talks to the in-process simulated network;
/// [`MockLedger`](crate::sdk::mock::MockLedger) answers from scripted expectations.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Submits a frozen, signed transaction.
    async fn submit(&self, transaction: SignedTransaction) -> Result<TransactionId, LedgerError>;

    /// Waits for and returns the receipt of a submitted transaction.
    async fn receipt(&self, transaction_id: TransactionId) -> Result<TransactionReceipt, LedgerError>;

    /// Current balances of an account.
    ///
    /// A priced query is charged to `payer` and fails if its cost exceeds `max_query_payment`.
    async fn account_balance(
        &self,
        account_id: AccountId,
        payer: Option<AccountId>,
        max_query_payment: Hbar,
    ) -> Result<AccountBalance, LedgerError>;
}
