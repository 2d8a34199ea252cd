use crate::account_actor::AccountError;
use crate::clients::{AccountClient, ActorClient, TransactionClient};
use crate::model::{AccountBalance, AccountId, Hbar, SignedTransaction, Status, TransactionId, TransactionReceipt};
use crate::sdk::{Ledger, LedgerError};
use crate::transaction_actor::TransactionError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// [`Ledger`] backed by the in-process network of
/// [`LedgerNetwork`](crate::lifecycle::LedgerNetwork).
///
/// Holding one keeps the network's actors alive.
#[derive(Clone)]
pub struct NetworkLedger {
    transactions: TransactionClient,
    accounts: AccountClient,
    balance_query_cost: Hbar,
}

impl NetworkLedger {
    pub fn new(transactions: TransactionClient, accounts: AccountClient, balance_query_cost: Hbar) -> Self {
        Self {
            transactions,
            accounts,
            balance_query_cost,
        }
    }
}

fn unavailable(e: AccountError) -> LedgerError {
    LedgerError::Unavailable(e.to_string())
}

impl From<TransactionError> for LedgerError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::Precheck(status) => LedgerError::Precheck(status),
            other => LedgerError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl Ledger for NetworkLedger {
    async fn submit(&self, transaction: SignedTransaction) -> Result<TransactionId, LedgerError> {
        Ok(self.transactions.submit(transaction).await?)
    }

    #[instrument(skip(self))]
    async fn receipt(&self, transaction_id: TransactionId) -> Result<TransactionReceipt, LedgerError> {
        let record = self
            .transactions
            .get(transaction_id)
            .await?
            .ok_or(LedgerError::ReceiptNotFound(transaction_id))?;
        debug!(status = %record.receipt.status, "Receipt found");
        Ok(record.receipt)
    }

    #[instrument(skip(self))]
    async fn account_balance(
        &self,
        account_id: AccountId,
        payer: Option<AccountId>,
        max_query_payment: Hbar,
    ) -> Result<AccountBalance, LedgerError> {
        let cost = self.balance_query_cost;
        if cost > max_query_payment {
            return Err(LedgerError::Precheck(Status::InsufficientQueryPayment));
        }
        let account = self
            .accounts
            .get(account_id)
            .await
            .map_err(unavailable)?
            .ok_or(LedgerError::Precheck(Status::InvalidAccountId))?;

        if cost > Hbar::ZERO {
            let payer = payer.ok_or(LedgerError::Precheck(Status::PayerAccountNotFound))?;
            self.accounts
                .get(payer)
                .await
                .map_err(unavailable)?
                .ok_or(LedgerError::Precheck(Status::PayerAccountNotFound))?;
            match self.accounts.adjust_hbar(payer, -cost).await {
                Ok(remaining) => debug!(%payer, %cost, %remaining, "Query payment charged"),
                Err(AccountError::InsufficientBalance { .. }) => {
                    return Err(LedgerError::Precheck(Status::InsufficientPayerBalance));
                }
                Err(e) => return Err(unavailable(e)),
            }
        }
        // Reported as read before the charge.
        Ok(account.to_balance())
    }
}
