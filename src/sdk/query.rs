use crate::model::{AccountBalance, AccountId};
use crate::sdk::{Client, SdkError};
use tracing::instrument;

/// Reads an account's hbar and token balances.
///
/// The client's operator, if any, pays for the query. Free queries do not need one.
#[derive(Debug, Clone, Default)]
pub struct AccountBalanceQuery {
    account_id: Option<AccountId>,
}

impl AccountBalanceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[instrument(skip_all, fields(account_id = ?self.account_id))]
    pub async fn execute(&self, client: &Client) -> Result<AccountBalance, SdkError> {
        let account_id = self.account_id.ok_or(SdkError::MissingAccountId)?;
        let payer = client.operator().ok().map(|operator| operator.account_id);
        let balance = client
            .ledger()
            .account_balance(account_id, payer, client.max_query_payment())
            .await?;
        Ok(balance)
    }
}
