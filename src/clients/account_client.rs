use crate::account_actor::{Account, AccountAction, AccountActionResult, AccountCreate, AccountError};
use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{AccountId, Hbar, TokenId};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Account actor.
#[derive(Clone)]
pub struct AccountClient {
    inner: ResourceClient<Account>,
}

impl AccountClient {
    pub fn new(inner: ResourceClient<Account>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Account> for AccountClient {
    type Error = AccountError;

    fn inner(&self) -> &ResourceClient<Account> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        e.into_entity_error::<AccountError>()
            .unwrap_or_else(|e| AccountError::ActorCommunicationError(e.to_string()))
    }
}

impl AccountClient {
    #[instrument(skip(self))]
    pub async fn create_account(&self, params: AccountCreate) -> Result<AccountId, AccountError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Credits (positive) or debits (negative) the hbar balance, returning the new balance.
    #[instrument(skip(self))]
    pub async fn adjust_hbar(&self, id: AccountId, amount: Hbar) -> Result<Hbar, AccountError> {
        match self.inner.perform_action(id, AccountAction::AdjustHbar(amount)).await {
            Ok(AccountActionResult::AdjustHbar(balance)) => Ok(balance),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn associate_token(&self, id: AccountId, token_id: TokenId) -> Result<(), AccountError> {
        match self.inner.perform_action(id, AccountAction::AssociateToken(token_id)).await {
            Ok(AccountActionResult::AssociateToken) => Ok(()),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Credits (positive) or debits (negative) a token balance, returning the new balance.
    #[instrument(skip(self))]
    pub async fn adjust_token(&self, id: AccountId, token_id: TokenId, amount: i64) -> Result<u64, AccountError> {
        match self
            .inner
            .perform_action(id, AccountAction::AdjustToken { token_id, amount })
            .await
        {
            Ok(AccountActionResult::AdjustToken(balance)) => Ok(balance),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

fn unexpected(result: AccountActionResult) -> AccountError {
    AccountError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;

    #[tokio::test]
    async fn test_entity_errors_keep_their_type() {
        let mut mock = MockClient::<Account>::new();
        let id = AccountId::from(1001);
        let rejection = AccountError::InsufficientBalance {
            account_id: id,
            balance: Hbar::from_tinybars(1),
            requested: Hbar::from_tinybars(2),
        };
        mock.expect_action(id)
            .return_err(FrameworkError::EntityError(Box::new(rejection.clone())));
        mock.expect_action(id).return_ok(AccountActionResult::AdjustHbar(Hbar::from_tinybars(3)));

        let client = AccountClient::new(mock.client());
        assert_eq!(client.adjust_hbar(id, Hbar::from_tinybars(-2)).await, Err(rejection));
        assert_eq!(client.adjust_hbar(id, Hbar::from_tinybars(2)).await, Ok(Hbar::from_tinybars(3)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_transport_errors_become_communication_errors() {
        let mut mock = MockClient::<Account>::new();
        let id = AccountId::from(7);
        mock.expect_action(id).return_err(FrameworkError::NotFound(id.to_string()));

        let client = AccountClient::new(mock.client());
        let err = client.associate_token(id, TokenId::from(8)).await.unwrap_err();
        assert!(matches!(err, AccountError::ActorCommunicationError(msg) if msg.contains("0.0.7")));
    }
}
