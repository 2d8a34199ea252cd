use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{SignedTransaction, Status, TransactionId};
use crate::transaction_actor::{TransactionError, TransactionRecord};
use async_trait::async_trait;
use tracing::{info, instrument};

/// Client for submitting transactions to the Transaction actor.
///
/// Submission returns once the transaction has been processed; its outcome is then
/// available as the record's receipt.
#[derive(Clone)]
pub struct TransactionClient {
    inner: ResourceClient<TransactionRecord>,
}

impl TransactionClient {
    pub fn new(inner: ResourceClient<TransactionRecord>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, transaction), fields(transaction_id = %transaction.transaction_id))]
    pub async fn submit(&self, transaction: SignedTransaction) -> Result<TransactionId, TransactionError> {
        info!("Submitting transaction");
        self.inner.create(transaction).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<TransactionRecord> for TransactionClient {
    type Error = TransactionError;

    fn inner(&self) -> &ResourceClient<TransactionRecord> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::AlreadyExists(_) => TransactionError::Precheck(Status::DuplicateTransaction),
            other => other
                .into_entity_error::<TransactionError>()
                .unwrap_or_else(|e| TransactionError::ActorCommunicationError(e.to_string())),
        }
    }
}
