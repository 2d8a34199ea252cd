use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::TokenId;
use crate::token_actor::{Token, TokenCreate, TokenError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Token actor.
#[derive(Clone)]
pub struct TokenClient {
    inner: ResourceClient<Token>,
}

impl TokenClient {
    pub fn new(inner: ResourceClient<Token>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_token(&self, params: TokenCreate) -> Result<TokenId, TokenError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Token> for TokenClient {
    type Error = TokenError;

    fn inner(&self) -> &ResourceClient<Token> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        e.into_entity_error::<TokenError>()
            .unwrap_or_else(|e| TokenError::ActorCommunicationError(e.to_string()))
    }
}
