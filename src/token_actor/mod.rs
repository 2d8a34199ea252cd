//! Token resource of the simulated ledger.

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::clients::TokenClient;
use crate::framework::ResourceActor;
use crate::model::TokenId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new Token actor and its client.
pub fn new(buffer_size: usize, entity_counter: Arc<AtomicU64>) -> (ResourceActor<Token>, TokenClient) {
    let next_token_id = move || TokenId::from(entity_counter.fetch_add(1, Ordering::SeqCst));
    let (actor, generic_client) = ResourceActor::new(buffer_size, next_token_id);
    (actor, TokenClient::new(generic_client))
}
