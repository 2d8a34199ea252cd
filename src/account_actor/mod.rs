//! Account resource of the simulated ledger: hbar and token balances per account.

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::clients::AccountClient;
use crate::framework::ResourceActor;
use crate::model::AccountId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new Account actor and its client.
///
/// New account numbers come from `entity_counter`, which the token actor shares.
pub fn new(buffer_size: usize, entity_counter: Arc<AtomicU64>) -> (ResourceActor<Account>, AccountClient) {
    let next_account_id = move || AccountId::from(entity_counter.fetch_add(1, Ordering::SeqCst));
    let (actor, generic_client) = ResourceActor::new(buffer_size, next_account_id);
    (actor, AccountClient::new(generic_client))
}
