//! Transaction processing for the simulated ledger.
//!
//! Each submitted transaction becomes a [`TransactionRecord`] keyed by its
//! `TransactionId`. The record's `on_create` hook plays the part of consensus:
//! it verifies signatures, charges the fee and applies the body through the
//! account and token actors, storing the outcome as the record's receipt.

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::clients::TransactionClient;
use crate::framework::ResourceActor;

/// Creates a new Transaction actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<TransactionRecord>, TransactionClient) {
    let (actor, generic_client) = ResourceActor::keyed(buffer_size);
    (actor, TransactionClient::new(generic_client))
}
