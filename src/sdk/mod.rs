//! Client-side surface for talking to a ledger.
//!
//! Everything here goes through the [`Ledger`] trait, so the same builders and
//! queries run against the in-process network ([`NetworkLedger`]) or a
//! scripted one ([`mock::MockLedger`]).

pub mod client;
pub mod error;
pub mod ledger;
pub mod mock;
pub mod network_ledger;
pub mod query;
pub mod transaction;

pub use client::*;
pub use error::*;
pub use ledger::*;
pub use network_ledger::*;
pub use query::*;
pub use transaction::*;
