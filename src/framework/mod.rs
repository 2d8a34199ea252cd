//! Generic actor framework the simulated ledger network is built on.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that ledger entities implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns entities and processes requests one at a time
//! - [`ResourceClient`] - Type-safe handle for sending requests to an actor
//! - [`FrameworkError`] - Common error type
//!
//! # Testing
//!
//! See [`mock`] for testing an actor against mocked peers.

pub mod core;
pub mod mock;

pub use self::core::*;
