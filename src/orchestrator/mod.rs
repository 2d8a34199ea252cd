//! The transaction orchestrator: a fixed, fail-fast sequence of ledger operations.
//!
//! A [`WorkflowPlan`] lists [`Step`]s whose preconditions are checked up front;
//! [`Orchestrator::run`] executes them in order against any [`Ledger`](crate::sdk::Ledger)
//! and collects a [`WorkflowReport`].

pub mod config;
pub mod error;
pub mod report;
pub mod step;
pub mod workflow;

pub use config::*;
pub use error::*;
pub use report::*;
pub use step::*;
pub use workflow::*;
