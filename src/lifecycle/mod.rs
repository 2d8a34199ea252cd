//! Runtime wiring: the simulated ledger network, its configuration and tracing setup.

pub mod config;
pub mod ledger_network;
pub mod tracing;

pub use config::*;
pub use ledger_network::*;
pub use tracing::*;
