//! Ledger value types shared by the SDK surface, the simulated network and the orchestrator.

pub mod hbar;
pub mod id;
pub mod key;
pub mod receipt;
pub mod status;
pub mod transaction;

pub use hbar::*;
pub use id::*;
pub use key::*;
pub use receipt::*;
pub use status::*;
pub use transaction::*;
