//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod account_client;
pub mod actor_client;
pub mod token_client;
pub mod transaction_client;

pub use account_client::*;
pub use actor_client::*;
pub use token_client::*;
pub use transaction_client::*;
