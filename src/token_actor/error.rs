//! Error types for the Token actor.

use crate::model::Status;
use thiserror::Error;

/// Errors that can occur during token operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TokenError {
    /// The token definition breaks a ledger rule.
    #[error("Invalid token definition: {0}")]
    Invalid(Status),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for TokenError {
    fn from(msg: String) -> Self {
        TokenError::ActorCommunicationError(msg)
    }
}
