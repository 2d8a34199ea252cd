use super::config::ConfigurationError;
use super::step::{Artifact, Step};
use crate::sdk::SdkError;
use thiserror::Error;

/// Why a workflow run stopped.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    /// Credentials were absent or malformed. Raised before any ledger call.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A step's submission, query or receipt failed. Later steps did not run.
    #[error("step {step} failed: {source}")]
    TransactionFailure {
        step: Step,
        #[source]
        source: SdkError,
    },

    #[error("step {step} ran without the {artifact}")]
    MissingArtifact { step: Step, artifact: Artifact },
}

impl WorkflowError {
    /// The step that failed, if the run got past configuration.
    pub fn step(&self) -> Option<Step> {
        match self {
            WorkflowError::Configuration(_) => None,
            WorkflowError::TransactionFailure { step, .. } | WorkflowError::MissingArtifact { step, .. } => {
                Some(*step)
            }
        }
    }
}
