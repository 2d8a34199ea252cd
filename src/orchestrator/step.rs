use std::fmt::{self, Display};
use thiserror::Error;

/// An identifier produced by one step and consumed by later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    NewAccount,
    Token,
}

impl Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::NewAccount => f.write_str("new account"),
            Artifact::Token => f.write_str("token"),
        }
    }
}

/// One operation of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CreateAccount,
    QueryBalance,
    TransferHbar,
    CreateToken,
    AssociateToken,
    TransferToken,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::CreateAccount,
        Step::QueryBalance,
        Step::TransferHbar,
        Step::CreateToken,
        Step::AssociateToken,
        Step::TransferToken,
    ];

    /// Artifacts an earlier step must have produced.
    pub fn requires(self) -> &'static [Artifact] {
        match self {
            Step::CreateAccount | Step::CreateToken => &[],
            Step::QueryBalance | Step::TransferHbar => &[Artifact::NewAccount],
            Step::AssociateToken | Step::TransferToken => &[Artifact::NewAccount, Artifact::Token],
        }
    }

    pub fn produces(self) -> Option<Artifact> {
        match self {
            Step::CreateAccount => Some(Artifact::NewAccount),
            Step::CreateToken => Some(Artifact::Token),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::CreateAccount => "create_account",
            Step::QueryBalance => "query_balance",
            Step::TransferHbar => "transfer_hbar",
            Step::CreateToken => "create_token",
            Step::AssociateToken => "associate_token",
            Step::TransferToken => "transfer_token",
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    #[error("a workflow plan needs at least one step")]
    Empty,

    #[error("step {step} requires the {artifact}, which no earlier step produces")]
    Unsatisfied { step: Step, artifact: Artifact },

    #[error("step {step} would produce a second {artifact}")]
    DuplicateArtifact { step: Step, artifact: Artifact },
}

/// An ordered list of steps whose preconditions are known to hold.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowPlan {
    steps: Vec<Step>,
}

impl WorkflowPlan {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Result<Self, PlanError> {
        let steps: Vec<Step> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(PlanError::Empty);
        }

        let mut available: Vec<Artifact> = Vec::new();
        for &step in &steps {
            if let Some(&artifact) = step.requires().iter().find(|a| !available.contains(a)) {
                return Err(PlanError::Unsatisfied { step, artifact });
            }
            if let Some(artifact) = step.produces() {
                if available.contains(&artifact) {
                    return Err(PlanError::DuplicateArtifact { step, artifact });
                }
                available.push(artifact);
            }
        }
        Ok(Self { steps })
    }

    /// Account creation, balance query and hbar transfer.
    pub fn account_only() -> Self {
        Self {
            steps: Step::ALL[..3].to_vec(),
        }
    }

    /// Every step, in order.
    pub fn full() -> Self {
        Self {
            steps: Step::ALL.to_vec(),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl Default for WorkflowPlan {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid_plans() {
        assert_eq!(WorkflowPlan::new(Step::ALL).unwrap(), WorkflowPlan::full());
        assert_eq!(
            WorkflowPlan::new([Step::CreateAccount, Step::QueryBalance, Step::TransferHbar]).unwrap(),
            WorkflowPlan::account_only()
        );
    }

    #[test]
    fn test_rejects_unsatisfied_preconditions() {
        assert_eq!(
            WorkflowPlan::new([Step::QueryBalance]),
            Err(PlanError::Unsatisfied {
                step: Step::QueryBalance,
                artifact: Artifact::NewAccount,
            })
        );
        assert_eq!(
            WorkflowPlan::new([Step::CreateAccount, Step::AssociateToken, Step::CreateToken]),
            Err(PlanError::Unsatisfied {
                step: Step::AssociateToken,
                artifact: Artifact::Token,
            })
        );
    }

    #[test]
    fn test_rejects_empty_and_duplicate_producers() {
        assert_eq!(WorkflowPlan::new(Vec::new()), Err(PlanError::Empty));
        assert_eq!(
            WorkflowPlan::new([Step::CreateToken, Step::CreateToken]),
            Err(PlanError::DuplicateArtifact {
                step: Step::CreateToken,
                artifact: Artifact::Token,
            })
        );
    }

    #[test]
    fn test_token_steps_run_without_balance_query() {
        let plan = WorkflowPlan::new([Step::CreateToken, Step::CreateAccount, Step::AssociateToken]).unwrap();
        assert_eq!(plan.steps().len(), 3);
    }
}
