use super::step::Step;
use crate::model::{AccountId, Hbar, Status, TokenId};
use std::fmt::{self, Display};

/// What a completed step reported.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    AccountCreated(AccountId),
    Balance { account_id: AccountId, hbars: Hbar },
    HbarTransferred(Status),
    TokenCreated(TokenId),
    TokenAssociated(Status),
    TokenTransferred(Status),
}

impl StepOutcome {
    pub fn step(&self) -> Step {
        match self {
            StepOutcome::AccountCreated(_) => Step::CreateAccount,
            StepOutcome::Balance { .. } => Step::QueryBalance,
            StepOutcome::HbarTransferred(_) => Step::TransferHbar,
            StepOutcome::TokenCreated(_) => Step::CreateToken,
            StepOutcome::TokenAssociated(_) => Step::AssociateToken,
            StepOutcome::TokenTransferred(_) => Step::TransferToken,
        }
    }
}

impl Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::AccountCreated(id) => write!(f, "The new account id is: {id}"),
            StepOutcome::Balance { hbars, .. } => {
                write!(f, "The new account balance is: {} tinybars.", hbars.to_tinybars())
            }
            StepOutcome::HbarTransferred(status) => {
                write!(f, "The transfer transaction from my account to the new account is: {status}")
            }
            StepOutcome::TokenCreated(id) => write!(f, "Created token with id: {id}"),
            StepOutcome::TokenAssociated(status) => write!(f, "The transaction associate status was: {status}"),
            StepOutcome::TokenTransferred(status) => write!(f, "The token transfer status is: {status}"),
        }
    }
}

/// Outcomes of a completed run, in step order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowReport {
    outcomes: Vec<StepOutcome>,
}

impl WorkflowReport {
    pub(crate) fn push(&mut self, outcome: StepOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    pub fn new_account_id(&self) -> Option<AccountId> {
        self.outcomes.iter().find_map(|o| match o {
            StepOutcome::AccountCreated(id) => Some(*id),
            _ => None,
        })
    }

    pub fn token_id(&self) -> Option<TokenId> {
        self.outcomes.iter().find_map(|o| match o {
            StepOutcome::TokenCreated(id) => Some(*id),
            _ => None,
        })
    }

    /// The human-readable line of every outcome.
    pub fn lines(&self) -> Vec<String> {
        self.outcomes.iter().map(ToString::to_string).collect()
    }
}
