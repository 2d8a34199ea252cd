//! The workflow runner.

use super::config::{ConfigurationError, WorkflowConfig};
use super::error::WorkflowError;
use super::report::{StepOutcome, WorkflowReport};
use super::step::{Artifact, Step, WorkflowPlan};
use crate::model::{AccountId, Hbar, PrivateKey, TokenId};
use crate::sdk::{
    AccountBalanceQuery, AccountCreateTransaction, Client, Ledger, ReceiptExt, SdkError, TokenAssociateTransaction,
    TokenCreateTransaction, Transaction, TransferTransaction,
};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

/// Identifiers produced so far in a run.
#[derive(Default)]
struct Artifacts {
    new_account: Option<(AccountId, PrivateKey)>,
    token: Option<TokenId>,
}

impl Artifacts {
    fn new_account(&self, step: Step) -> Result<&(AccountId, PrivateKey), WorkflowError> {
        self.new_account.as_ref().ok_or(WorkflowError::MissingArtifact {
            step,
            artifact: Artifact::NewAccount,
        })
    }

    fn token(&self, step: Step) -> Result<TokenId, WorkflowError> {
        self.token.ok_or(WorkflowError::MissingArtifact {
            step,
            artifact: Artifact::Token,
        })
    }
}

/// Runs a [`WorkflowPlan`] against a ledger, one step at a time.
///
/// Each step waits for its receipt before the next one starts, and the first
/// failure ends the run. Entities created by earlier steps stay on the ledger.
///
/// # Example
///
/// ```ignore
/// let orchestrator = Orchestrator::from_env(Arc::new(network.ledger()))?;
/// let report = orchestrator.run().await?;
/// println!("{}", report.lines().join("\n"));
/// ```
pub struct Orchestrator {
    client: Client,
    config: WorkflowConfig,
    plan: WorkflowPlan,
}

impl Orchestrator {
    /// Builds the client session from already validated configuration.
    pub fn new(config: WorkflowConfig, ledger: Arc<dyn Ledger>) -> Self {
        let client = Client::new(ledger)
            .with_operator(config.operator.account_id, config.operator.private_key.clone())
            .with_max_transaction_fee(config.max_transaction_fee)
            .with_max_query_payment(config.max_query_payment);
        Self {
            client,
            config,
            plan: WorkflowPlan::default(),
        }
    }

    /// Validates credentials from `lookup`, then builds the session.
    pub fn from_lookup<F>(lookup: F, ledger: Arc<dyn Ledger>) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = WorkflowConfig::from_lookup(lookup)?;
        Ok(Self::new(config, ledger))
    }

    /// Validates credentials from the process environment, then builds the session.
    pub fn from_env(ledger: Arc<dyn Ledger>) -> Result<Self, ConfigurationError> {
        let config = WorkflowConfig::from_env()?;
        Ok(Self::new(config, ledger))
    }

    pub fn with_plan(mut self, plan: WorkflowPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn plan(&self) -> &WorkflowPlan {
        &self.plan
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<WorkflowReport, WorkflowError> {
        self.run_with(|_| {}).await
    }

    /// Runs the plan, handing each outcome to `on_outcome` as soon as its step completes.
    pub async fn run_with<F>(&self, mut on_outcome: F) -> Result<WorkflowReport, WorkflowError>
    where
        F: FnMut(&StepOutcome) + Send,
    {
        let mut artifacts = Artifacts::default();
        let mut report = WorkflowReport::default();

        for &step in self.plan.steps() {
            let span = info_span!("step", step = %step);
            let outcome = self.run_step(step, &mut artifacts).instrument(span).await;
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(%step, error = %e, "Workflow aborted");
                    return Err(e);
                }
            };
            on_outcome(&outcome);
            report.push(outcome);
        }

        info!(steps = report.outcomes().len(), "Workflow completed");
        Ok(report)
    }

    async fn run_step(&self, step: Step, artifacts: &mut Artifacts) -> Result<StepOutcome, WorkflowError> {
        let failure = |source: SdkError| WorkflowError::TransactionFailure { step, source };
        let operator = &self.config.operator;

        let outcome = match step {
            Step::CreateAccount => {
                let key = PrivateKey::generate_ed25519();
                let receipt = AccountCreateTransaction::new()
                    .key(key.public_key())
                    .initial_balance(self.config.initial_balance)
                    .execute(&self.client)
                    .await
                    .map_err(failure)?
                    .get_receipt(&self.client)
                    .await
                    .map_err(failure)?;
                let account_id = receipt.created_account_id().map_err(failure)?;
                if account_id == operator.account_id {
                    return Err(failure(SdkError::ConflictingEntityId {
                        transaction_id: receipt.transaction_id,
                        id: account_id.to_string(),
                        holder: "the operator account",
                    }));
                }
                artifacts.new_account = Some((account_id, key));
                StepOutcome::AccountCreated(account_id)
            }
            Step::QueryBalance => {
                let (account_id, _) = artifacts.new_account(step)?;
                let balance = AccountBalanceQuery::new()
                    .account_id(*account_id)
                    .execute(&self.client)
                    .await
                    .map_err(failure)?;
                StepOutcome::Balance {
                    account_id: balance.account_id,
                    hbars: balance.hbars,
                }
            }
            Step::TransferHbar => {
                let (account_id, _) = artifacts.new_account(step)?;
                let amounts = self.config.hbar_transfer;
                if !amounts.is_balanced() {
                    warn!(debit = amounts.debit, credit = amounts.credit, "Hbar transfer does not net to zero");
                }
                let debit = amounts.debit_leg().ok_or(SdkError::InvalidAmount(amounts.debit)).map_err(failure)?;
                let receipt = TransferTransaction::new()
                    .add_hbar_transfer(operator.account_id, Hbar::from_tinybars(debit))
                    .add_hbar_transfer(*account_id, Hbar::from_tinybars(amounts.credit))
                    .execute(&self.client)
                    .await
                    .map_err(failure)?
                    .get_receipt(&self.client)
                    .await
                    .map_err(failure)?;
                StepOutcome::HbarTransferred(receipt.status)
            }
            Step::CreateToken => {
                let spec = &self.config.token;
                let supply_key = PrivateKey::generate_ed25519();
                let receipt = TokenCreateTransaction::new()
                    .name(spec.name.clone())
                    .symbol(spec.symbol.clone())
                    .decimals(spec.decimals)
                    .initial_supply(spec.initial_supply)
                    .treasury_account_id(operator.account_id)
                    .supply_type(spec.supply_type)
                    .max_supply(spec.max_supply)
                    .supply_key(supply_key.public_key())
                    .freeze_with(&self.client)
                    .map_err(failure)?
                    .sign(&operator.private_key)
                    .execute(&self.client)
                    .await
                    .map_err(failure)?
                    .get_receipt(&self.client)
                    .await
                    .map_err(failure)?;
                let token_id = receipt.created_token_id().map_err(failure)?;
                let holder = if same_entity(token_id, operator.account_id) {
                    Some("the operator account")
                } else {
                    artifacts
                        .new_account
                        .as_ref()
                        .filter(|(account_id, _)| same_entity(token_id, *account_id))
                        .map(|_| "the new account")
                };
                if let Some(holder) = holder {
                    return Err(failure(SdkError::ConflictingEntityId {
                        transaction_id: receipt.transaction_id,
                        id: token_id.to_string(),
                        holder,
                    }));
                }
                artifacts.token = Some(token_id);
                StepOutcome::TokenCreated(token_id)
            }
            Step::AssociateToken => {
                let (account_id, account_key) = artifacts.new_account(step)?;
                let token_id = artifacts.token(step)?;
                // The associating account consents by signing with its own key.
                let receipt = TokenAssociateTransaction::new()
                    .account_id(*account_id)
                    .token_ids([token_id])
                    .freeze_with(&self.client)
                    .map_err(failure)?
                    .sign(account_key)
                    .execute(&self.client)
                    .await
                    .map_err(failure)?
                    .get_receipt(&self.client)
                    .await
                    .map_err(failure)?;
                StepOutcome::TokenAssociated(receipt.status)
            }
            Step::TransferToken => {
                let (account_id, _) = artifacts.new_account(step)?;
                let token_id = artifacts.token(step)?;
                let amounts = self.config.token_transfer;
                if !amounts.is_balanced() {
                    warn!(debit = amounts.debit, credit = amounts.credit, "Token transfer does not net to zero");
                }
                let debit = amounts.debit_leg().ok_or(SdkError::InvalidAmount(amounts.debit)).map_err(failure)?;
                let receipt = TransferTransaction::new()
                    .add_token_transfer(token_id, operator.account_id, debit)
                    .add_token_transfer(token_id, *account_id, amounts.credit)
                    .freeze_with(&self.client)
                    .map_err(failure)?
                    .sign(&operator.private_key)
                    .execute(&self.client)
                    .await
                    .map_err(failure)?
                    .get_receipt(&self.client)
                    .await
                    .map_err(failure)?;
                StepOutcome::TokenTransferred(receipt.status)
            }
        };

        info!(%step, outcome = %outcome, "Step completed");
        Ok(outcome)
    }
}

/// Accounts and tokens share one entity number space.
fn same_entity(token_id: TokenId, account_id: AccountId) -> bool {
    (token_id.shard, token_id.realm, token_id.num) == (account_id.shard, account_id.realm, account_id.num)
}
