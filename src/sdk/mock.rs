//! # Mock Ledger
//!
//! [`MockLedger`] answers [`Ledger`] requests from a queue of expectations, the
//! same way [`MockClient`](crate::framework::mock::MockClient) stands in for an actor.
//! Every request is recorded so tests can assert which calls were (not) made.
//!
//! Submitted transactions are matched by [`TransactionKind`]; the expectation
//! decides the receipt. With [`MockLedger::enforce_ledger_rules`] the mock also
//! rejects unbalanced transfers and associations not signed by the account's key.

use crate::model::{
    AccountBalance, AccountId, Hbar, PublicKey, SignedTransaction, Status, TokenId, TransactionBody,
    TransactionData, TransactionId, TransactionKind, TransactionReceipt,
};
use crate::sdk::{Ledger, LedgerError};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// A request seen by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCall {
    Submit {
        kind: TransactionKind,
        body: TransactionBody,
        signers: Vec<PublicKey>,
    },
    Receipt(TransactionId),
    AccountBalance(AccountId),
}

impl LedgerCall {
    pub fn kind(&self) -> Option<TransactionKind> {
        match self {
            LedgerCall::Submit { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Outcome {
    status: Status,
    account_id: Option<AccountId>,
    token_id: Option<TokenId>,
}

enum Expectation {
    Submit {
        kind: TransactionKind,
        response: Result<Outcome, LedgerError>,
    },
    Balance {
        account_id: AccountId,
        response: Result<Hbar, LedgerError>,
    },
}

#[derive(Default)]
struct State {
    expectations: VecDeque<Expectation>,
    calls: Vec<LedgerCall>,
    receipts: HashMap<TransactionId, TransactionReceipt>,
    keys: HashMap<AccountId, PublicKey>,
    enforce_rules: bool,
}

type Shared = Arc<Mutex<State>>;

fn lock(state: &Shared) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A scripted [`Ledger`].
///
/// # Example
/// ```ignore
/// let ledger = Arc::new(MockLedger::new());
/// ledger.expect_account_create().return_account(AccountId::from(123));
/// ledger.expect_balance(AccountId::from(123)).return_ok(Hbar::from_tinybars(1000));
///
/// let client = Client::new(ledger.clone()).with_operator(operator_id, operator_key);
/// // drive the code under test...
/// ledger.verify();
/// ```
///
/// A request that does not match the next expectation panics.
#[derive(Clone, Default)]
pub struct MockLedger {
    state: Shared,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects unbalanced transfers and associations lacking the account's signature.
    ///
    /// Account keys are learned from successful account creations or
    /// [`register_key`](Self::register_key).
    pub fn enforce_ledger_rules(&self) -> &Self {
        lock(&self.state).enforce_rules = true;
        self
    }

    /// Pins the key `account_id` is checked against, even if a later account
    /// creation for that id carries another key.
    pub fn register_key(&self, account_id: AccountId, key: PublicKey) -> &Self {
        lock(&self.state).keys.insert(account_id, key);
        self
    }

    pub fn expect_account_create(&self) -> SubmitExpectationBuilder {
        self.expect_submit(TransactionKind::AccountCreate)
    }

    pub fn expect_transfer(&self) -> SubmitExpectationBuilder {
        self.expect_submit(TransactionKind::HbarTransfer)
    }

    pub fn expect_token_transfer(&self) -> SubmitExpectationBuilder {
        self.expect_submit(TransactionKind::TokenTransfer)
    }

    pub fn expect_token_create(&self) -> SubmitExpectationBuilder {
        self.expect_submit(TransactionKind::TokenCreate)
    }

    pub fn expect_token_associate(&self) -> SubmitExpectationBuilder {
        self.expect_submit(TransactionKind::TokenAssociate)
    }

    pub fn expect_submit(&self, kind: TransactionKind) -> SubmitExpectationBuilder {
        SubmitExpectationBuilder {
            kind,
            state: self.state.clone(),
        }
    }

    pub fn expect_balance(&self, account_id: AccountId) -> BalanceExpectationBuilder {
        BalanceExpectationBuilder {
            account_id,
            state: self.state.clone(),
        }
    }

    /// Every request received so far.
    pub fn calls(&self) -> Vec<LedgerCall> {
        lock(&self.state).calls.clone()
    }

    /// Kinds of the submitted transactions, in order.
    pub fn submitted(&self) -> Vec<TransactionKind> {
        lock(&self.state).calls.iter().filter_map(LedgerCall::kind).collect()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.state).expectations.len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Checks a decoded body against the rules a real ledger would apply.
fn rule_violation(body: &TransactionBody, signers: &[PublicKey], keys: &HashMap<AccountId, PublicKey>) -> Option<Status> {
    match &body.data {
        TransactionData::Transfer {
            hbar_transfers,
            token_transfers,
        } => {
            let hbar_sum: i128 = hbar_transfers
                .iter()
                .map(|leg| i128::from(leg.amount.to_tinybars()))
                .sum();
            if hbar_sum != 0 {
                return Some(Status::InvalidAccountAmounts);
            }
            let mut token_sums: BTreeMap<TokenId, i128> = BTreeMap::new();
            for leg in token_transfers {
                *token_sums.entry(leg.token_id).or_default() += i128::from(leg.amount);
            }
            token_sums
                .values()
                .any(|sum| *sum != 0)
                .then_some(Status::TransfersNotZeroSumForToken)
        }
        TransactionData::TokenAssociate { account_id, .. } => match keys.get(account_id) {
            None => Some(Status::InvalidAccountId),
            Some(key) if !signers.contains(key) => Some(Status::InvalidSignature),
            Some(_) => None,
        },
        _ => None,
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn submit(&self, transaction: SignedTransaction) -> Result<TransactionId, LedgerError> {
        let body = transaction
            .body()
            .map_err(|_| LedgerError::Precheck(Status::InvalidTransactionBody))?;
        let signers: Vec<PublicKey> = match transaction.verified_signers() {
            Some(signers) => signers.into_iter().collect(),
            None => return Err(LedgerError::Precheck(Status::InvalidSignature)),
        };
        let kind = body.data.kind();

        let mut state = lock(&self.state);
        state.calls.push(LedgerCall::Submit {
            kind,
            body: body.clone(),
            signers: signers.clone(),
        });

        let mut outcome = match state.expectations.pop_front() {
            Some(Expectation::Submit { kind: expected, response }) => {
                assert_eq!(kind, expected, "Submitted an unexpected transaction kind");
                response?
            }
            _ => panic!("Unexpected {} submission", kind),
        };

        if state.enforce_rules {
            if let Some(status) = rule_violation(&body, &signers, &state.keys) {
                outcome = Outcome {
                    status,
                    account_id: None,
                    token_id: None,
                };
            }
        }
        if let (TransactionData::AccountCreate { key, .. }, Some(account_id)) = (&body.data, outcome.account_id) {
            if outcome.status.is_success() {
                state.keys.entry(account_id).or_insert(*key);
            }
        }

        let receipt = TransactionReceipt {
            transaction_id: body.transaction_id,
            status: outcome.status,
            account_id: outcome.account_id,
            token_id: outcome.token_id,
        };
        state.receipts.insert(body.transaction_id, receipt);
        Ok(body.transaction_id)
    }

    async fn receipt(&self, transaction_id: TransactionId) -> Result<TransactionReceipt, LedgerError> {
        let mut state = lock(&self.state);
        state.calls.push(LedgerCall::Receipt(transaction_id));
        state
            .receipts
            .get(&transaction_id)
            .cloned()
            .ok_or(LedgerError::ReceiptNotFound(transaction_id))
    }

    async fn account_balance(
        &self,
        account_id: AccountId,
        _payer: Option<AccountId>,
        _max_query_payment: Hbar,
    ) -> Result<AccountBalance, LedgerError> {
        let mut state = lock(&self.state);
        state.calls.push(LedgerCall::AccountBalance(account_id));

        match state.expectations.pop_front() {
            Some(Expectation::Balance { account_id: expected, response }) => {
                assert_eq!(account_id, expected, "Balance query for unexpected account");
                Ok(AccountBalance {
                    account_id,
                    hbars: response?,
                    tokens: BTreeMap::new(),
                })
            }
            _ => panic!("Unexpected balance query for {}", account_id),
        }
    }
}

/// Builder for submission expectations.
pub struct SubmitExpectationBuilder {
    kind: TransactionKind,
    state: Shared,
}

impl SubmitExpectationBuilder {
    fn push(self, response: Result<Outcome, LedgerError>) {
        lock(&self.state).expectations.push_back(Expectation::Submit {
            kind: self.kind,
            response,
        });
    }

    /// Receipt with the given status and no created identifier.
    pub fn return_status(self, status: Status) {
        self.push(Ok(Outcome {
            status,
            account_id: None,
            token_id: None,
        }));
    }

    pub fn return_success(self) {
        self.return_status(Status::Success);
    }

    /// Successful receipt carrying a new account id.
    pub fn return_account(self, account_id: AccountId) {
        self.push(Ok(Outcome {
            status: Status::Success,
            account_id: Some(account_id),
            token_id: None,
        }));
    }

    /// Successful receipt carrying a new token id.
    pub fn return_token(self, token_id: TokenId) {
        self.push(Ok(Outcome {
            status: Status::Success,
            account_id: None,
            token_id: Some(token_id),
        }));
    }

    /// Rejects the submission itself.
    pub fn return_err(self, error: LedgerError) {
        self.push(Err(error));
    }
}

/// Builder for balance query expectations.
pub struct BalanceExpectationBuilder {
    account_id: AccountId,
    state: Shared,
}

impl BalanceExpectationBuilder {
    pub fn return_ok(self, hbars: Hbar) {
        lock(&self.state).expectations.push_back(Expectation::Balance {
            account_id: self.account_id,
            response: Ok(hbars),
        });
    }

    pub fn return_err(self, error: LedgerError) {
        lock(&self.state).expectations.push_back(Expectation::Balance {
            account_id: self.account_id,
            response: Err(error),
        });
    }
}
