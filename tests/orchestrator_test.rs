//! Orchestrator runs against a scripted ledger.

use ledger_orchestrator::model::{AccountId, Hbar, PrivateKey, Status, TokenId, TransactionData, TransactionKind};
use ledger_orchestrator::orchestrator::{
    AmountPair, ConfigurationError, Orchestrator, Step, StepOutcome, WorkflowConfig, WorkflowError, WorkflowPlan,
    ACCOUNT_ID_VAR, PRIVATE_KEY_VAR,
};
use ledger_orchestrator::sdk::mock::{LedgerCall, MockLedger};
use ledger_orchestrator::sdk::{LedgerError, SdkError};
use std::sync::Arc;

const OPERATOR: AccountId = AccountId::new(0, 0, 2);
const NEW_ACCOUNT: AccountId = AccountId::new(0, 0, 123);
const TOKEN: TokenId = TokenId::new(0, 0, 456);

fn orchestrator(ledger: &Arc<MockLedger>, config: WorkflowConfig) -> Orchestrator {
    Orchestrator::new(config, ledger.clone())
}

fn config() -> WorkflowConfig {
    WorkflowConfig::new(OPERATOR, PrivateKey::generate_ed25519())
}

fn script_full_run(ledger: &MockLedger) {
    ledger.expect_account_create().return_account(NEW_ACCOUNT);
    ledger.expect_balance(NEW_ACCOUNT).return_ok(Hbar::from_tinybars(1000));
    ledger.expect_transfer().return_success();
    ledger.expect_token_create().return_token(TOKEN);
    ledger.expect_token_associate().return_success();
    ledger.expect_token_transfer().return_success();
}

#[tokio::test]
async fn test_end_to_end_reports_every_outcome_in_order() {
    let ledger = Arc::new(MockLedger::new());
    script_full_run(&ledger);

    let mut seen = Vec::new();
    let report = orchestrator(&ledger, config())
        .run_with(|outcome| seen.push(outcome.to_string()))
        .await
        .expect("workflow should succeed");

    assert_eq!(
        report.outcomes(),
        &[
            StepOutcome::AccountCreated(NEW_ACCOUNT),
            StepOutcome::Balance {
                account_id: NEW_ACCOUNT,
                hbars: Hbar::from_tinybars(1000),
            },
            StepOutcome::HbarTransferred(Status::Success),
            StepOutcome::TokenCreated(TOKEN),
            StepOutcome::TokenAssociated(Status::Success),
            StepOutcome::TokenTransferred(Status::Success),
        ]
    );
    assert_eq!(
        seen,
        vec![
            "The new account id is: 0.0.123",
            "The new account balance is: 1000 tinybars.",
            "The transfer transaction from my account to the new account is: SUCCESS",
            "Created token with id: 0.0.456",
            "The transaction associate status was: SUCCESS",
            "The token transfer status is: SUCCESS",
        ]
    );
    ledger.verify();
}

#[tokio::test]
async fn test_run_produces_one_account_and_one_token() {
    let ledger = Arc::new(MockLedger::new());
    script_full_run(&ledger);

    let report = orchestrator(&ledger, config()).run().await.expect("workflow should succeed");

    let submitted = ledger.submitted();
    let count = |kind: TransactionKind| submitted.iter().filter(|k| **k == kind).count();
    assert_eq!(count(TransactionKind::AccountCreate), 1);
    assert_eq!(count(TransactionKind::TokenCreate), 1);

    let new_account = report.new_account_id().expect("new account id");
    let token = report.token_id().expect("token id");
    assert_ne!(new_account, OPERATOR);
    assert_ne!(token.num, OPERATOR.num);
    assert_ne!(token.num, new_account.num);
}

#[tokio::test]
async fn test_transfers_net_to_zero() {
    let ledger = Arc::new(MockLedger::new());
    ledger.enforce_ledger_rules();
    script_full_run(&ledger);

    orchestrator(&ledger, config()).run().await.expect("workflow should succeed");

    for call in ledger.calls() {
        if let LedgerCall::Submit { body, .. } = call {
            if let TransactionData::Transfer {
                hbar_transfers,
                token_transfers,
            } = body.data
            {
                let hbar: i64 = hbar_transfers.iter().map(|leg| leg.amount.to_tinybars()).sum();
                let token: i64 = token_transfers.iter().map(|leg| leg.amount).sum();
                assert_eq!(hbar, 0);
                assert_eq!(token, 0);
            }
        }
    }
}

#[tokio::test]
async fn test_unbalanced_transfer_is_a_transaction_failure() {
    let ledger = Arc::new(MockLedger::new());
    ledger.enforce_ledger_rules();
    ledger.expect_account_create().return_account(NEW_ACCOUNT);
    ledger.expect_balance(NEW_ACCOUNT).return_ok(Hbar::from_tinybars(1000));
    ledger.expect_transfer().return_success();

    let config = config().with_hbar_transfer(AmountPair {
        debit: 1000,
        credit: 999,
    });
    let err = orchestrator(&ledger, config).run().await.unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::TransactionFailure {
            step: Step::TransferHbar,
            source: SdkError::ReceiptStatus {
                status: Status::InvalidAccountAmounts,
                ..
            },
        }
    ));
    assert_eq!(
        ledger.submitted(),
        vec![TransactionKind::AccountCreate, TransactionKind::HbarTransfer]
    );
}

#[tokio::test]
async fn test_association_must_be_signed_by_the_new_account() {
    let ledger = Arc::new(MockLedger::new());
    ledger.enforce_ledger_rules();
    // The ledger knows the new account under a key the orchestrator never sees.
    ledger.register_key(NEW_ACCOUNT, PrivateKey::generate_ed25519().public_key());
    ledger.expect_account_create().return_account(NEW_ACCOUNT);
    ledger.expect_balance(NEW_ACCOUNT).return_ok(Hbar::from_tinybars(1000));
    ledger.expect_transfer().return_success();
    ledger.expect_token_create().return_token(TOKEN);
    ledger.expect_token_associate().return_success();

    let err = orchestrator(&ledger, config()).run().await.unwrap_err();

    assert_eq!(err.step(), Some(Step::AssociateToken));
    assert!(matches!(
        err,
        WorkflowError::TransactionFailure {
            source: SdkError::ReceiptStatus {
                status: Status::InvalidSignature,
                ..
            },
            ..
        }
    ));
    assert!(!ledger.submitted().contains(&TransactionKind::TokenTransfer));
    ledger.verify();
}

#[tokio::test]
async fn test_association_signed_by_the_new_account_passes_rules() {
    let ledger = Arc::new(MockLedger::new());
    ledger.enforce_ledger_rules();
    script_full_run(&ledger);

    let report = orchestrator(&ledger, config()).run().await.expect("workflow should succeed");
    assert_eq!(report.outcomes().len(), 6);
}

#[tokio::test]
async fn test_missing_configuration_makes_no_ledger_calls() {
    let key = PrivateKey::generate_ed25519().to_string();
    let cases: Vec<(Vec<(&str, String)>, &str)> = vec![
        (vec![(PRIVATE_KEY_VAR, key.clone())], ACCOUNT_ID_VAR),
        (vec![(ACCOUNT_ID_VAR, "0.0.2".to_string())], PRIVATE_KEY_VAR),
        (
            vec![(ACCOUNT_ID_VAR, "0.0.2".to_string()), (PRIVATE_KEY_VAR, String::new())],
            PRIVATE_KEY_VAR,
        ),
    ];

    for (vars, missing) in cases {
        let ledger = Arc::new(MockLedger::new());
        let lookup = |name: &str| vars.iter().find(|(k, _)| *k == name).map(|(_, v)| v.clone());

        let err = Orchestrator::from_lookup(lookup, ledger.clone())
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err, ConfigurationError::Missing(missing));
        assert_eq!(
            WorkflowError::from(err).step(),
            None,
            "configuration errors happen before any step"
        );
        assert!(ledger.calls().is_empty());
    }
}

#[tokio::test]
async fn test_failed_account_creation_halts_the_run() {
    let ledger = Arc::new(MockLedger::new());
    ledger
        .expect_account_create()
        .return_status(Status::InsufficientPayerBalance);

    let err = orchestrator(&ledger, config()).run().await.unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::TransactionFailure {
            step: Step::CreateAccount,
            source: SdkError::ReceiptStatus {
                status: Status::InsufficientPayerBalance,
                ..
            },
        }
    ));
    let calls = ledger.calls();
    assert_eq!(calls.len(), 2, "one submission and its receipt, got {calls:?}");
    assert!(matches!(calls[1], LedgerCall::Receipt(_)));
    assert_eq!(ledger.submitted(), vec![TransactionKind::AccountCreate]);
}

#[tokio::test]
async fn test_precheck_rejection_is_a_transaction_failure() {
    let ledger = Arc::new(MockLedger::new());
    ledger.expect_account_create().return_account(NEW_ACCOUNT);
    ledger
        .expect_balance(NEW_ACCOUNT)
        .return_err(LedgerError::Precheck(Status::InsufficientQueryPayment));

    let err = orchestrator(&ledger, config()).run().await.unwrap_err();

    assert_eq!(
        err,
        WorkflowError::TransactionFailure {
            step: Step::QueryBalance,
            source: SdkError::Ledger(LedgerError::Precheck(Status::InsufficientQueryPayment)),
        }
    );
    assert_eq!(ledger.submitted(), vec![TransactionKind::AccountCreate]);
}

#[tokio::test]
async fn test_new_account_reusing_operator_id_is_rejected() {
    let ledger = Arc::new(MockLedger::new());
    ledger.expect_account_create().return_account(OPERATOR);

    let err = orchestrator(&ledger, config()).run().await.unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::TransactionFailure {
            step: Step::CreateAccount,
            source: SdkError::ConflictingEntityId { ref id, .. },
        } if id == "0.0.2"
    ));
    assert_eq!(ledger.submitted(), vec![TransactionKind::AccountCreate]);
    ledger.verify();
}

#[tokio::test]
async fn test_token_reusing_an_account_id_is_rejected() {
    for token in [TokenId::new(0, 0, 2), TokenId::new(0, 0, 123)] {
        let ledger = Arc::new(MockLedger::new());
        ledger.expect_account_create().return_account(NEW_ACCOUNT);
        ledger.expect_balance(NEW_ACCOUNT).return_ok(Hbar::from_tinybars(1000));
        ledger.expect_transfer().return_success();
        ledger.expect_token_create().return_token(token);

        let err = orchestrator(&ledger, config()).run().await.unwrap_err();

        assert_eq!(err.step(), Some(Step::CreateToken), "token {token}");
        assert!(matches!(
            err,
            WorkflowError::TransactionFailure {
                source: SdkError::ConflictingEntityId { .. },
                ..
            }
        ));
        assert!(!ledger.submitted().contains(&TransactionKind::TokenAssociate));
        ledger.verify();
    }
}

#[tokio::test]
async fn test_unrepresentable_hbar_debit_fails_before_submission() {
    let ledger = Arc::new(MockLedger::new());
    ledger.expect_account_create().return_account(NEW_ACCOUNT);
    ledger.expect_balance(NEW_ACCOUNT).return_ok(Hbar::from_tinybars(1000));

    let config = config().with_hbar_transfer(AmountPair {
        debit: i64::MIN,
        credit: 1000,
    });
    let err = orchestrator(&ledger, config).run().await.unwrap_err();

    assert_eq!(
        err,
        WorkflowError::TransactionFailure {
            step: Step::TransferHbar,
            source: SdkError::InvalidAmount(i64::MIN),
        }
    );
    assert_eq!(ledger.submitted(), vec![TransactionKind::AccountCreate]);
    ledger.verify();
}

#[tokio::test]
async fn test_unrepresentable_token_debit_fails_before_submission() {
    let ledger = Arc::new(MockLedger::new());
    ledger.expect_account_create().return_account(NEW_ACCOUNT);
    ledger.expect_balance(NEW_ACCOUNT).return_ok(Hbar::from_tinybars(1000));
    ledger.expect_transfer().return_success();
    ledger.expect_token_create().return_token(TOKEN);
    ledger.expect_token_associate().return_success();

    let config = config().with_token_transfer(AmountPair {
        debit: i64::MIN,
        credit: 10,
    });
    let err = orchestrator(&ledger, config).run().await.unwrap_err();

    assert_eq!(
        err,
        WorkflowError::TransactionFailure {
            step: Step::TransferToken,
            source: SdkError::InvalidAmount(i64::MIN),
        }
    );
    assert!(!ledger.submitted().contains(&TransactionKind::TokenTransfer));
    ledger.verify();
}

#[tokio::test]
async fn test_account_only_plan_stops_after_hbar_transfer() {
    let ledger = Arc::new(MockLedger::new());
    ledger.expect_account_create().return_account(NEW_ACCOUNT);
    ledger.expect_balance(NEW_ACCOUNT).return_ok(Hbar::from_tinybars(1000));
    ledger.expect_transfer().return_success();

    let report = orchestrator(&ledger, config())
        .with_plan(WorkflowPlan::account_only())
        .run()
        .await
        .expect("workflow should succeed");

    assert_eq!(report.outcomes().len(), 3);
    assert_eq!(report.token_id(), None);
    ledger.verify();
}
