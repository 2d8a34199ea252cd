//! Full runs against the in-process ledger network with all real actors.

use ledger_orchestrator::clients::ActorClient;
use ledger_orchestrator::lifecycle::{FeeSchedule, GenesisAccount, LedgerNetwork, NetworkConfig};
use ledger_orchestrator::model::{AccountId, Hbar, PrivateKey, Status, TokenId};
use ledger_orchestrator::orchestrator::{AmountPair, Orchestrator, Step, WorkflowConfig, WorkflowError};
use ledger_orchestrator::sdk::{
    AccountBalanceQuery, AccountCreateTransaction, Client, LedgerError, ReceiptExt, SdkError,
    TokenAssociateTransaction, TokenCreateTransaction, Transaction, TransferTransaction,
};
use std::sync::Arc;

const OPERATOR: AccountId = AccountId::new(0, 0, 2);

fn start_network(operator_key: &PrivateKey, config: NetworkConfig) -> LedgerNetwork {
    LedgerNetwork::start(config.with_genesis_account(GenesisAccount::new(
        OPERATOR,
        operator_key.public_key(),
        Hbar::new(10_000),
    )))
}

#[tokio::test]
async fn test_full_workflow_on_ledger_network() {
    let operator_key = PrivateKey::generate_ed25519();
    let network = start_network(&operator_key, NetworkConfig::default());

    let orchestrator = Orchestrator::new(
        WorkflowConfig::new(OPERATOR, operator_key.clone()),
        Arc::new(network.ledger()),
    );
    let report = orchestrator.run().await.expect("workflow should succeed");
    drop(orchestrator);

    let new_account_id = report.new_account_id().expect("new account id");
    let token_id = report.token_id().expect("token id");
    assert_eq!(new_account_id, AccountId::from(1001));
    assert_eq!(token_id, TokenId::from(1002));

    let lines = report.lines();
    assert_eq!(lines[1], "The new account balance is: 1000 tinybars.");
    assert_eq!(lines[5], "The token transfer status is: SUCCESS");

    let new_account = network
        .account_client
        .get(new_account_id)
        .await
        .expect("account lookup")
        .expect("account exists");
    assert_eq!(new_account.balance, Hbar::from_tinybars(2000));
    assert_eq!(new_account.token_balance(&token_id), Some(10));

    let fees = FeeSchedule::default();
    let total_fees = [
        fees.account_create,
        fees.hbar_transfer,
        fees.token_create,
        fees.token_associate,
        fees.token_transfer,
    ]
    .iter()
    .map(|fee| fee.to_tinybars())
    .sum::<i64>();
    let operator = network
        .account_client
        .get(OPERATOR)
        .await
        .expect("account lookup")
        .expect("operator exists");
    assert_eq!(
        operator.balance.to_tinybars(),
        Hbar::new(10_000).to_tinybars() - 2000 - total_fees
    );
    assert_eq!(operator.token_balance(&token_id), Some(9_990));

    let token = network
        .token_client
        .get(token_id)
        .await
        .expect("token lookup")
        .expect("token exists");
    assert_eq!(token.symbol, "Maa");
    assert_eq!(token.decimals, 2);
    assert_eq!(token.total_supply, 10_000);
    assert_eq!(token.treasury_account_id, OPERATOR);

    network.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_unbalanced_transfer_is_rejected_by_the_network() {
    let operator_key = PrivateKey::generate_ed25519();
    let network = start_network(&operator_key, NetworkConfig::default());

    let config = WorkflowConfig::new(OPERATOR, operator_key).with_hbar_transfer(AmountPair {
        debit: 1000,
        credit: 1,
    });
    let orchestrator = Orchestrator::new(config, Arc::new(network.ledger()));
    let err = orchestrator.run().await.unwrap_err();
    drop(orchestrator);

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
    // The account from the first step stays.
    let new_account = network
        .account_client
        .get(AccountId::from(1001))
        .await
        .expect("account lookup")
        .expect("account exists");
    assert_eq!(new_account.balance, Hbar::from_tinybars(1000));

    network.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_association_signed_with_the_wrong_key_fails() {
    let operator_key = PrivateKey::generate_ed25519();
    let network = start_network(&operator_key, NetworkConfig::default());
    let client = Client::new(Arc::new(network.ledger()))
        .with_operator(OPERATOR, operator_key.clone())
        .with_max_transaction_fee(Hbar::new(100));

    let account_key = PrivateKey::generate_ed25519();
    let account_id = AccountCreateTransaction::new()
        .key(account_key.public_key())
        .initial_balance(Hbar::from_tinybars(1000))
        .execute(&client)
        .await
        .expect("submitted")
        .get_receipt(&client)
        .await
        .expect("account created")
        .created_account_id()
        .expect("receipt carries account id");

    let token_id = TokenCreateTransaction::new()
        .name("Maarifa")
        .symbol("Maa")
        .initial_supply(100)
        .treasury_account_id(OPERATOR)
        .execute(&client)
        .await
        .expect("submitted")
        .get_receipt(&client)
        .await
        .expect("token created")
        .created_token_id()
        .expect("receipt carries token id");

    let associate = || {
        TokenAssociateTransaction::new()
            .account_id(account_id)
            .token_ids([token_id])
            .freeze_with(&client)
            .expect("frozen")
    };

    let response = associate()
        .sign(&PrivateKey::generate_ed25519())
        .execute(&client)
        .await
        .expect("submitted");
    let err = response.get_receipt(&client).await.unwrap_err();
    assert_eq!(
        err,
        SdkError::ReceiptStatus {
            transaction_id: response.transaction_id,
            status: Status::InvalidSignature,
        }
    );

    // Sending tokens to an unassociated account fails too.
    let err = TransferTransaction::new()
        .add_token_transfer(token_id, OPERATOR, -5)
        .add_token_transfer(token_id, account_id, 5)
        .execute(&client)
        .await
        .expect("submitted")
        .get_receipt(&client)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SdkError::ReceiptStatus {
            status: Status::TokenNotAssociatedToAccount,
            ..
        }
    ));

    associate()
        .sign(&account_key)
        .execute(&client)
        .await
        .expect("submitted")
        .get_receipt(&client)
        .await
        .expect("associated");

    let balance = AccountBalanceQuery::new()
        .account_id(account_id)
        .execute(&client)
        .await
        .expect("balance");
    assert_eq!(balance.tokens.get(&token_id), Some(&0));

    drop(client);
    network.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_prechecks_reject_before_consensus() {
    let operator_key = PrivateKey::generate_ed25519();
    let network = start_network(
        &operator_key,
        NetworkConfig::default().with_balance_query_cost(Hbar::from_tinybars(10)),
    );
    let client = Client::new(Arc::new(network.ledger())).with_operator(OPERATOR, operator_key.clone());

    let err = AccountCreateTransaction::new()
        .key(PrivateKey::generate_ed25519().public_key())
        .execute(&client.clone().with_max_transaction_fee(Hbar::from_tinybars(1)))
        .await
        .unwrap_err();
    assert_eq!(err, SdkError::Ledger(LedgerError::Precheck(Status::InsufficientTxFee)));

    let err = TransferTransaction::new()
        .execute(&client.clone().with_node_account_id(AccountId::from(9)))
        .await
        .unwrap_err();
    assert_eq!(err, SdkError::Ledger(LedgerError::Precheck(Status::InvalidNodeAccount)));

    let stranger = Client::new(Arc::new(network.ledger()))
        .with_operator(AccountId::from(77), PrivateKey::generate_ed25519());
    let err = TransferTransaction::new().execute(&stranger).await.unwrap_err();
    assert_eq!(err, SdkError::Ledger(LedgerError::Precheck(Status::PayerAccountNotFound)));

    let err = AccountBalanceQuery::new()
        .account_id(OPERATOR)
        .execute(&client.clone().with_max_query_payment(Hbar::ZERO))
        .await
        .unwrap_err();
    assert_eq!(err, SdkError::Ledger(LedgerError::Precheck(Status::InsufficientQueryPayment)));

    let err = AccountBalanceQuery::new()
        .account_id(AccountId::from(4242))
        .execute(&client)
        .await
        .unwrap_err();
    assert_eq!(err, SdkError::Ledger(LedgerError::Precheck(Status::InvalidAccountId)));

    drop(client);
    drop(stranger);
    network.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_priced_balance_query_charges_the_payer() {
    let operator_key = PrivateKey::generate_ed25519();
    let cost = Hbar::from_tinybars(10);
    let network = start_network(&operator_key, NetworkConfig::default().with_balance_query_cost(cost));
    let client = Client::new(Arc::new(network.ledger())).with_operator(OPERATOR, operator_key.clone());
    let query = AccountBalanceQuery::new().account_id(OPERATOR);

    let first = query.execute(&client).await.expect("balance");
    assert_eq!(first.hbars, Hbar::new(10_000));
    let second = query.execute(&client).await.expect("balance");
    assert_eq!(second.hbars.checked_add(cost), Some(first.hbars));

    let anonymous = Client::new(Arc::new(network.ledger()));
    let err = query.execute(&anonymous).await.unwrap_err();
    assert_eq!(err, SdkError::Ledger(LedgerError::Precheck(Status::PayerAccountNotFound)));

    let operator = network
        .account_client
        .get(OPERATOR)
        .await
        .expect("account lookup")
        .expect("operator exists");
    assert_eq!(operator.balance.checked_add(Hbar::from_tinybars(20)), Some(Hbar::new(10_000)));

    drop(client);
    drop(anonymous);
    network.shutdown().await.expect("clean shutdown");
}
