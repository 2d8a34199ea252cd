//! Transaction builders and the freeze/sign/execute life cycle.
//!
//! ```ignore
//! let receipt = TokenAssociateTransaction::new()
//!     .account_id(new_account_id)
//!     .token_ids([token_id])
//!     .freeze_with(&client)?
//!     .sign(&new_account_key)
//!     .execute(&client)
//!     .await?
//!     .get_receipt(&client)
//!     .await?;
//! ```

use crate::model::{
    AccountId, Hbar, HbarTransfer, PrivateKey, PublicKey, SignaturePair, SignedTransaction, TokenCreateData,
    TokenId, TokenSupplyType, TokenTransfer, TransactionBody, TransactionData, TransactionId, TransactionKind,
    TransactionReceipt,
};
use crate::sdk::{Client, SdkError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// A transaction under construction.
///
/// Implementors only describe their body; freezing and execution are shared.
#[async_trait]
pub trait Transaction: Send + Sync {
    /// The body this builder describes, or the first required field still unset.
    fn data(&self) -> Result<TransactionData, SdkError>;

    /// Fixes payer, transaction id, node and max fee, and serialises the body
    /// to the bytes every signature will cover.
    fn freeze_with(&self, client: &Client) -> Result<FrozenTransaction, SdkError> {
        let operator = client.operator()?;
        let body = TransactionBody {
            transaction_id: TransactionId::generate(operator.account_id),
            node_account_id: client.node_account_id(),
            max_transaction_fee: client.max_transaction_fee(),
            data: self.data()?,
        };
        FrozenTransaction::new(body)
    }

    /// Freezes with `client`, signs as the operator and submits.
    async fn execute(&self, client: &Client) -> Result<TransactionResponse, SdkError> {
        self.freeze_with(client)?.execute(client).await
    }
}

/// A transaction whose body bytes are fixed and can collect signatures.
#[derive(Debug, Clone)]
pub struct FrozenTransaction {
    body: TransactionBody,
    signed: SignedTransaction,
}

impl FrozenTransaction {
    fn new(body: TransactionBody) -> Result<Self, SdkError> {
        let body_bytes = body.to_bytes()?;
        let signed = SignedTransaction {
            transaction_id: body.transaction_id,
            body_bytes,
            signatures: Vec::new(),
        };
        Ok(Self { body, signed })
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.body.transaction_id
    }

    pub fn kind(&self) -> TransactionKind {
        self.body.data.kind()
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    /// Adds a signature over the frozen bytes. Signing twice with the same key is a no-op.
    pub fn sign(mut self, key: &PrivateKey) -> Self {
        let public_key = key.public_key();
        if !self.signed.is_signed_by(&public_key) {
            self.signed.signatures.push(SignaturePair {
                public_key,
                signature: key.sign(&self.signed.body_bytes),
            });
        }
        self
    }

    pub fn is_signed_by(&self, key: &PublicKey) -> bool {
        self.signed.is_signed_by(key)
    }

    pub fn to_signed(&self) -> &SignedTransaction {
        &self.signed
    }

    /// Adds the operator signature if missing and submits to the client's ledger.
    #[instrument(skip_all, fields(transaction_id = %self.body.transaction_id, kind = %self.body.data.kind()))]
    pub async fn execute(self, client: &Client) -> Result<TransactionResponse, SdkError> {
        let operator = client.operator()?;
        let signed = self.sign(&operator.private_key).signed;
        debug!(signatures = signed.signatures.len(), "Submitting");

        let transaction_id = client.ledger().submit(signed).await?;
        Ok(TransactionResponse {
            transaction_id,
            node_account_id: client.node_account_id(),
        })
    }
}

/// Handle to a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    pub node_account_id: AccountId,
}

impl TransactionResponse {
    /// Waits for the receipt and fails unless its status is `SUCCESS`.
    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt, SdkError> {
        let receipt = client.ledger().receipt(self.transaction_id).await?;
        if !receipt.status.is_success() {
            return Err(SdkError::ReceiptStatus {
                transaction_id: self.transaction_id,
                status: receipt.status,
            });
        }
        Ok(receipt)
    }
}

/// Typed access to the identifiers a receipt may carry.
pub trait ReceiptExt {
    fn created_account_id(&self) -> Result<AccountId, SdkError>;
    fn created_token_id(&self) -> Result<TokenId, SdkError>;
}

impl ReceiptExt for TransactionReceipt {
    fn created_account_id(&self) -> Result<AccountId, SdkError> {
        self.account_id.ok_or(SdkError::MissingReceiptField {
            transaction_id: self.transaction_id,
            field: "account id",
        })
    }

    fn created_token_id(&self) -> Result<TokenId, SdkError> {
        self.token_id.ok_or(SdkError::MissingReceiptField {
            transaction_id: self.transaction_id,
            field: "token id",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccountCreateTransaction {
    key: Option<PublicKey>,
    initial_balance: Hbar,
}

impl AccountCreateTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: PublicKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn initial_balance(mut self, balance: Hbar) -> Self {
        self.initial_balance = balance;
        self
    }
}

impl Transaction for AccountCreateTransaction {
    fn data(&self) -> Result<TransactionData, SdkError> {
        Ok(TransactionData::AccountCreate {
            key: self.key.ok_or(SdkError::IncompleteTransaction("key"))?,
            initial_balance: self.initial_balance,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransferTransaction {
    hbar_transfers: Vec<HbarTransfer>,
    token_transfers: Vec<TokenTransfer>,
}

impl TransferTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hbar_transfer(mut self, account_id: AccountId, amount: Hbar) -> Self {
        self.hbar_transfers.push(HbarTransfer { account_id, amount });
        self
    }

    pub fn add_token_transfer(mut self, token_id: TokenId, account_id: AccountId, amount: i64) -> Self {
        self.token_transfers.push(TokenTransfer {
            token_id,
            account_id,
            amount,
        });
        self
    }
}

impl Transaction for TransferTransaction {
    fn data(&self) -> Result<TransactionData, SdkError> {
        Ok(TransactionData::Transfer {
            hbar_transfers: self.hbar_transfers.clone(),
            token_transfers: self.token_transfers.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TokenCreateTransaction {
    data: TokenCreateData,
}

impl Default for TokenCreateTransaction {
    fn default() -> Self {
        Self {
            data: TokenCreateData {
                name: String::new(),
                symbol: String::new(),
                decimals: 0,
                initial_supply: 0,
                treasury_account_id: None,
                supply_type: TokenSupplyType::Infinite,
                max_supply: 0,
                supply_key: None,
            },
        }
    }
}

impl TokenCreateTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.data.name = name.into();
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.data.symbol = symbol.into();
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.data.decimals = decimals;
        self
    }

    pub fn initial_supply(mut self, supply: u64) -> Self {
        self.data.initial_supply = supply;
        self
    }

    pub fn treasury_account_id(mut self, account_id: AccountId) -> Self {
        self.data.treasury_account_id = Some(account_id);
        self
    }

    pub fn supply_type(mut self, supply_type: TokenSupplyType) -> Self {
        self.data.supply_type = supply_type;
        self
    }

    pub fn max_supply(mut self, max_supply: u64) -> Self {
        self.data.max_supply = max_supply;
        self
    }

    pub fn supply_key(mut self, key: PublicKey) -> Self {
        self.data.supply_key = Some(key);
        self
    }
}

impl Transaction for TokenCreateTransaction {
    fn data(&self) -> Result<TransactionData, SdkError> {
        Ok(TransactionData::TokenCreate(self.data.clone()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenAssociateTransaction {
    account_id: Option<AccountId>,
    token_ids: Vec<TokenId>,
}

impl TokenAssociateTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn token_ids(mut self, token_ids: impl IntoIterator<Item = TokenId>) -> Self {
        self.token_ids = token_ids.into_iter().collect();
        self
    }
}

impl Transaction for TokenAssociateTransaction {
    fn data(&self) -> Result<TransactionData, SdkError> {
        Ok(TransactionData::TokenAssociate {
            account_id: self.account_id.ok_or(SdkError::IncompleteTransaction("account id"))?,
            token_ids: self.token_ids.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::sdk::mock::{LedgerCall, MockLedger};
    use crate::sdk::LedgerError;
    use std::sync::Arc;

    fn client(ledger: &Arc<MockLedger>, operator_key: &PrivateKey) -> Client {
        Client::new(ledger.clone()).with_operator(AccountId::from(2), operator_key.clone())
    }

    #[test]
    fn test_freeze_requires_operator_and_complete_body() {
        let ledger = Arc::new(MockLedger::new());
        let without_operator = Client::new(ledger.clone());
        let key = PrivateKey::generate_ed25519();

        let err = AccountCreateTransaction::new()
            .key(key.public_key())
            .freeze_with(&without_operator)
            .unwrap_err();
        assert_eq!(err, SdkError::MissingOperator);

        let err = AccountCreateTransaction::new().freeze_with(&client(&ledger, &key)).unwrap_err();
        assert_eq!(err, SdkError::IncompleteTransaction("key"));
    }

    #[test]
    fn test_freeze_fixes_payer_and_fee() {
        let ledger = Arc::new(MockLedger::new());
        let operator_key = PrivateKey::generate_ed25519();
        let client = client(&ledger, &operator_key).with_max_transaction_fee(Hbar::new(100));

        let frozen = TokenAssociateTransaction::new()
            .account_id(AccountId::from(1001))
            .token_ids([TokenId::from(1002)])
            .freeze_with(&client)
            .unwrap();
        assert_eq!(frozen.transaction_id().account_id, AccountId::from(2));
        assert_eq!(frozen.body().max_transaction_fee, Hbar::new(100));
        assert_eq!(frozen.kind(), TransactionKind::TokenAssociate);
        assert_eq!(frozen.to_signed().body().unwrap(), *frozen.body());
    }

    #[tokio::test]
    async fn test_execute_adds_operator_signature_once() {
        let ledger = Arc::new(MockLedger::new());
        let operator_key = PrivateKey::generate_ed25519();
        let account_key = PrivateKey::generate_ed25519();
        let client = client(&ledger, &operator_key);
        ledger.expect_token_associate().return_success();

        let frozen = TokenAssociateTransaction::new()
            .account_id(AccountId::from(1001))
            .token_ids([TokenId::from(1002)])
            .freeze_with(&client)
            .unwrap()
            .sign(&account_key)
            .sign(&operator_key);
        let response = frozen.execute(&client).await.unwrap();
        let receipt = response.get_receipt(&client).await.unwrap();
        assert_eq!(receipt.status, Status::Success);

        match &ledger.calls()[0] {
            LedgerCall::Submit { signers, .. } => {
                assert_eq!(signers.len(), 2);
                assert!(signers.contains(&account_key.public_key()));
                assert!(signers.contains(&operator_key.public_key()));
            }
            other => panic!("unexpected call {other:?}"),
        }
        ledger.verify();
    }

    #[tokio::test]
    async fn test_get_receipt_fails_on_non_success_status() {
        let ledger = Arc::new(MockLedger::new());
        let operator_key = PrivateKey::generate_ed25519();
        let client = client(&ledger, &operator_key);
        ledger.expect_transfer().return_status(Status::InsufficientAccountBalance);

        let response = TransferTransaction::new()
            .add_hbar_transfer(AccountId::from(2), Hbar::from_tinybars(-5))
            .add_hbar_transfer(AccountId::from(1001), Hbar::from_tinybars(5))
            .execute(&client)
            .await
            .unwrap();
        let err = response.get_receipt(&client).await.unwrap_err();
        assert_eq!(
            err,
            SdkError::ReceiptStatus {
                transaction_id: response.transaction_id,
                status: Status::InsufficientAccountBalance,
            }
        );
    }

    #[tokio::test]
    async fn test_precheck_rejection_surfaces_from_execute() {
        let ledger = Arc::new(MockLedger::new());
        let operator_key = PrivateKey::generate_ed25519();
        let client = client(&ledger, &operator_key);
        ledger
            .expect_account_create()
            .return_err(LedgerError::Precheck(Status::InsufficientPayerBalance));

        let err = AccountCreateTransaction::new()
            .key(PrivateKey::generate_ed25519().public_key())
            .execute(&client)
            .await
            .unwrap_err();
        assert_eq!(err, SdkError::Ledger(LedgerError::Precheck(Status::InsufficientPayerBalance)));
    }

    #[test]
    fn test_receipt_field_accessors() {
        let id = TransactionId::generate(AccountId::from(2));
        let mut receipt = TransactionReceipt::new(id, Status::Success);
        assert_eq!(
            receipt.created_token_id(),
            Err(SdkError::MissingReceiptField { transaction_id: id, field: "token id" })
        );
        receipt.account_id = Some(AccountId::from(123));
        assert_eq!(receipt.created_account_id(), Ok(AccountId::from(123)));
    }
}
