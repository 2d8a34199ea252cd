use crate::model::{AccountId, Hbar, PrivateKey};
use crate::sdk::{Ledger, SdkError};
use std::fmt;
use std::sync::Arc;

/// The account that pays for and signs submitted transactions.
#[derive(Debug, Clone)]
pub struct Operator {
    pub account_id: AccountId,
    pub private_key: PrivateKey,
}

/// A configured session with a ledger network.
///
/// Holds the operator identity and the fee and query payment ceilings applied to
/// everything submitted through it.
#[derive(Clone)]
pub struct Client {
    ledger: Arc<dyn Ledger>,
    operator: Option<Operator>,
    node_account_id: AccountId,
    max_transaction_fee: Hbar,
    max_query_payment: Hbar,
}

impl Client {
    pub const DEFAULT_MAX_TRANSACTION_FEE: Hbar = Hbar::new(2);
    pub const DEFAULT_MAX_QUERY_PAYMENT: Hbar = Hbar::new(1);

    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            ledger,
            operator: None,
            node_account_id: AccountId::from(3),
            max_transaction_fee: Self::DEFAULT_MAX_TRANSACTION_FEE,
            max_query_payment: Self::DEFAULT_MAX_QUERY_PAYMENT,
        }
    }

    pub fn with_operator(mut self, account_id: AccountId, private_key: PrivateKey) -> Self {
        self.operator = Some(Operator { account_id, private_key });
        self
    }

    pub fn with_node_account_id(mut self, node_account_id: AccountId) -> Self {
        self.node_account_id = node_account_id;
        self
    }

    pub fn with_max_transaction_fee(mut self, fee: Hbar) -> Self {
        self.max_transaction_fee = fee;
        self
    }

    pub fn with_max_query_payment(mut self, payment: Hbar) -> Self {
        self.max_query_payment = payment;
        self
    }

    pub fn operator(&self) -> Result<&Operator, SdkError> {
        self.operator.as_ref().ok_or(SdkError::MissingOperator)
    }

    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    pub fn node_account_id(&self) -> AccountId {
        self.node_account_id
    }

    pub fn max_transaction_fee(&self) -> Hbar {
        self.max_transaction_fee
    }

    pub fn max_query_payment(&self) -> Hbar {
        self.max_query_payment
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("operator", &self.operator.as_ref().map(|o| o.account_id))
            .field("node_account_id", &self.node_account_id)
            .field("max_transaction_fee", &self.max_transaction_fee)
            .field("max_query_payment", &self.max_query_payment)
            .finish()
    }
}
