use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Outcome code reported by the ledger for a submitted transaction or query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    InvalidTransactionBody,
    InvalidTransactionId,
    DuplicateTransaction,
    PayerAccountNotFound,
    InvalidSignature,
    InsufficientTxFee,
    InsufficientPayerBalance,
    InsufficientAccountBalance,
    InvalidAccountId,
    InvalidInitialBalance,
    InvalidAccountAmounts,
    InvalidTokenId,
    TransfersNotZeroSumForToken,
    TokenNotAssociatedToAccount,
    TokenAlreadyAssociatedToAccount,
    InsufficientTokenBalance,
    InvalidTreasuryAccountForToken,
    MissingTokenName,
    MissingTokenSymbol,
    InvalidTokenMaxSupply,
    InvalidTokenInitialSupply,
    InsufficientQueryPayment,
    InvalidNodeAccount,
}

impl Status {
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::InvalidTransactionBody => "INVALID_TRANSACTION_BODY",
            Status::InvalidTransactionId => "INVALID_TRANSACTION_ID",
            Status::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            Status::PayerAccountNotFound => "PAYER_ACCOUNT_NOT_FOUND",
            Status::InvalidSignature => "INVALID_SIGNATURE",
            Status::InsufficientTxFee => "INSUFFICIENT_TX_FEE",
            Status::InsufficientPayerBalance => "INSUFFICIENT_PAYER_BALANCE",
            Status::InsufficientAccountBalance => "INSUFFICIENT_ACCOUNT_BALANCE",
            Status::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Status::InvalidInitialBalance => "INVALID_INITIAL_BALANCE",
            Status::InvalidAccountAmounts => "INVALID_ACCOUNT_AMOUNTS",
            Status::InvalidTokenId => "INVALID_TOKEN_ID",
            Status::TransfersNotZeroSumForToken => "TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN",
            Status::TokenNotAssociatedToAccount => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
            Status::TokenAlreadyAssociatedToAccount => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
            Status::InsufficientTokenBalance => "INSUFFICIENT_TOKEN_BALANCE",
            Status::InvalidTreasuryAccountForToken => "INVALID_TREASURY_ACCOUNT_FOR_TOKEN",
            Status::MissingTokenName => "MISSING_TOKEN_NAME",
            Status::MissingTokenSymbol => "MISSING_TOKEN_SYMBOL",
            Status::InvalidTokenMaxSupply => "INVALID_TOKEN_MAX_SUPPLY",
            Status::InvalidTokenInitialSupply => "INVALID_TOKEN_INITIAL_SUPPLY",
            Status::InsufficientQueryPayment => "INSUFFICIENT_QUERY_PAYMENT",
            Status::InvalidNodeAccount => "INVALID_NODE_ACCOUNT",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
