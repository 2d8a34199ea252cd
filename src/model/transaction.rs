//! Transaction bodies and their signed envelope.
//!
//! A [`TransactionBody`] is serialised once, when the transaction is frozen, and the
//! resulting bytes are what every signature covers. The ledger decodes the body back
//! out of [`SignedTransaction::body_bytes`], so what gets applied is exactly what was signed.

use crate::model::{AccountId, Hbar, PublicKey, TokenId, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Display};

/// One leg of a native-currency transfer. Negative amounts are debits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HbarTransfer {
    pub account_id: AccountId,
    pub amount: Hbar,
}

/// One leg of a token transfer, in the token's smallest unit. Negative amounts are debits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub token_id: TokenId,
    pub account_id: AccountId,
    pub amount: i64,
}

/// Whether a token's supply is capped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSupplyType {
    #[default]
    Infinite,
    Finite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenCreateData {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub initial_supply: u64,
    pub treasury_account_id: Option<AccountId>,
    pub supply_type: TokenSupplyType,
    /// Zero for infinite supply.
    pub max_supply: u64,
    pub supply_key: Option<PublicKey>,
}

/// What a transaction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionData {
    AccountCreate {
        key: PublicKey,
        initial_balance: Hbar,
    },
    Transfer {
        hbar_transfers: Vec<HbarTransfer>,
        token_transfers: Vec<TokenTransfer>,
    },
    TokenCreate(TokenCreateData),
    TokenAssociate {
        account_id: AccountId,
        token_ids: Vec<TokenId>,
    },
}

impl TransactionData {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionData::AccountCreate { .. } => TransactionKind::AccountCreate,
            TransactionData::Transfer { token_transfers, .. } if !token_transfers.is_empty() => {
                TransactionKind::TokenTransfer
            }
            TransactionData::Transfer { .. } => TransactionKind::HbarTransfer,
            TransactionData::TokenCreate(_) => TransactionKind::TokenCreate,
            TransactionData::TokenAssociate { .. } => TransactionKind::TokenAssociate,
        }
    }
}

/// Coarse classification of a transaction, used for fee lookup and test expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    AccountCreate,
    HbarTransfer,
    TokenTransfer,
    TokenCreate,
    TokenAssociate,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::AccountCreate => "account_create",
            TransactionKind::HbarTransfer => "hbar_transfer",
            TransactionKind::TokenTransfer => "token_transfer",
            TransactionKind::TokenCreate => "token_create",
            TransactionKind::TokenAssociate => "token_associate",
        };
        f.write_str(name)
    }
}

/// The signed part of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub transaction_id: TransactionId,
    pub node_account_id: AccountId,
    pub max_transaction_fee: Hbar,
    pub data: TransactionData,
}

impl TransactionBody {
    pub fn payer(&self) -> AccountId {
        self.transaction_id.account_id
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub public_key: PublicKey,
    pub signature: Vec<u8>,
}

/// Frozen body bytes plus the signatures collected over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction_id: TransactionId,
    pub body_bytes: Vec<u8>,
    pub signatures: Vec<SignaturePair>,
}

impl SignedTransaction {
    pub fn body(&self) -> Result<TransactionBody, serde_json::Error> {
        TransactionBody::from_bytes(&self.body_bytes)
    }

    pub fn is_signed_by(&self, key: &PublicKey) -> bool {
        self.signatures.iter().any(|pair| pair.public_key == *key)
    }

    /// Keys whose signatures verify against the body bytes, or `None` if any
    /// attached signature is invalid.
    pub fn verified_signers(&self) -> Option<HashSet<PublicKey>> {
        let mut signers = HashSet::new();
        for pair in &self.signatures {
            if !pair.public_key.verify(&self.body_bytes, &pair.signature) {
                return None;
            }
            signers.insert(pair.public_key);
        }
        Some(signers)
    }
}
