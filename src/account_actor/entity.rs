//! Ledger accounts and their [`ActorEntity`] implementation.

use super::error::AccountError;
use crate::framework::ActorEntity;
use crate::model::{AccountBalance, AccountId, Hbar, PublicKey, TokenId};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// An account on the simulated ledger.
///
/// A token appears in `token_balances` once it is associated, even with a zero balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub key: PublicKey,
    pub balance: Hbar,
    pub token_balances: BTreeMap<TokenId, u64>,
}

impl Account {
    pub fn new(id: AccountId, key: PublicKey, balance: Hbar) -> Self {
        Self {
            id,
            key,
            balance,
            token_balances: BTreeMap::new(),
        }
    }

    pub fn is_associated(&self, token_id: &TokenId) -> bool {
        self.token_balances.contains_key(token_id)
    }

    pub fn token_balance(&self, token_id: &TokenId) -> Option<u64> {
        self.token_balances.get(token_id).copied()
    }

    pub fn to_balance(&self) -> AccountBalance {
        AccountBalance {
            account_id: self.id,
            hbars: self.balance,
            tokens: self.token_balances.clone(),
        }
    }
}

/// Payload for opening a new account.
#[derive(Debug, Clone)]
pub struct AccountCreate {
    pub key: PublicKey,
    pub initial_balance: Hbar,
}

/// Balance changes applied by the transaction actor once a transaction has been validated.
#[derive(Debug, Clone)]
pub enum AccountAction {
    /// Credit (positive) or debit (negative) the hbar balance.
    AdjustHbar(Hbar),
    AssociateToken(TokenId),
    /// Credit (positive) or debit (negative) an associated token balance.
    AdjustToken { token_id: TokenId, amount: i64 },
}

/// Results from AccountActions - variants match 1:1 with AccountAction
#[derive(Debug, Clone, PartialEq)]
pub enum AccountActionResult {
    AdjustHbar(Hbar),
    AssociateToken,
    AdjustToken(u64),
}

#[async_trait]
impl ActorEntity for Account {
    type Id = AccountId;
    type Create = AccountCreate;
    type Action = AccountAction;
    type ActionResult = AccountActionResult;
    type Context = ();
    type Error = AccountError;

    fn from_create_params(id: AccountId, params: AccountCreate) -> Result<Self, AccountError> {
        if params.initial_balance.is_negative() {
            return Err(AccountError::InvalidInitialBalance(params.initial_balance));
        }
        Ok(Self::new(id, params.key, params.initial_balance))
    }

    async fn handle_action(&mut self, action: AccountAction, _ctx: &()) -> Result<AccountActionResult, AccountError> {
        match action {
            AccountAction::AdjustHbar(amount) => {
                let balance = self.balance.checked_add(amount).ok_or(AccountError::Overflow(self.id))?;
                if balance.is_negative() {
                    return Err(AccountError::InsufficientBalance {
                        account_id: self.id,
                        balance: self.balance,
                        requested: -amount,
                    });
                }
                self.balance = balance;
                Ok(AccountActionResult::AdjustHbar(balance))
            }
            AccountAction::AssociateToken(token_id) => {
                if self.is_associated(&token_id) {
                    return Err(AccountError::TokenAlreadyAssociated { account_id: self.id, token_id });
                }
                self.token_balances.insert(token_id, 0);
                Ok(AccountActionResult::AssociateToken)
            }
            AccountAction::AdjustToken { token_id, amount } => {
                let account_id = self.id;
                let held = self
                    .token_balances
                    .get_mut(&token_id)
                    .ok_or(AccountError::TokenNotAssociated { account_id, token_id })?;
                let updated = if amount < 0 {
                    held.checked_sub(amount.unsigned_abs())
                        .ok_or(AccountError::InsufficientTokenBalance {
                            account_id,
                            token_id,
                            balance: *held,
                            requested: amount.unsigned_abs(),
                        })?
                } else {
                    held.checked_add(amount as u64).ok_or(AccountError::Overflow(account_id))?
                };
                *held = updated;
                Ok(AccountActionResult::AdjustToken(updated))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrivateKey;

    fn account() -> Account {
        Account::new(AccountId::from(1001), PrivateKey::generate_ed25519().public_key(), Hbar::from_tinybars(100))
    }

    #[tokio::test]
    async fn test_hbar_debit_cannot_overdraw() {
        let mut acct = account();
        let ok = acct.handle_action(AccountAction::AdjustHbar(Hbar::from_tinybars(-40)), &()).await;
        assert_eq!(ok, Ok(AccountActionResult::AdjustHbar(Hbar::from_tinybars(60))));

        let err = acct
            .handle_action(AccountAction::AdjustHbar(Hbar::from_tinybars(-61)), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InsufficientBalance { .. }));
        assert_eq!(acct.balance, Hbar::from_tinybars(60));
    }

    #[tokio::test]
    async fn test_token_balances_require_association() {
        let mut acct = account();
        let token = TokenId::from(1500);
        let err = acct
            .handle_action(AccountAction::AdjustToken { token_id: token, amount: 5 }, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(crate::model::Status::TokenNotAssociatedToAccount));

        acct.handle_action(AccountAction::AssociateToken(token), &()).await.unwrap();
        assert_eq!(acct.token_balance(&token), Some(0));
        let again = acct.handle_action(AccountAction::AssociateToken(token), &()).await;
        assert!(matches!(again, Err(AccountError::TokenAlreadyAssociated { .. })));

        acct.handle_action(AccountAction::AdjustToken { token_id: token, amount: 5 }, &()).await.unwrap();
        let overdraw = acct
            .handle_action(AccountAction::AdjustToken { token_id: token, amount: -6 }, &())
            .await;
        assert!(matches!(overdraw, Err(AccountError::InsufficientTokenBalance { balance: 5, requested: 6, .. })));
    }

    #[test]
    fn test_negative_initial_balance_is_rejected() {
        let params = AccountCreate {
            key: PrivateKey::generate_ed25519().public_key(),
            initial_balance: Hbar::from_tinybars(-1),
        };
        assert!(Account::from_create_params(AccountId::from(5), params).is_err());
    }
}
