//! Transaction records and the ledger rules applied when one is created.

use super::error::TransactionError;
use crate::account_actor::{Account, AccountCreate, AccountError};
use crate::clients::{AccountClient, ActorClient, TokenClient};
use crate::framework::ActorEntity;
use crate::lifecycle::FeeSchedule;
use crate::model::{
    AccountId, Hbar, HbarTransfer, PublicKey, SignedTransaction, Status, TokenCreateData, TokenId,
    TokenTransfer, TransactionBody, TransactionData, TransactionId, TransactionReceipt,
};
use crate::token_actor::{self, TokenCreate, TokenError};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Dependencies of the Transaction actor.
#[derive(Clone)]
pub struct TransactionContext {
    pub accounts: AccountClient,
    pub tokens: TokenClient,
    pub fees: FeeSchedule,
    /// The only node this network accepts transactions through.
    pub node_account_id: AccountId,
}

/// A processed transaction and its receipt.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub body: TransactionBody,
    /// Keys whose signatures verified against the body bytes.
    pub signers: HashSet<PublicKey>,
    pub charged_fee: Hbar,
    pub receipt: TransactionReceipt,
}

/// Identifiers created by a successful transaction.
#[derive(Debug, Default)]
struct Effect {
    account_id: Option<AccountId>,
    token_id: Option<TokenId>,
}

/// Why applying a body stopped: a ledger status for the receipt, or an internal failure.
enum Rejection {
    Status(Status),
    Internal(TransactionError),
}

impl From<Status> for Rejection {
    fn from(status: Status) -> Self {
        Rejection::Status(status)
    }
}

impl From<AccountError> for Rejection {
    fn from(e: AccountError) -> Self {
        match e.status() {
            Some(status) => Rejection::Status(status),
            None => Rejection::Internal(e.into()),
        }
    }
}

impl From<TokenError> for Rejection {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid(status) => Rejection::Status(status),
            other => Rejection::Internal(other.into()),
        }
    }
}

#[async_trait]
impl ActorEntity for TransactionRecord {
    type Id = TransactionId;
    type Create = SignedTransaction;
    type Action = ();
    type ActionResult = ();
    type Context = TransactionContext;
    type Error = TransactionError;

    fn assigned_id(params: &SignedTransaction) -> Option<TransactionId> {
        Some(params.transaction_id)
    }

    /// Decodes the signed bytes and verifies every attached signature.
    fn from_create_params(id: TransactionId, signed: SignedTransaction) -> Result<Self, TransactionError> {
        let body = signed
            .body()
            .map_err(|_| TransactionError::Precheck(Status::InvalidTransactionBody))?;
        if body.transaction_id != id {
            return Err(TransactionError::Precheck(Status::InvalidTransactionId));
        }
        let signers = signed
            .verified_signers()
            .ok_or(TransactionError::Precheck(Status::InvalidSignature))?;
        Ok(Self {
            id,
            body,
            signers,
            charged_fee: Hbar::ZERO,
            receipt: TransactionReceipt::new(id, Status::Success),
        })
    }

    /// Precheck, fee, then the body itself.
    async fn on_create(&mut self, ctx: &TransactionContext) -> Result<(), TransactionError> {
        self.precheck_and_charge(ctx).await?;

        match self.apply(ctx).await {
            Ok(effect) => {
                self.receipt.account_id = effect.account_id;
                self.receipt.token_id = effect.token_id;
            }
            Err(Rejection::Status(status)) => self.receipt.status = status,
            Err(Rejection::Internal(e)) => return Err(e),
        }
        info!(
            transaction_id = %self.id,
            kind = %self.body.data.kind(),
            status = %self.receipt.status,
            fee = %self.charged_fee,
            "Reached consensus"
        );
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &TransactionContext) -> Result<(), TransactionError> {
        Ok(())
    }
}

impl TransactionRecord {
    async fn precheck_and_charge(&mut self, ctx: &TransactionContext) -> Result<(), TransactionError> {
        if self.body.node_account_id != ctx.node_account_id {
            return Err(TransactionError::Precheck(Status::InvalidNodeAccount));
        }
        let payer_id = self.body.payer();
        let payer = ctx
            .accounts
            .get(payer_id)
            .await?
            .ok_or(TransactionError::Precheck(Status::PayerAccountNotFound))?;
        if !self.signers.contains(&payer.key) {
            return Err(TransactionError::Precheck(Status::InvalidSignature));
        }

        let fee = ctx.fees.fee_for(self.body.data.kind());
        if fee > self.body.max_transaction_fee {
            return Err(TransactionError::Precheck(Status::InsufficientTxFee));
        }
        if payer.balance < fee {
            return Err(TransactionError::Precheck(Status::InsufficientPayerBalance));
        }

        ctx.accounts.adjust_hbar(payer_id, -fee).await?;
        self.charged_fee = fee;
        debug!(%payer_id, %fee, "Fee charged");
        Ok(())
    }

    async fn apply(&self, ctx: &TransactionContext) -> Result<Effect, Rejection> {
        match &self.body.data {
            TransactionData::AccountCreate { key, initial_balance } => {
                self.create_account(ctx, *key, *initial_balance).await
            }
            TransactionData::Transfer { hbar_transfers, token_transfers } => {
                self.transfer(ctx, hbar_transfers, token_transfers).await
            }
            TransactionData::TokenCreate(data) => self.create_token(ctx, data).await,
            TransactionData::TokenAssociate { account_id, token_ids } => {
                self.associate(ctx, *account_id, token_ids).await
            }
        }
    }

    async fn existing_account(&self, ctx: &TransactionContext, id: AccountId, missing: Status) -> Result<Account, Rejection> {
        match ctx.accounts.get(id).await? {
            Some(account) => Ok(account),
            None => Err(missing.into()),
        }
    }

    fn require_signature(&self, key: &PublicKey) -> Result<(), Rejection> {
        if self.signers.contains(key) {
            Ok(())
        } else {
            Err(Status::InvalidSignature.into())
        }
    }

    async fn create_account(&self, ctx: &TransactionContext, key: PublicKey, initial_balance: Hbar) -> Result<Effect, Rejection> {
        if initial_balance.is_negative() {
            return Err(Status::InvalidInitialBalance.into());
        }
        let payer = self.existing_account(ctx, self.body.payer(), Status::PayerAccountNotFound).await?;
        if payer.balance < initial_balance {
            return Err(Status::InsufficientPayerBalance.into());
        }

        ctx.accounts.adjust_hbar(payer.id, -initial_balance).await?;
        let account_id = ctx.accounts.create_account(AccountCreate { key, initial_balance }).await?;
        Ok(Effect {
            account_id: Some(account_id),
            ..Effect::default()
        })
    }

    async fn transfer(
        &self,
        ctx: &TransactionContext,
        hbar_transfers: &[HbarTransfer],
        token_transfers: &[TokenTransfer],
    ) -> Result<Effect, Rejection> {
        let mut hbar_net: BTreeMap<AccountId, i128> = BTreeMap::new();
        for leg in hbar_transfers {
            *hbar_net.entry(leg.account_id).or_default() += i128::from(leg.amount.to_tinybars());
        }
        if hbar_net.values().sum::<i128>() != 0 {
            return Err(Status::InvalidAccountAmounts.into());
        }

        let mut token_net: BTreeMap<TokenId, BTreeMap<AccountId, i128>> = BTreeMap::new();
        for leg in token_transfers {
            *token_net
                .entry(leg.token_id)
                .or_default()
                .entry(leg.account_id)
                .or_default() += i128::from(leg.amount);
        }
        if token_net.values().any(|legs| legs.values().sum::<i128>() != 0) {
            return Err(Status::TransfersNotZeroSumForToken.into());
        }

        // Validate every leg before touching any balance.
        for (&account_id, &net) in &hbar_net {
            let account = self.existing_account(ctx, account_id, Status::InvalidAccountId).await?;
            if net < 0 {
                self.require_signature(&account.key)?;
                if i128::from(account.balance.to_tinybars()) < -net {
                    return Err(Status::InsufficientAccountBalance.into());
                }
            }
        }
        for (&token_id, legs) in &token_net {
            if ctx.tokens.get(token_id).await?.is_none() {
                return Err(Status::InvalidTokenId.into());
            }
            for (&account_id, &net) in legs {
                let account = self.existing_account(ctx, account_id, Status::InvalidAccountId).await?;
                let held = account
                    .token_balance(&token_id)
                    .ok_or(Status::TokenNotAssociatedToAccount)?;
                if net < 0 {
                    self.require_signature(&account.key)?;
                    if i128::from(held) < -net {
                        return Err(Status::InsufficientTokenBalance.into());
                    }
                }
            }
        }

        for (&account_id, &net) in hbar_net.iter().filter(|(_, net)| **net != 0) {
            let amount = i64::try_from(net).map_err(|_| Status::InvalidAccountAmounts)?;
            ctx.accounts.adjust_hbar(account_id, Hbar::from_tinybars(amount)).await?;
        }
        for (&token_id, legs) in &token_net {
            for (&account_id, &net) in legs.iter().filter(|(_, net)| **net != 0) {
                let amount = i64::try_from(net).map_err(|_| Status::TransfersNotZeroSumForToken)?;
                ctx.accounts.adjust_token(account_id, token_id, amount).await?;
            }
        }
        Ok(Effect::default())
    }

    async fn create_token(&self, ctx: &TransactionContext, data: &TokenCreateData) -> Result<Effect, Rejection> {
        let treasury_id = data
            .treasury_account_id
            .ok_or(Status::InvalidTreasuryAccountForToken)?;
        let treasury = self
            .existing_account(ctx, treasury_id, Status::InvalidTreasuryAccountForToken)
            .await?;
        self.require_signature(&treasury.key)?;
        token_actor::validate_definition(data)?;

        let token_id = ctx
            .tokens
            .create_token(TokenCreate {
                data: data.clone(),
                treasury_account_id: treasury_id,
            })
            .await?;
        ctx.accounts.associate_token(treasury_id, token_id).await?;
        if data.initial_supply > 0 {
            let supply = i64::try_from(data.initial_supply).map_err(|_| Status::InvalidTokenInitialSupply)?;
            ctx.accounts.adjust_token(treasury_id, token_id, supply).await?;
        }
        Ok(Effect {
            token_id: Some(token_id),
            ..Effect::default()
        })
    }

    async fn associate(&self, ctx: &TransactionContext, account_id: AccountId, token_ids: &[TokenId]) -> Result<Effect, Rejection> {
        let account = self.existing_account(ctx, account_id, Status::InvalidAccountId).await?;
        self.require_signature(&account.key)?;

        let mut seen = HashSet::new();
        for token_id in token_ids {
            if ctx.tokens.get(*token_id).await?.is_none() {
                return Err(Status::InvalidTokenId.into());
            }
            if account.is_associated(token_id) || !seen.insert(*token_id) {
                return Err(Status::TokenAlreadyAssociatedToAccount.into());
            }
        }

        for token_id in token_ids {
            ctx.accounts.associate_token(account_id, *token_id).await?;
        }
        Ok(Effect::default())
    }
}
