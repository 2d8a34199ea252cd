//! Fungible tokens and their [`ActorEntity`] implementation.

use super::error::TokenError;
use crate::framework::ActorEntity;
use crate::model::{AccountId, PublicKey, Status, TokenCreateData, TokenId, TokenSupplyType};
use async_trait::async_trait;

/// A fungible token on the simulated ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: TokenId,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub total_supply: u64,
    pub treasury_account_id: AccountId,
    pub supply_type: TokenSupplyType,
    pub max_supply: u64,
    pub supply_key: Option<PublicKey>,
}

/// Payload for creating a token. The treasury has already been resolved and checked.
#[derive(Debug, Clone)]
pub struct TokenCreate {
    pub data: TokenCreateData,
    pub treasury_account_id: AccountId,
}

/// Checks a token definition against the supply and naming rules.
pub fn validate_definition(data: &TokenCreateData) -> Result<(), Status> {
    if data.name.trim().is_empty() {
        return Err(Status::MissingTokenName);
    }
    if data.symbol.trim().is_empty() {
        return Err(Status::MissingTokenSymbol);
    }
    if data.initial_supply > i64::MAX as u64 {
        return Err(Status::InvalidTokenInitialSupply);
    }
    match data.supply_type {
        TokenSupplyType::Infinite if data.max_supply != 0 => Err(Status::InvalidTokenMaxSupply),
        TokenSupplyType::Finite if data.max_supply == 0 => Err(Status::InvalidTokenMaxSupply),
        TokenSupplyType::Finite if data.initial_supply > data.max_supply => {
            Err(Status::InvalidTokenInitialSupply)
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl ActorEntity for Token {
    type Id = TokenId;
    type Create = TokenCreate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = TokenError;

    fn from_create_params(id: TokenId, params: TokenCreate) -> Result<Self, TokenError> {
        validate_definition(&params.data).map_err(TokenError::Invalid)?;
        let data = params.data;
        Ok(Self {
            id,
            name: data.name,
            symbol: data.symbol,
            decimals: data.decimals,
            total_supply: data.initial_supply,
            treasury_account_id: params.treasury_account_id,
            supply_type: data.supply_type,
            max_supply: data.max_supply,
            supply_key: data.supply_key,
        })
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), TokenError> {
        Ok(())
    }
}
