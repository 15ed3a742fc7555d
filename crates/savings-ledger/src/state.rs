use crate::error::ContractError;
use cosmwasm_std::{Addr, StdError, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

/// Shares held per (owner, token, strategy).
const SHARES: Map<(&Addr, &Addr, &Addr), Uint128> = Map::new("shares");

/// Sum of [SHARES] over every owner, per (token, strategy).
const TOTAL_SHARES: Map<(&Addr, &Addr), Uint128> = Map::new("total_shares");

/// Allowance per (owner, token, spender), in underlying.
const ALLOWANCES: Map<(&Addr, &Addr, &Addr), Uint128> = Map::new("allowances");

const REGISTRY: Item<Addr> = Item::new("registry");

/// Get the `registry` address
/// If [`instantiate`] has not been called, it will return an [StdError::NotFound]
pub fn get_registry(storage: &dyn Storage) -> StdResult<Addr> {
    REGISTRY
        .may_load(storage)?
        .ok_or(StdError::not_found("registry"))
}

pub fn set_registry(storage: &mut dyn Storage, registry: &Addr) -> StdResult<()> {
    REGISTRY.save(storage, registry)
}

/// Account of an owner in one strategy for one token.
#[derive(Debug, Clone, Copy)]
pub struct Position<'a> {
    pub owner: &'a Addr,
    pub token: &'a Addr,
    pub strategy: &'a Addr,
}

impl<'a> Position<'a> {
    pub fn new(owner: &'a Addr, token: &'a Addr, strategy: &'a Addr) -> Self {
        Self {
            owner,
            token,
            strategy,
        }
    }

    pub fn shares(&self, storage: &dyn Storage) -> StdResult<Uint128> {
        SHARES
            .may_load(storage, (self.owner, self.token, self.strategy))
            .map(|shares| shares.unwrap_or_default())
    }

    /// Credit `shares`, keeping [TOTAL_SHARES] in step.
    pub fn add_shares(&self, storage: &mut dyn Storage, shares: Uint128) -> StdResult<Uint128> {
        let balance = self.shares(storage)?.checked_add(shares)?;
        SHARES.save(storage, (self.owner, self.token, self.strategy), &balance)?;

        let total = get_total_shares(storage, self.token, self.strategy)?.checked_add(shares)?;
        TOTAL_SHARES.save(storage, (self.token, self.strategy), &total)?;
        Ok(balance)
    }

    /// Debit `shares`, keeping [TOTAL_SHARES] in step.
    pub fn sub_shares(
        &self,
        storage: &mut dyn Storage,
        shares: Uint128,
    ) -> Result<Uint128, ContractError> {
        let balance = self
            .shares(storage)?
            .checked_sub(shares)
            .map_err(|_| ContractError::InsufficientShares {})?;
        if balance.is_zero() {
            SHARES.remove(storage, (self.owner, self.token, self.strategy));
        } else {
            SHARES.save(storage, (self.owner, self.token, self.strategy), &balance)?;
        }

        let total = get_total_shares(storage, self.token, self.strategy)?
            .checked_sub(shares)
            .map_err(StdError::from)?;
        if total.is_zero() {
            TOTAL_SHARES.remove(storage, (self.token, self.strategy));
        } else {
            TOTAL_SHARES.save(storage, (self.token, self.strategy), &total)?;
        }
        Ok(balance)
    }
}

pub fn get_total_shares(storage: &dyn Storage, token: &Addr, strategy: &Addr) -> StdResult<Uint128> {
    TOTAL_SHARES
        .may_load(storage, (token, strategy))
        .map(|shares| shares.unwrap_or_default())
}

pub fn get_allowance(
    storage: &dyn Storage,
    owner: &Addr,
    token: &Addr,
    spender: &Addr,
) -> StdResult<Uint128> {
    ALLOWANCES
        .may_load(storage, (owner, token, spender))
        .map(|allowance| allowance.unwrap_or_default())
}

pub fn set_allowance(
    storage: &mut dyn Storage,
    owner: &Addr,
    token: &Addr,
    spender: &Addr,
    allowance: Uint128,
) -> StdResult<()> {
    if allowance.is_zero() {
        ALLOWANCES.remove(storage, (owner, token, spender));
        Ok(())
    } else {
        ALLOWANCES.save(storage, (owner, token, spender), &allowance)
    }
}
