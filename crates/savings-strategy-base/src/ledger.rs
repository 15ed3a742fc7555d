use crate::StrategyError;
use cosmwasm_std::{Addr, MessageInfo, StdError, StdResult, Storage};
use cw_storage_plus::Item;

const LEDGER: Item<Addr> = Item::new("ledger");

/// Set the `savings-ledger` address, called once during `instantiate`.
/// The ledger is the only caller allowed to lock or unlock tokens.
pub fn set_ledger(storage: &mut dyn Storage, ledger: &Addr) -> StdResult<()> {
    LEDGER.save(storage, ledger)
}

/// Get the `savings-ledger` address
/// If [set_ledger] has not been called, it will return an [StdError::NotFound]
pub fn get_ledger(storage: &dyn Storage) -> StdResult<Addr> {
    LEDGER
        .may_load(storage)?
        .ok_or(StdError::not_found("ledger"))
}

/// Asserts that the sender is the `savings-ledger`
pub fn assert_ledger(storage: &dyn Storage, info: &MessageInfo) -> Result<(), StrategyError> {
    let ledger = LEDGER
        .may_load(storage)?
        .ok_or(StrategyError::Unauthorized {})?;
    if info.sender != ledger {
        return Err(StrategyError::Unauthorized {});
    }
    Ok(())
}
