use cosmwasm_std::{Addr, Event, MessageInfo, Response, StdError, StdResult, Storage};
use cw_storage_plus::Item;

const OWNER: Item<Addr> = Item::new("_owner");

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum OwnershipError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("ownership: unauthorized")]
    Unauthorized,
}

/// Set the [OWNER] of the contract, called once during `instantiate`.
/// This is internal, no checks are done.
pub fn set_owner(storage: &mut dyn Storage, owner: &Addr) -> Result<(), OwnershipError> {
    OWNER.save(storage, owner)?;
    Ok(())
}

/// Get the owner of the contract.
/// If [set_owner] has not been called, it will return an [StdError::NotFound]
pub fn get_owner(storage: &dyn Storage) -> StdResult<Addr> {
    OWNER.may_load(storage)?.ok_or(StdError::not_found("owner"))
}

/// Hand the admin role to `new_owner`. Only the current owner can call this.
/// The contract admin (a wasmd feature) can still override the owner through `migrate`.
pub fn transfer_ownership(
    storage: &mut dyn Storage,
    info: MessageInfo,
    new_owner: Addr,
) -> Result<Response, OwnershipError> {
    assert_owner(storage, &info)?;

    let previous_owner = OWNER.load(storage)?;
    OWNER.save(storage, &new_owner)?;
    Ok(Response::new().add_event(
        Event::new("OwnershipTransferred")
            .add_attribute("previous_owner", previous_owner.as_str())
            .add_attribute("new_owner", new_owner.as_str()),
    ))
}

/// Asserts that `info.sender` is the owner of the contract
pub fn assert_owner(storage: &dyn Storage, info: &MessageInfo) -> Result<(), OwnershipError> {
    let owner = get_owner(storage)?;
    if info.sender != owner {
        return Err(OwnershipError::Unauthorized);
    }
    Ok(())
}
