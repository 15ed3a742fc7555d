#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::state;
use cosmwasm_std::{to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::set_contract_version;
use savings_library::ownership;

const CONTRACT_NAME: &str = concat!("crates.io:", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = deps.api.addr_validate(&msg.owner)?;
    ownership::set_owner(deps.storage, &owner)?;

    if msg.max_strategies == 0 {
        return Err(ContractError::ZeroMaxStrategies {});
    }
    state::MAX_STRATEGIES.save(deps.storage, &msg.max_strategies)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute("max_strategies", msg.max_strategies.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AddStrategy { strategy } => {
            let strategy = deps.api.addr_validate(&strategy)?;
            execute::add_strategy(deps, env, info, strategy)
        }
        ExecuteMsg::UpdateStrategy {
            index,
            new_strategy,
            previous_strategy,
        } => {
            let new_strategy = deps.api.addr_validate(&new_strategy)?;
            let previous_strategy = deps.api.addr_validate(&previous_strategy)?;
            execute::update_strategy(deps, env, info, index, new_strategy, previous_strategy)
        }
        ExecuteMsg::RemoveStrategy { index } => execute::remove_strategy(deps, env, info, index),
        ExecuteMsg::UpdateMaxStrategies { max_strategies } => {
            execute::update_max_strategies(deps, env, info, max_strategies)
        }
        ExecuteMsg::TransferOwnership { new_owner } => {
            let new_owner = deps.api.addr_validate(&new_owner)?;
            ownership::transfer_ownership(deps.storage, info, new_owner)
                .map_err(ContractError::Ownership)
        }
    }
}

mod execute {
    use super::*;
    use cosmwasm_std::{Addr, Event};

    /// Append a new strategy to the catalogue.
    pub fn add_strategy(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        strategy: Addr,
    ) -> Result<Response, ContractError> {
        ownership::assert_owner(deps.storage, &info)?;

        let index = state::append(deps.storage, &strategy)?;

        Ok(Response::new().add_event(
            Event::new("StrategyAdded")
                .add_attribute("strategy", strategy)
                .add_attribute("index", index.to_string()),
        ))
    }

    /// Replace the strategy at `index`, the replaced strategy is no longer registered.
    pub fn update_strategy(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        index: u32,
        new_strategy: Addr,
        previous_strategy: Addr,
    ) -> Result<Response, ContractError> {
        ownership::assert_owner(deps.storage, &info)?;

        let replaced = state::replace(
            deps.storage,
            index as usize,
            &new_strategy,
            &previous_strategy,
        )?;

        Ok(Response::new()
            .add_event(
                Event::new("StrategyRemoved")
                    .add_attribute("strategy", replaced)
                    .add_attribute("index", index.to_string()),
            )
            .add_event(
                Event::new("StrategyAdded")
                    .add_attribute("strategy", new_strategy)
                    .add_attribute("index", index.to_string()),
            ))
    }

    pub fn remove_strategy(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        index: u32,
    ) -> Result<Response, ContractError> {
        ownership::assert_owner(deps.storage, &info)?;

        let removed = state::remove(deps.storage, index as usize)?;

        Ok(Response::new().add_event(
            Event::new("StrategyRemoved")
                .add_attribute("strategy", removed)
                .add_attribute("index", index.to_string()),
        ))
    }

    pub fn update_max_strategies(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        max_strategies: u32,
    ) -> Result<Response, ContractError> {
        ownership::assert_owner(deps.storage, &info)?;

        if max_strategies == 0 {
            return Err(ContractError::ZeroMaxStrategies {});
        }

        let previous = state::MAX_STRATEGIES.load(deps.storage)?;
        state::MAX_STRATEGIES.save(deps.storage, &max_strategies)?;

        Ok(Response::new().add_event(
            Event::new("MaxStrategiesUpdated")
                .add_attribute("previous", previous.to_string())
                .add_attribute("current", max_strategies.to_string()),
        ))
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Strategies {} => to_json_binary(&query::strategies(deps)?),
        QueryMsg::IsRegistered { strategy } => {
            let strategy = deps.api.addr_validate(&strategy)?;
            to_json_binary(&query::is_registered(deps, strategy))
        }
        QueryMsg::MaxStrategies {} => to_json_binary(&query::max_strategies(deps)?),
    }
}

mod query {
    use super::*;
    use crate::msg::{IsRegisteredResponse, MaxStrategiesResponse, StrategiesResponse};
    use cosmwasm_std::Addr;

    pub fn strategies(deps: Deps) -> StdResult<StrategiesResponse> {
        let strategies = state::get_strategies(deps.storage)?;
        Ok(StrategiesResponse(strategies))
    }

    pub fn is_registered(deps: Deps, strategy: Addr) -> IsRegisteredResponse {
        IsRegisteredResponse(state::is_registered(deps.storage, &strategy))
    }

    pub fn max_strategies(deps: Deps) -> StdResult<MaxStrategiesResponse> {
        let max = state::MAX_STRATEGIES.load(deps.storage)?;
        Ok(MaxStrategiesResponse(max))
    }
}

/// This can only be called by the contract ADMIN, enforced by `wasmd` separate from cosmwasm.
/// See https://github.com/CosmWasm/cosmwasm/issues/926#issuecomment-851259818
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    cw2::ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default())
}
