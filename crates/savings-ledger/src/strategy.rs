//! Calls from the ledger into strategies and the registry.
//! Every strategy variant answers the same [StrategyExecuteMsg] and [StrategyQueryMsg],
//! the ledger never branches on the variant.

use crate::error::ContractError;
use cosmwasm_std::{
    from_json, to_json_binary, Addr, CosmosMsg, QuerierWrapper, StdError, StdResult, SubMsgResult,
    Uint128, WasmMsg,
};
use cw_utils::parse_execute_response_data;
use savings_registry::msg::{IsRegisteredResponse, QueryMsg as RegistryQueryMsg, StrategiesResponse};
use savings_strategy_base::msg::{StrategyExecuteMsg, StrategyQueryMsg};

pub fn is_registered(querier: &QuerierWrapper, registry: &Addr, strategy: &Addr) -> StdResult<bool> {
    let IsRegisteredResponse(registered) = querier.query_wasm_smart(
        registry.to_string(),
        &RegistryQueryMsg::IsRegistered {
            strategy: strategy.to_string(),
        },
    )?;
    Ok(registered)
}

pub fn strategies(querier: &QuerierWrapper, registry: &Addr) -> StdResult<Vec<Addr>> {
    let StrategiesResponse(strategies) =
        querier.query_wasm_smart(registry.to_string(), &RegistryQueryMsg::Strategies {})?;
    Ok(strategies)
}

pub fn shares_for_tokens(
    querier: &QuerierWrapper,
    strategy: &Addr,
    token: &Addr,
    amount: Uint128,
) -> StdResult<Uint128> {
    querier.query_wasm_smart(
        strategy.to_string(),
        &StrategyQueryMsg::GetSharesForTokens {
            token: token.to_string(),
            amount,
        },
    )
}

pub fn tokens_for_shares(
    querier: &QuerierWrapper,
    strategy: &Addr,
    token: &Addr,
    shares: Uint128,
) -> StdResult<Uint128> {
    querier.query_wasm_smart(
        strategy.to_string(),
        &StrategyQueryMsg::GetTokensForShares {
            token: token.to_string(),
            shares,
        },
    )
}

fn execute(strategy: &Addr, msg: &StrategyExecuteMsg) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: strategy.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    }
    .into())
}

pub fn lock_tokens(
    strategy: &Addr,
    owner: &Addr,
    token: &Addr,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    execute(
        strategy,
        &StrategyExecuteMsg::LockTokens {
            owner: owner.to_string(),
            token: token.to_string(),
            amount,
        },
    )
}

pub fn unlock_tokens(
    strategy: &Addr,
    owner: &Addr,
    token: &Addr,
    shares: Uint128,
    recipient: &Addr,
) -> StdResult<CosmosMsg> {
    execute(
        strategy,
        &StrategyExecuteMsg::UnlockTokens {
            owner: owner.to_string(),
            token: token.to_string(),
            shares,
            recipient: recipient.to_string(),
        },
    )
}

pub fn unlock_all_tokens(strategy: &Addr, token: &Addr, recipient: &Addr) -> StdResult<CosmosMsg> {
    execute(
        strategy,
        &StrategyExecuteMsg::UnlockAllTokens {
            token: token.to_string(),
            recipient: recipient.to_string(),
        },
    )
}

/// The [Uint128] a strategy set as response data to `LockTokens` (shares issued)
/// or `UnlockTokens`/`UnlockAllTokens` (tokens returned), read from the reply.
pub fn reply_amount(result: SubMsgResult) -> Result<Uint128, ContractError> {
    let response = result.into_result().map_err(StdError::generic_err)?;
    let msg_response = response
        .msg_responses
        .first()
        .ok_or(ContractError::MissingReplyData {})?;
    let data = parse_execute_response_data(msg_response.value.as_slice())?
        .data
        .ok_or(ContractError::MissingReplyData {})?;
    Ok(from_json(data)?)
}
