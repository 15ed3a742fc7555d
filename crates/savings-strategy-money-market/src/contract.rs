#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;

use crate::market;
use cosmwasm_std::{
    from_json, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdError, StdResult,
};
use cw2::set_contract_version;
use savings_library::ownership;
use savings_strategy_base::msg::{InstantiateMsg, MigrateMsg, StrategyExecuteMsg, StrategyQueryMsg};
use savings_strategy_base::settle::{self, PendingLock, PendingUnlock};
use savings_strategy_base::{info, ledger, protocol, rate, response, token, StrategyError};

const CONTRACT_NAME: &str = concat!("crates.io:", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const KIND: &str = "money-market";

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, StrategyError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = deps.api.addr_validate(&msg.owner)?;
    ownership::set_owner(deps.storage, &owner)?;

    let ledger = deps.api.addr_validate(&msg.ledger)?;
    ledger::set_ledger(deps.storage, &ledger)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute("ledger", ledger))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: StrategyExecuteMsg,
) -> Result<Response, StrategyError> {
    match msg {
        StrategyExecuteMsg::LockTokens {
            owner,
            token,
            amount,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            let token = deps.api.addr_validate(&token)?;
            execute::lock_tokens(deps, env, info, owner, token, amount)
        }
        StrategyExecuteMsg::UnlockTokens {
            owner,
            token,
            shares,
            recipient,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            let token = deps.api.addr_validate(&token)?;
            let recipient = deps.api.addr_validate(&recipient)?;
            execute::unlock_tokens(deps, env, info, owner, token, shares, recipient)
        }
        StrategyExecuteMsg::UnlockAllTokens { token, recipient } => {
            let token = deps.api.addr_validate(&token)?;
            let recipient = deps.api.addr_validate(&recipient)?;
            execute::unlock_all_tokens(deps, env, info, token, recipient)
        }
        StrategyExecuteMsg::UpdateProtocolAddresses { token, protocol } => {
            let token = deps.api.addr_validate(&token)?;
            let protocol = deps.api.addr_validate(&protocol)?;
            execute::update_protocol_addresses(deps, env, info, token, protocol)
        }
        StrategyExecuteMsg::TransferOwnership { new_owner } => {
            let new_owner = deps.api.addr_validate(&new_owner)?;
            ownership::transfer_ownership(deps.storage, info, new_owner)
                .map_err(StrategyError::Ownership)
        }
    }
}

mod execute {
    use super::*;
    use cosmwasm_std::Uint128;

    /// Approve the market for `amount` and mint wrapped units with it.
    /// The wrapped units minted, measured in `reply`, are the shares issued.
    pub fn lock_tokens(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        owner: Addr,
        token: Addr,
        amount: Uint128,
    ) -> Result<Response, StrategyError> {
        ledger::assert_ledger(deps.storage, &info)?;

        if amount.is_zero() {
            return Err(StrategyError::ZeroAmount {});
        }

        let market = protocol::get_protocol(deps.storage, &token)?;
        let pending = PendingLock {
            owner,
            token: token.clone(),
            amount,
            balance_before: market::query_balance(&deps.querier, &market, &env.contract.address)?,
        };

        Ok(Response::new()
            .add_message(token::increase_allowance(&token, &market, amount)?)
            .add_submessage(pending.submsg(market::mint(&market, amount)?)?))
    }

    /// Redeem lands the underlying here first, `reply` forwards what was received.
    pub fn unlock_tokens(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        owner: Addr,
        token: Addr,
        shares: Uint128,
        recipient: Addr,
    ) -> Result<Response, StrategyError> {
        ledger::assert_ledger(deps.storage, &info)?;

        if shares.is_zero() {
            return Err(StrategyError::ZeroShares {});
        }

        let market = protocol::get_protocol(deps.storage, &token)?;
        let pending = PendingUnlock {
            owner: Some(owner),
            token: token.clone(),
            shares,
            recipient,
            balance_before: token::query_balance(&deps.querier, &token, &env.contract.address)?,
        };

        Ok(Response::new().add_submessage(pending.submsg(market::redeem(&market, shares)?)?))
    }

    pub fn unlock_all_tokens(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        token: Addr,
        recipient: Addr,
    ) -> Result<Response, StrategyError> {
        ledger::assert_ledger(deps.storage, &info)?;

        let market = protocol::get_protocol(deps.storage, &token)?;
        let shares = market::query_balance(&deps.querier, &market, &env.contract.address)?;
        if shares.is_zero() {
            return Err(StrategyError::ZeroShares {});
        }

        let pending = PendingUnlock {
            owner: None,
            token: token.clone(),
            shares,
            recipient,
            balance_before: token::query_balance(&deps.querier, &token, &env.contract.address)?,
        };

        Ok(Response::new().add_submessage(pending.submsg(market::redeem(&market, shares)?)?))
    }

    /// The market must report `token` as its underlying.
    pub fn update_protocol_addresses(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        token: Addr,
        market: Addr,
    ) -> Result<Response, StrategyError> {
        ownership::assert_owner(deps.storage, &info)?;

        let underlying = market::query_underlying(&deps.querier, &market)?;
        if underlying != token {
            return Err(StrategyError::ProtocolTokenMismatch {});
        }

        let updated = protocol::set_protocol(deps.storage, &token, &market)?;
        Ok(response::protocol_updated(&token, &market, updated))
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, StrategyError> {
    match msg.id {
        settle::LOCK_REPLY_ID => {
            let pending: PendingLock = from_json(&msg.payload)?;
            let market = protocol::get_protocol(deps.storage, &pending.token)?;
            let balance = market::query_balance(&deps.querier, &market, &env.contract.address)?;
            let shares = settle::received(pending.balance_before, balance)?;
            settle::tokens_locked(pending, shares)
        }
        settle::UNLOCK_REPLY_ID => {
            let pending: PendingUnlock = from_json(&msg.payload)?;
            settle::tokens_unlocked(&deps.querier, &env.contract.address, pending)
        }
        id => Err(StrategyError::UnknownReplyId { id }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: StrategyQueryMsg) -> StdResult<Binary> {
    match msg {
        StrategyQueryMsg::GetTokensForShares { token, shares } => {
            let token = deps.api.addr_validate(&token)?;
            to_json_binary(&query::tokens_for_shares(deps, token, shares)?)
        }
        StrategyQueryMsg::GetSharesForTokens { token, amount } => {
            let token = deps.api.addr_validate(&token)?;
            to_json_binary(&query::shares_for_tokens(deps, token, amount)?)
        }
        StrategyQueryMsg::Position { token } => {
            let token = deps.api.addr_validate(&token)?;
            to_json_binary(&query::position(deps, env, token)?)
        }
        StrategyQueryMsg::ProtocolAddress { token } => {
            let token = deps.api.addr_validate(&token)?;
            to_json_binary(&protocol::may_get_protocol(deps.storage, &token)?)
        }
        StrategyQueryMsg::StrategyInfo {} => to_json_binary(&info::query_strategy_info(deps, KIND)?),
    }
}

mod query {
    use super::*;
    use cosmwasm_std::Uint128;
    use savings_strategy_base::msg::PositionResponse;

    /// Market for `token` and its current exchange rate.
    fn market_rate(deps: Deps, token: &Addr) -> StdResult<(Addr, Uint128)> {
        let market = protocol::get_protocol(deps.storage, token).map_err(StdError::from)?;
        let exchange_rate = market::query_exchange_rate(&deps.querier, &market)?;
        Ok((market, exchange_rate))
    }

    pub fn tokens_for_shares(deps: Deps, token: Addr, shares: Uint128) -> StdResult<Uint128> {
        let (_, exchange_rate) = market_rate(deps, &token)?;
        rate::shares_to_tokens(shares, exchange_rate)
    }

    pub fn shares_for_tokens(deps: Deps, token: Addr, amount: Uint128) -> StdResult<Uint128> {
        let (_, exchange_rate) = market_rate(deps, &token)?;
        rate::tokens_to_shares(amount, exchange_rate)
    }

    pub fn position(deps: Deps, env: Env, token: Addr) -> StdResult<PositionResponse> {
        let (market, exchange_rate) = market_rate(deps, &token)?;
        let shares = market::query_balance(&deps.querier, &market, &env.contract.address)?;
        Ok(PositionResponse {
            shares,
            tokens: rate::shares_to_tokens(shares, exchange_rate)?,
        })
    }
}

/// This can only be called by the contract ADMIN, enforced by `wasmd` separate from cosmwasm.
/// See https://github.com/CosmWasm/cosmwasm/issues/926#issuecomment-851259818
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, StrategyError> {
    cw2::ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default())
}
