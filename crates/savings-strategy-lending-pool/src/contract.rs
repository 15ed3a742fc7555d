#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;

use crate::pool;
use cosmwasm_std::{
    from_json, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdResult, Uint128,
};
use cw2::set_contract_version;
use savings_library::ownership;
use savings_strategy_base::msg::{
    InstantiateMsg, MigrateMsg, PositionResponse, StrategyExecuteMsg, StrategyQueryMsg,
};
use savings_strategy_base::offset::TotalShares;
use savings_strategy_base::settle::{self, PendingLock, PendingUnlock};
use savings_strategy_base::{info, ledger, protocol, response, token, StrategyError};

const CONTRACT_NAME: &str = concat!("crates.io:", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const KIND: &str = "lending-pool";

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

/// Pool for `token` and the shares issued against the claim balance it holds for this strategy.
fn load_position(
    deps: Deps,
    env: &Env,
    token: &Addr,
) -> Result<(Addr, TotalShares), StrategyError> {
    let pool_addr = protocol::get_protocol(deps.storage, token)?;
    let claim = pool::query_balance(&deps.querier, &pool_addr, &env.contract.address)?;
    let total = TotalShares::load(deps.storage, token, claim)?;
    Ok((pool_addr, total))
}

mod execute {
    use super::*;

    /// Shares are issued in `reply`, against the claim the pool actually credited.
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

        let pool_addr = protocol::get_protocol(deps.storage, &token)?;
        let pending = PendingLock {
            owner,
            token: token.clone(),
            amount,
            balance_before: pool::query_balance(&deps.querier, &pool_addr, &env.contract.address)?,
        };

        Ok(Response::new()
            .add_message(token::increase_allowance(&token, &pool_addr, amount)?)
            .add_submessage(pending.submsg(pool::deposit(&pool_addr, amount)?)?))
    }

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

        let (pool_addr, mut total) = load_position(deps.as_ref(), &env, &token)?;
        let amount = total.shares_to_assets(shares)?;
        total.checked_sub_shares(deps.storage, shares)?;
        if amount.is_zero() {
            return Err(StrategyError::ZeroAmount {});
        }

        let pending = PendingUnlock {
            owner: Some(owner),
            token: token.clone(),
            shares,
            recipient,
            balance_before: token::query_balance(&deps.querier, &token, &env.contract.address)?,
        };

        Ok(Response::new().add_submessage(pending.submsg(pool::withdraw(&pool_addr, amount)?)?))
    }

    /// Withdraw the whole claim balance, interest and rounding residue included.
    pub fn unlock_all_tokens(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        token: Addr,
        recipient: Addr,
    ) -> Result<Response, StrategyError> {
        ledger::assert_ledger(deps.storage, &info)?;

        let (pool_addr, total) = load_position(deps.as_ref(), &env, &token)?;
        let shares = total.total_shares();
        if shares.is_zero() {
            return Err(StrategyError::ZeroShares {});
        }
        let amount = total.total_assets();
        total.clear(deps.storage);

        if amount.is_zero() {
            return Ok(response::all_tokens_unlocked(
                vec![],
                &token,
                shares,
                amount,
                &recipient,
            )?);
        }

        let pending = PendingUnlock {
            owner: None,
            token: token.clone(),
            shares,
            recipient,
            balance_before: token::query_balance(&deps.querier, &token, &env.contract.address)?,
        };

        Ok(Response::new().add_submessage(pending.submsg(pool::withdraw(&pool_addr, amount)?)?))
    }

    pub fn update_protocol_addresses(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        token: Addr,
        pool_addr: Addr,
    ) -> Result<Response, StrategyError> {
        ownership::assert_owner(deps.storage, &info)?;

        let underlying = pool::query_underlying(&deps.querier, &pool_addr)?;
        if underlying != token {
            return Err(StrategyError::ProtocolTokenMismatch {});
        }

        let updated = protocol::set_protocol(deps.storage, &token, &pool_addr)?;
        Ok(response::protocol_updated(&token, &pool_addr, updated))
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, StrategyError> {
    match msg.id {
        settle::LOCK_REPLY_ID => {
            let pending: PendingLock = from_json(&msg.payload)?;
            let pool_addr = protocol::get_protocol(deps.storage, &pending.token)?;
            let claim = pool::query_balance(&deps.querier, &pool_addr, &env.contract.address)?;
            let credited = settle::received(pending.balance_before, claim)?;

            // priced against the claim before the deposit
            let mut total = TotalShares::load(deps.storage, &pending.token, pending.balance_before)?;
            let shares = total.assets_to_shares(credited)?;
            total.checked_add_shares(deps.storage, shares)?;
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
            let (_, total) = load_position(deps, &env, &token)?;
            to_json_binary(&total.shares_to_assets(shares)?)
        }
        StrategyQueryMsg::GetSharesForTokens { token, amount } => {
            let token = deps.api.addr_validate(&token)?;
            let (_, total) = load_position(deps, &env, &token)?;
            to_json_binary(&total.assets_to_shares(amount)?)
        }
        StrategyQueryMsg::Position { token } => {
            let token = deps.api.addr_validate(&token)?;
            let (_, total) = load_position(deps, &env, &token)?;
            to_json_binary(&PositionResponse {
                shares: total.total_shares(),
                tokens: total.total_assets(),
            })
        }
        StrategyQueryMsg::ProtocolAddress { token } => {
            let token = deps.api.addr_validate(&token)?;
            to_json_binary(&protocol::may_get_protocol(deps.storage, &token)?)
        }
        StrategyQueryMsg::StrategyInfo {} => to_json_binary(&info::query_strategy_info(deps, KIND)?),
    }
}

/// This can only be called by the contract ADMIN, enforced by `wasmd` separate from cosmwasm.
/// See https://github.com/CosmWasm/cosmwasm/issues/926#issuecomment-851259818
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, StrategyError> {
    cw2::ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default())
}
