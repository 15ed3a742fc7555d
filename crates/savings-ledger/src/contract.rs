#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::state;
use crate::strategy;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    from_json, to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Reply,
    Response, StdResult, SubMsg, Uint128,
};
use cw2::set_contract_version;
use savings_library::ownership;

const CONTRACT_NAME: &str = concat!("crates.io:", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEPOSIT_REPLY_ID: u64 = 1;
pub const WITHDRAW_REPLY_ID: u64 = 2;
pub const SWITCH_UNLOCK_REPLY_ID: u64 = 3;
pub const SWITCH_LOCK_REPLY_ID: u64 = 4;

/// Payload of [DEPOSIT_REPLY_ID].
#[cw_serde]
struct PendingDeposit {
    sender: Addr,
    recipient: Addr,
    token: Addr,
    strategy: Addr,
    amount: Uint128,
}

/// Payload of [WITHDRAW_REPLY_ID], `shares` are already debited.
#[cw_serde]
struct PendingWithdraw {
    owner: Addr,
    recipient: Addr,
    token: Addr,
    strategy: Addr,
    shares: Uint128,
}

impl PendingWithdraw {
    fn submsg(&self, msg: CosmosMsg) -> StdResult<SubMsg> {
        Ok(SubMsg::reply_on_success(msg, WITHDRAW_REPLY_ID).with_payload(to_json_binary(self)?))
    }
}

/// Payload of both switch legs, `amount` is set once the unlock leg has settled.
#[cw_serde]
struct PendingSwitch {
    owner: Addr,
    token: Addr,
    from_strategy: Addr,
    to_strategy: Addr,
    from_shares: Uint128,
    amount: Uint128,
}

impl PendingSwitch {
    fn submsg(&self, msg: CosmosMsg, id: u64) -> StdResult<SubMsg> {
        Ok(SubMsg::reply_on_success(msg, id).with_payload(to_json_binary(self)?))
    }
}

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

    let registry = deps.api.addr_validate(&msg.registry)?;
    state::set_registry(deps.storage, &registry)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute("registry", registry))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Deposit {
            amount,
            token,
            strategy,
            recipient,
        } => {
            let token = deps.api.addr_validate(&token)?;
            let strategy = deps.api.addr_validate(&strategy)?;
            let recipient = deps.api.addr_validate(&recipient)?;
            execute::deposit(deps, env, info, amount, token, strategy, recipient)
        }
        ExecuteMsg::Withdraw {
            amount,
            token,
            strategy,
            recipient,
            in_shares,
        } => {
            let token = deps.api.addr_validate(&token)?;
            let strategy = deps.api.addr_validate(&strategy)?;
            let recipient = deps.api.addr_validate(&recipient)?;
            execute::withdraw(deps, env, info, amount, token, strategy, recipient, in_shares)
        }
        ExecuteMsg::WithdrawAll { token, strategy } => {
            let token = deps.api.addr_validate(&token)?;
            let strategy = deps.api.addr_validate(&strategy)?;
            execute::withdraw_all(deps, env, info, token, strategy)
        }
        ExecuteMsg::SwitchStrategy {
            amount,
            token,
            from_strategy,
            to_strategy,
            in_shares,
        } => {
            let token = deps.api.addr_validate(&token)?;
            let from_strategy = deps.api.addr_validate(&from_strategy)?;
            let to_strategy = deps.api.addr_validate(&to_strategy)?;
            execute::switch_strategy(
                deps,
                env,
                info,
                amount,
                token,
                from_strategy,
                to_strategy,
                in_shares,
            )
        }
        ExecuteMsg::Approve {
            spender,
            token,
            amount,
        } => {
            let spender = deps.api.addr_validate(&spender)?;
            let token = deps.api.addr_validate(&token)?;
            execute::approve(deps, env, info, spender, token, amount)
        }
        ExecuteMsg::IncreaseAllowance {
            spender,
            token,
            amount,
        } => {
            let spender = deps.api.addr_validate(&spender)?;
            let token = deps.api.addr_validate(&token)?;
            execute::increase_allowance(deps, env, info, spender, token, amount)
        }
        ExecuteMsg::DecreaseAllowance {
            spender,
            token,
            amount,
        } => {
            let spender = deps.api.addr_validate(&spender)?;
            let token = deps.api.addr_validate(&token)?;
            execute::decrease_allowance(deps, env, info, spender, token, amount)
        }
        ExecuteMsg::Transfer {
            recipient,
            token,
            strategy,
            amount,
        } => {
            let recipient = deps.api.addr_validate(&recipient)?;
            let token = deps.api.addr_validate(&token)?;
            let strategy = deps.api.addr_validate(&strategy)?;
            execute::transfer(deps, env, info, recipient, token, strategy, amount)
        }
        ExecuteMsg::TransferFrom {
            owner,
            recipient,
            token,
            strategy,
            amount,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            let recipient = deps.api.addr_validate(&recipient)?;
            let token = deps.api.addr_validate(&token)?;
            let strategy = deps.api.addr_validate(&strategy)?;
            execute::transfer_from(deps, env, info, owner, recipient, token, strategy, amount)
        }
        ExecuteMsg::SetRegistry { registry } => {
            let registry = deps.api.addr_validate(&registry)?;
            execute::set_registry(deps, env, info, registry)
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
    use crate::state::Position;
    use cosmwasm_std::Event;
    use savings_strategy_base::token;

    fn assert_registered(deps: Deps, strategy: &Addr) -> Result<(), ContractError> {
        let registry = state::get_registry(deps.storage)?;
        if !strategy::is_registered(&deps.querier, &registry, strategy)? {
            return Err(ContractError::StrategyNotRegistered {});
        }
        Ok(())
    }

    /// Shares in `strategy` worth `amount` of `token` right now. Zero shares is an error.
    fn non_zero_shares(
        deps: Deps,
        strategy: &Addr,
        token: &Addr,
        amount: Uint128,
    ) -> Result<Uint128, ContractError> {
        let shares = strategy::shares_for_tokens(&deps.querier, strategy, token, amount)?;
        if shares.is_zero() {
            return Err(ContractError::ZeroShares {});
        }
        Ok(shares)
    }

    /// Shares are credited in `reply` with what the strategy reports it issued.
    pub fn deposit(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        amount: Uint128,
        token: Addr,
        strategy: Addr,
        recipient: Addr,
    ) -> Result<Response, ContractError> {
        if amount.is_zero() {
            return Err(ContractError::ZeroAmount {});
        }
        assert_registered(deps.as_ref(), &strategy)?;

        let lock_msg = strategy::lock_tokens(&strategy, &recipient, &token, amount)?;
        let pending = PendingDeposit {
            sender: info.sender.clone(),
            recipient: recipient.clone(),
            token: token.clone(),
            strategy: strategy.clone(),
            amount,
        };

        Ok(Response::new()
            .add_message(token::transfer_from(&token, &info.sender, &strategy, amount)?)
            .add_submessage(
                SubMsg::reply_on_success(lock_msg, DEPOSIT_REPLY_ID)
                    .with_payload(to_json_binary(&pending)?),
            ))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn withdraw(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        amount: Uint128,
        token: Addr,
        strategy: Addr,
        recipient: Addr,
        in_shares: bool,
    ) -> Result<Response, ContractError> {
        if amount.is_zero() {
            return Err(ContractError::ZeroAmount {});
        }

        let shares = if in_shares {
            amount
        } else {
            non_zero_shares(deps.as_ref(), &strategy, &token, amount)?
        };
        Position::new(&info.sender, &token, &strategy).sub_shares(deps.storage, shares)?;

        let msg = strategy::unlock_tokens(&strategy, &info.sender, &token, shares, &recipient)?;
        let pending = PendingWithdraw {
            owner: info.sender,
            recipient,
            token,
            strategy,
            shares,
        };
        Ok(Response::new().add_submessage(pending.submsg(msg)?))
    }

    /// The last holder of a (token, strategy) position unlocks everything the strategy holds,
    /// rounding residue included.
    pub fn withdraw_all(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        token: Addr,
        strategy: Addr,
    ) -> Result<Response, ContractError> {
        let position = Position::new(&info.sender, &token, &strategy);
        let shares = position.shares(deps.storage)?;
        if shares.is_zero() {
            return Err(ContractError::ZeroShares {});
        }

        let total_shares = state::get_total_shares(deps.storage, &token, &strategy)?;
        let msg = if shares == total_shares {
            strategy::unlock_all_tokens(&strategy, &token, &info.sender)?
        } else {
            strategy::unlock_tokens(&strategy, &info.sender, &token, shares, &info.sender)?
        };
        position.sub_shares(deps.storage, shares)?;

        let pending = PendingWithdraw {
            owner: info.sender.clone(),
            recipient: info.sender,
            token,
            strategy,
            shares,
        };
        Ok(Response::new().add_submessage(pending.submsg(msg)?))
    }

    /// Unlock from `from_strategy` straight to `to_strategy`, the lock leg is dispatched
    /// from `reply` with the amount actually unlocked.
    /// Both legs run in the same transaction, a failure in either reverts both.
    #[allow(clippy::too_many_arguments)]
    pub fn switch_strategy(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        amount: Uint128,
        token: Addr,
        from_strategy: Addr,
        to_strategy: Addr,
        in_shares: bool,
    ) -> Result<Response, ContractError> {
        if from_strategy == to_strategy {
            return Err(ContractError::SameStrategy {});
        }
        if amount.is_zero() {
            return Err(ContractError::ZeroAmount {});
        }
        assert_registered(deps.as_ref(), &to_strategy)?;

        let from_shares = if in_shares {
            amount
        } else {
            non_zero_shares(deps.as_ref(), &from_strategy, &token, amount)?
        };

        let position = Position::new(&info.sender, &token, &from_strategy);
        let held = position.shares(deps.storage)?;
        let total_shares = state::get_total_shares(deps.storage, &token, &from_strategy)?;
        let msg = if from_shares == held && held == total_shares {
            strategy::unlock_all_tokens(&from_strategy, &token, &to_strategy)?
        } else {
            strategy::unlock_tokens(
                &from_strategy,
                &info.sender,
                &token,
                from_shares,
                &to_strategy,
            )?
        };
        position.sub_shares(deps.storage, from_shares)?;

        let pending = PendingSwitch {
            owner: info.sender,
            token,
            from_strategy,
            to_strategy,
            from_shares,
            amount: Uint128::zero(),
        };
        Ok(Response::new().add_submessage(pending.submsg(msg, SWITCH_UNLOCK_REPLY_ID)?))
    }

    fn allowance_updated(owner: &Addr, spender: &Addr, token: &Addr, allowance: Uint128) -> Event {
        Event::new("AllowanceUpdated")
            .add_attribute("owner", owner)
            .add_attribute("spender", spender)
            .add_attribute("token", token)
            .add_attribute("allowance", allowance)
    }

    pub fn approve(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        spender: Addr,
        token: Addr,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        state::set_allowance(deps.storage, &info.sender, &token, &spender, amount)?;

        Ok(Response::new().add_event(allowance_updated(&info.sender, &spender, &token, amount)))
    }

    pub fn increase_allowance(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        spender: Addr,
        token: Addr,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        let allowance = state::get_allowance(deps.storage, &info.sender, &token, &spender)?
            .saturating_add(amount);
        state::set_allowance(deps.storage, &info.sender, &token, &spender, allowance)?;

        Ok(Response::new().add_event(allowance_updated(
            &info.sender,
            &spender,
            &token,
            allowance,
        )))
    }

    pub fn decrease_allowance(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        spender: Addr,
        token: Addr,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        // Uint128::MAX revokes fully, whatever the current allowance
        let allowance = if amount == Uint128::MAX {
            Uint128::zero()
        } else {
            state::get_allowance(deps.storage, &info.sender, &token, &spender)?
                .checked_sub(amount)
                .map_err(|_| ContractError::InsufficientAllowance {})?
        };
        state::set_allowance(deps.storage, &info.sender, &token, &spender, allowance)?;

        Ok(Response::new().add_event(allowance_updated(
            &info.sender,
            &spender,
            &token,
            allowance,
        )))
    }

    /// Move `amount` of underlying worth of shares from `owner` to `recipient`, no tokens move.
    fn move_shares(
        deps: DepsMut,
        owner: &Addr,
        recipient: &Addr,
        token: &Addr,
        strategy: &Addr,
        amount: Uint128,
    ) -> Result<Event, ContractError> {
        if amount.is_zero() {
            return Err(ContractError::ZeroAmount {});
        }

        let shares = non_zero_shares(deps.as_ref(), strategy, token, amount)?;
        Position::new(owner, token, strategy).sub_shares(deps.storage, shares)?;
        Position::new(recipient, token, strategy).add_shares(deps.storage, shares)?;

        Ok(Event::new("Transfer")
            .add_attribute("owner", owner)
            .add_attribute("recipient", recipient)
            .add_attribute("token", token)
            .add_attribute("strategy", strategy)
            .add_attribute("amount", amount)
            .add_attribute("shares", shares))
    }

    pub fn transfer(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        recipient: Addr,
        token: Addr,
        strategy: Addr,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        let event = move_shares(deps, &info.sender, &recipient, &token, &strategy, amount)?;

        Ok(Response::new().add_event(event))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn transfer_from(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        owner: Addr,
        recipient: Addr,
        token: Addr,
        strategy: Addr,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        let allowance = state::get_allowance(deps.storage, &owner, &token, &info.sender)?
            .checked_sub(amount)
            .map_err(|_| ContractError::InsufficientAllowance {})?;
        state::set_allowance(deps.storage, &owner, &token, &info.sender, allowance)?;

        let event = move_shares(deps, &owner, &recipient, &token, &strategy, amount)?;

        Ok(Response::new()
            .add_event(allowance_updated(&owner, &info.sender, &token, allowance))
            .add_event(event))
    }

    pub fn set_registry(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        registry: Addr,
    ) -> Result<Response, ContractError> {
        ownership::assert_owner(deps.storage, &info)?;

        let previous = state::get_registry(deps.storage)?;
        state::set_registry(deps.storage, &registry)?;

        Ok(Response::new().add_event(
            Event::new("RegistryUpdated")
                .add_attribute("previous", previous)
                .add_attribute("registry", registry),
        ))
    }
}

/// Settles deposits, withdrawals and switches with the amounts strategies report
/// in their response data.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        DEPOSIT_REPLY_ID => {
            let pending: PendingDeposit = from_json(&msg.payload)?;
            let shares = strategy::reply_amount(msg.result)?;
            reply::deposited(deps, pending, shares)
        }
        WITHDRAW_REPLY_ID => {
            let pending: PendingWithdraw = from_json(&msg.payload)?;
            let amount = strategy::reply_amount(msg.result)?;
            reply::withdrawn(pending, amount)
        }
        SWITCH_UNLOCK_REPLY_ID => {
            let pending: PendingSwitch = from_json(&msg.payload)?;
            let amount = strategy::reply_amount(msg.result)?;
            reply::switch_unlocked(pending, amount)
        }
        SWITCH_LOCK_REPLY_ID => {
            let pending: PendingSwitch = from_json(&msg.payload)?;
            let shares = strategy::reply_amount(msg.result)?;
            reply::switch_locked(deps, pending, shares)
        }
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

mod reply {
    use super::*;
    use crate::state::Position;
    use cosmwasm_std::Event;

    pub fn deposited(
        deps: DepsMut,
        pending: PendingDeposit,
        shares: Uint128,
    ) -> Result<Response, ContractError> {
        if shares.is_zero() {
            return Err(ContractError::ZeroShares {});
        }
        Position::new(&pending.recipient, &pending.token, &pending.strategy)
            .add_shares(deps.storage, shares)?;

        Ok(Response::new()
            .add_event(
                Event::new("Deposited")
                    .add_attribute("sender", pending.sender)
                    .add_attribute("recipient", pending.recipient)
                    .add_attribute("token", pending.token)
                    .add_attribute("strategy", pending.strategy)
                    .add_attribute("amount", pending.amount)
                    .add_attribute("shares", shares),
            )
            .set_data(to_json_binary(&shares)?))
    }

    pub fn withdrawn(pending: PendingWithdraw, amount: Uint128) -> Result<Response, ContractError> {
        if amount.is_zero() {
            return Err(ContractError::ZeroAmount {});
        }

        Ok(Response::new()
            .add_event(
                Event::new("Withdrawn")
                    .add_attribute("sender", pending.owner)
                    .add_attribute("recipient", pending.recipient)
                    .add_attribute("token", pending.token)
                    .add_attribute("strategy", pending.strategy)
                    .add_attribute("shares", pending.shares)
                    .add_attribute("amount", amount),
            )
            .set_data(to_json_binary(&amount)?))
    }

    /// `to_strategy` already holds `amount`, lock it there.
    pub fn switch_unlocked(
        mut pending: PendingSwitch,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        if amount.is_zero() {
            return Err(ContractError::ZeroAmount {});
        }
        pending.amount = amount;

        let msg =
            strategy::lock_tokens(&pending.to_strategy, &pending.owner, &pending.token, amount)?;
        Ok(Response::new().add_submessage(pending.submsg(msg, SWITCH_LOCK_REPLY_ID)?))
    }

    pub fn switch_locked(
        deps: DepsMut,
        pending: PendingSwitch,
        to_shares: Uint128,
    ) -> Result<Response, ContractError> {
        if to_shares.is_zero() {
            return Err(ContractError::ZeroShares {});
        }
        Position::new(&pending.owner, &pending.token, &pending.to_strategy)
            .add_shares(deps.storage, to_shares)?;

        Ok(Response::new()
            .add_event(
                Event::new("StrategySwitched")
                    .add_attribute("sender", pending.owner)
                    .add_attribute("token", pending.token)
                    .add_attribute("from_strategy", pending.from_strategy)
                    .add_attribute("to_strategy", pending.to_strategy)
                    .add_attribute("amount", pending.amount)
                    .add_attribute("from_shares", pending.from_shares)
                    .add_attribute("to_shares", to_shares),
            )
            .set_data(to_json_binary(&to_shares)?))
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Shares {
            owner,
            token,
            strategy,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            let token = deps.api.addr_validate(&token)?;
            let strategy = deps.api.addr_validate(&strategy)?;
            to_json_binary(&query::shares(deps, owner, token, strategy)?)
        }
        QueryMsg::TotalShares { token, strategy } => {
            let token = deps.api.addr_validate(&token)?;
            let strategy = deps.api.addr_validate(&strategy)?;
            to_json_binary(&query::total_shares(deps, token, strategy)?)
        }
        QueryMsg::Allowance {
            owner,
            token,
            spender,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            let token = deps.api.addr_validate(&token)?;
            let spender = deps.api.addr_validate(&spender)?;
            to_json_binary(&query::allowance(deps, owner, token, spender)?)
        }
        QueryMsg::TotalTokens { owner, token } => {
            let owner = deps.api.addr_validate(&owner)?;
            let token = deps.api.addr_validate(&token)?;
            to_json_binary(&query::total_tokens(deps, owner, token)?)
        }
        QueryMsg::Registry {} => to_json_binary(&query::registry(deps)?),
    }
}

mod query {
    use super::*;
    use crate::msg::{
        AllowanceResponse, RegistryResponse, SharesResponse, TotalSharesResponse,
        TotalTokensResponse,
    };
    use crate::state::Position;

    pub fn shares(deps: Deps, owner: Addr, token: Addr, strategy: Addr) -> StdResult<SharesResponse> {
        let shares = Position::new(&owner, &token, &strategy).shares(deps.storage)?;
        Ok(SharesResponse(shares))
    }

    pub fn total_shares(deps: Deps, token: Addr, strategy: Addr) -> StdResult<TotalSharesResponse> {
        let shares = state::get_total_shares(deps.storage, &token, &strategy)?;
        Ok(TotalSharesResponse(shares))
    }

    pub fn allowance(
        deps: Deps,
        owner: Addr,
        token: Addr,
        spender: Addr,
    ) -> StdResult<AllowanceResponse> {
        let allowance = state::get_allowance(deps.storage, &owner, &token, &spender)?;
        Ok(AllowanceResponse(allowance))
    }

    /// Positions in strategies no longer registered are not counted.
    pub fn total_tokens(deps: Deps, owner: Addr, token: Addr) -> StdResult<TotalTokensResponse> {
        let registry = state::get_registry(deps.storage)?;
        let strategies = strategy::strategies(&deps.querier, &registry)?;

        let mut total = Uint128::zero();
        for strategy in strategies {
            let shares = Position::new(&owner, &token, &strategy).shares(deps.storage)?;
            if shares.is_zero() {
                continue;
            }
            let tokens = strategy::tokens_for_shares(&deps.querier, &strategy, &token, shares)?;
            total = total.checked_add(tokens)?;
        }
        Ok(TotalTokensResponse(total))
    }

    pub fn registry(deps: Deps) -> StdResult<RegistryResponse> {
        let registry = state::get_registry(deps.storage)?;
        Ok(RegistryResponse(registry))
    }
}

/// This can only be called by the contract ADMIN, enforced by `wasmd` separate from cosmwasm.
/// See https://github.com/CosmWasm/cosmwasm/issues/926#issuecomment-851259818
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    cw2::ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default())
}
