#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;

use cosmwasm_std::{to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::set_contract_version;
use savings_library::ownership;
use savings_strategy_base::msg::{InstantiateMsg, MigrateMsg, StrategyExecuteMsg, StrategyQueryMsg};
use savings_strategy_base::{info, ledger, StrategyError};

const CONTRACT_NAME: &str = concat!("crates.io:", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const KIND: &str = "passthrough";

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
        StrategyExecuteMsg::UpdateProtocolAddresses { .. } => {
            ownership::assert_owner(deps.storage, &info)?;
            Err(StrategyError::NoBackendProtocol {})
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
    use cosmwasm_std::{Addr, Uint128};
    use savings_strategy_base::{response, token};

    /// Tokens were already transferred in by the ledger, nothing to forward.
    pub fn lock_tokens(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        owner: Addr,
        token: Addr,
        amount: Uint128,
    ) -> Result<Response, StrategyError> {
        ledger::assert_ledger(deps.storage, &info)?;

        if amount.is_zero() {
            return Err(StrategyError::ZeroAmount {});
        }

        Ok(response::tokens_locked(
            vec![],
            &owner,
            &token,
            amount,
            amount,
        )?)
    }

    pub fn unlock_tokens(
        deps: DepsMut,
        _env: Env,
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

        let transfer_msg = token::transfer(&token, &recipient, shares)?;
        Ok(response::tokens_unlocked(
            vec![transfer_msg],
            &owner,
            &token,
            shares,
            shares,
            &recipient,
        )?)
    }

    /// Sweeps the full balance, including anything sent to the strategy directly.
    pub fn unlock_all_tokens(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        token: Addr,
        recipient: Addr,
    ) -> Result<Response, StrategyError> {
        ledger::assert_ledger(deps.storage, &info)?;

        let balance = token::query_balance(&deps.querier, &token, &env.contract.address)?;
        if balance.is_zero() {
            return Err(StrategyError::ZeroAmount {});
        }

        let transfer_msg = token::transfer(&token, &recipient, balance)?;
        Ok(response::all_tokens_unlocked(
            vec![transfer_msg],
            &token,
            balance,
            balance,
            &recipient,
        )?)
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: StrategyQueryMsg) -> StdResult<Binary> {
    match msg {
        StrategyQueryMsg::GetTokensForShares { token, shares } => {
            deps.api.addr_validate(&token)?;
            to_json_binary(&shares)
        }
        StrategyQueryMsg::GetSharesForTokens { token, amount } => {
            deps.api.addr_validate(&token)?;
            to_json_binary(&amount)
        }
        StrategyQueryMsg::Position { token } => {
            let token = deps.api.addr_validate(&token)?;
            to_json_binary(&query::position(deps, env, token)?)
        }
        StrategyQueryMsg::ProtocolAddress { token } => {
            deps.api.addr_validate(&token)?;
            to_json_binary(&Option::<cosmwasm_std::Addr>::None)
        }
        StrategyQueryMsg::StrategyInfo {} => to_json_binary(&info::query_strategy_info(deps, KIND)?),
    }
}

mod query {
    use super::*;
    use cosmwasm_std::Addr;
    use savings_strategy_base::msg::PositionResponse;
    use savings_strategy_base::token;

    pub fn position(deps: Deps, env: Env, token: Addr) -> StdResult<PositionResponse> {
        let balance = token::query_balance(&deps.querier, &token, &env.contract.address)?;
        Ok(PositionResponse {
            shares: balance,
            tokens: balance,
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

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env};
    use cosmwasm_std::{from_json, Addr, Event, Uint128};
    use savings_library::ownership::OwnershipError;
    use savings_strategy_base::msg::StrategyInfoResponse;

    fn init(deps: DepsMut, owner: &Addr, ledger: &Addr) {
        let info = message_info(owner, &[]);
        instantiate(
            deps,
            mock_env(),
            info,
            InstantiateMsg {
                owner: owner.to_string(),
                ledger: ledger.to_string(),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_instantiate() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let ledger = deps.api.addr_make("ledger");
        init(deps.as_mut(), &owner, &ledger);

        let res = query(deps.as_ref(), mock_env(), StrategyQueryMsg::StrategyInfo {}).unwrap();
        let info: StrategyInfoResponse = from_json(res).unwrap();
        assert_eq!(
            info,
            StrategyInfoResponse {
                ledger,
                kind: "passthrough".to_string(),
                contract: "crates.io:savings-strategy-passthrough".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            }
        );
    }

    #[test]
    fn test_lock_tokens() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let ledger = deps.api.addr_make("ledger");
        init(deps.as_mut(), &owner, &ledger);

        let staker = deps.api.addr_make("staker");
        let token = deps.api.addr_make("token");

        let res = execute::lock_tokens(
            deps.as_mut(),
            mock_env(),
            message_info(&ledger, &[]),
            staker.clone(),
            token.clone(),
            Uint128::new(500),
        )
        .unwrap();

        assert!(res.messages.is_empty());
        assert_eq!(
            res.events,
            vec![Event::new("TokensLocked")
                .add_attribute("owner", staker.as_str())
                .add_attribute("token", token.as_str())
                .add_attribute("amount", "500")
                .add_attribute("shares", "500")]
        );
        let shares: Uint128 = from_json(res.data.unwrap()).unwrap();
        assert_eq!(shares, Uint128::new(500));
    }

    #[test]
    fn test_lock_tokens_not_ledger() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let ledger = deps.api.addr_make("ledger");
        init(deps.as_mut(), &owner, &ledger);

        let token = deps.api.addr_make("token");
        let err = execute::lock_tokens(
            deps.as_mut(),
            mock_env(),
            message_info(&owner, &[]),
            owner.clone(),
            token,
            Uint128::new(500),
        )
        .unwrap_err();
        assert_eq!(err, StrategyError::Unauthorized {});
    }

    #[test]
    fn test_unlock_tokens_zero() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let ledger = deps.api.addr_make("ledger");
        init(deps.as_mut(), &owner, &ledger);

        let token = deps.api.addr_make("token");
        let err = execute::unlock_tokens(
            deps.as_mut(),
            mock_env(),
            message_info(&ledger, &[]),
            owner.clone(),
            token,
            Uint128::zero(),
            owner.clone(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "strategy: zero shares");
    }

    #[test]
    fn test_update_protocol_addresses() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let ledger = deps.api.addr_make("ledger");
        init(deps.as_mut(), &owner, &ledger);

        let msg = StrategyExecuteMsg::UpdateProtocolAddresses {
            token: deps.api.addr_make("token").to_string(),
            protocol: deps.api.addr_make("protocol").to_string(),
        };

        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&ledger, &[]),
            msg.clone(),
        )
        .unwrap_err();
        assert_eq!(err, StrategyError::Ownership(OwnershipError::Unauthorized));

        let err = execute(deps.as_mut(), mock_env(), message_info(&owner, &[]), msg).unwrap_err();
        assert_eq!(err.to_string(), "strategy: no backend protocol");
    }
}
