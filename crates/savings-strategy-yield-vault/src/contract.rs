#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;

use crate::vault;
use cosmwasm_std::{
    from_json, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdError, StdResult, Uint128,
};
use cw2::set_contract_version;
use savings_library::ownership;
use savings_strategy_base::msg::{
    InstantiateMsg, MigrateMsg, PositionResponse, StrategyExecuteMsg, StrategyQueryMsg,
};
use savings_strategy_base::settle::{self, PendingLock, PendingUnlock};
use savings_strategy_base::{info, ledger, protocol, response, token, StrategyError};

const CONTRACT_NAME: &str = concat!("crates.io:", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const KIND: &str = "yield-vault";

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

    /// Deposit `amount` into the vault, the vault shares issued, measured in `reply`,
    /// are the shares returned.
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

        let vault_addr = protocol::get_protocol(deps.storage, &token)?;
        let pending = PendingLock {
            owner,
            token: token.clone(),
            amount,
            balance_before: vault::query_shares(&deps.querier, &vault_addr, &env.contract.address)?,
        };

        Ok(Response::new()
            .add_message(token::increase_allowance(&token, &vault_addr, amount)?)
            .add_submessage(pending.submsg(vault::deposit(&vault_addr, amount)?)?))
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

        if shares.is_zero() {
            return Err(StrategyError::ZeroShares {});
        }

        let vault_addr = protocol::get_protocol(deps.storage, &token)?;
        let pending = PendingUnlock {
            owner: Some(owner),
            token: token.clone(),
            shares,
            recipient,
            balance_before: token::query_balance(&deps.querier, &token, &env.contract.address)?,
        };

        Ok(Response::new().add_submessage(pending.submsg(vault::withdraw(&vault_addr, shares)?)?))
    }

    pub fn unlock_all_tokens(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        token: Addr,
        recipient: Addr,
    ) -> Result<Response, StrategyError> {
        ledger::assert_ledger(deps.storage, &info)?;

        let vault_addr = protocol::get_protocol(deps.storage, &token)?;
        let shares = vault::query_shares(&deps.querier, &vault_addr, &env.contract.address)?;
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

        Ok(Response::new().add_submessage(pending.submsg(vault::withdraw(&vault_addr, shares)?)?))
    }

    pub fn update_protocol_addresses(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        token: Addr,
        vault_addr: Addr,
    ) -> Result<Response, StrategyError> {
        ownership::assert_owner(deps.storage, &info)?;

        let underlying = vault::query_underlying(&deps.querier, &vault_addr)?;
        if underlying != token {
            return Err(StrategyError::ProtocolTokenMismatch {});
        }

        let updated = protocol::set_protocol(deps.storage, &token, &vault_addr)?;
        Ok(response::protocol_updated(&token, &vault_addr, updated))
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, StrategyError> {
    match msg.id {
        settle::LOCK_REPLY_ID => {
            let pending: PendingLock = from_json(&msg.payload)?;
            let vault_addr = protocol::get_protocol(deps.storage, &pending.token)?;
            let balance = vault::query_shares(&deps.querier, &vault_addr, &env.contract.address)?;
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
            let vault_addr = query::vault_of(deps, &token)?;
            to_json_binary(&vault::query_convert_to_assets(
                &deps.querier,
                &vault_addr,
                shares,
            )?)
        }
        StrategyQueryMsg::GetSharesForTokens { token, amount } => {
            let token = deps.api.addr_validate(&token)?;
            let vault_addr = query::vault_of(deps, &token)?;
            to_json_binary(&vault::query_convert_to_shares(
                &deps.querier,
                &vault_addr,
                amount,
            )?)
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

    pub fn vault_of(deps: Deps, token: &Addr) -> StdResult<Addr> {
        protocol::get_protocol(deps.storage, token).map_err(StdError::from)
    }

    pub fn position(deps: Deps, env: Env, token: Addr) -> StdResult<PositionResponse> {
        let vault_addr = vault_of(deps, &token)?;
        let shares = vault::query_shares(&deps.querier, &vault_addr, &env.contract.address)?;
        let tokens = if shares.is_zero() {
            Uint128::zero()
        } else {
            vault::query_convert_to_assets(&deps.querier, &vault_addr, shares)?
        };
        Ok(PositionResponse { shares, tokens })
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
    use crate::vault::{VaultExecuteMsg, VaultQueryMsg};
    use cosmwasm_std::testing::{
        message_info, mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage,
    };
    use cosmwasm_std::{
        ContractResult, CosmosMsg, Event, OwnedDeps, SubMsg, SubMsgResponse, SubMsgResult,
        SystemError, SystemResult, WasmMsg, WasmQuery,
    };
    use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

    /// Vault at 1 share = 2 assets, holding `shares` for the strategy,
    /// which itself holds `assets` of the underlying.
    fn mock_vault(
        deps: &mut OwnedDeps<MockStorage, MockApi, MockQuerier>,
        token: &Addr,
        shares: u128,
        assets: u128,
    ) {
        let token = token.to_string();
        deps.querier.update_wasm(move |query| match query {
            WasmQuery::Smart { contract_addr, msg } if *contract_addr == token => {
                let res = match from_json(msg).unwrap() {
                    Cw20QueryMsg::Balance { .. } => to_json_binary(&BalanceResponse {
                        balance: Uint128::new(assets),
                    }),
                    _ => return SystemResult::Err(SystemError::Unknown {}),
                };
                SystemResult::Ok(ContractResult::Ok(res.unwrap()))
            }
            WasmQuery::Smart { msg, .. } => {
                let res = match from_json(msg).unwrap() {
                    VaultQueryMsg::ConvertToAssets { shares } => {
                        to_json_binary(&(shares * Uint128::new(2)))
                    }
                    VaultQueryMsg::ConvertToShares { assets } => {
                        to_json_binary(&(assets / Uint128::new(2)))
                    }
                    VaultQueryMsg::Shares { .. } => to_json_binary(&Uint128::new(shares)),
                    VaultQueryMsg::Underlying {} => to_json_binary(&token),
                };
                SystemResult::Ok(ContractResult::Ok(res.unwrap()))
            }
            _ => SystemResult::Err(SystemError::Unknown {}),
        });
    }

    #[allow(deprecated)]
    fn reply_to(submsg: &SubMsg) -> Reply {
        Reply {
            id: submsg.id,
            payload: submsg.payload.clone(),
            gas_used: 0,
            result: SubMsgResult::Ok(SubMsgResponse {
                events: vec![],
                data: None,
                msg_responses: vec![],
            }),
        }
    }

    #[test]
    fn test_lock_and_unlock_measure_vault_balances() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let ledger = deps.api.addr_make("ledger");
        let token = deps.api.addr_make("token");
        let vault_addr = deps.api.addr_make("vault");

        instantiate(
            deps.as_mut(),
            mock_env(),
            message_info(&owner, &[]),
            InstantiateMsg {
                owner: owner.to_string(),
                ledger: ledger.to_string(),
            },
        )
        .unwrap();

        mock_vault(&mut deps, &token, 40, 0);
        execute::update_protocol_addresses(
            deps.as_mut(),
            mock_env(),
            message_info(&owner, &[]),
            token.clone(),
            vault_addr.clone(),
        )
        .unwrap();

        let res = execute::lock_tokens(
            deps.as_mut(),
            mock_env(),
            message_info(&ledger, &[]),
            owner.clone(),
            token.clone(),
            Uint128::new(100),
        )
        .unwrap();
        assert_eq!(
            res.messages[1].msg,
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: vault_addr.to_string(),
                msg: to_json_binary(&VaultExecuteMsg::Deposit {
                    amount: Uint128::new(100)
                })
                .unwrap(),
                funds: vec![],
            })
        );

        // the vault issued 49, one short of the 50 its price quoted
        mock_vault(&mut deps, &token, 89, 0);
        let res = reply(deps.as_mut(), mock_env(), reply_to(&res.messages[1])).unwrap();
        let shares: Uint128 = from_json(res.data.unwrap()).unwrap();
        assert_eq!(shares, Uint128::new(49));

        let res = execute::unlock_tokens(
            deps.as_mut(),
            mock_env(),
            message_info(&ledger, &[]),
            owner.clone(),
            token.clone(),
            Uint128::new(10),
            owner.clone(),
        )
        .unwrap();
        assert_eq!(
            res.messages[0].msg,
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: vault_addr.to_string(),
                msg: to_json_binary(&VaultExecuteMsg::Withdraw {
                    shares: Uint128::new(10)
                })
                .unwrap(),
                funds: vec![],
            })
        );

        mock_vault(&mut deps, &token, 79, 20);
        let res = reply(deps.as_mut(), mock_env(), reply_to(&res.messages[0])).unwrap();
        assert_eq!(
            res.messages[0].msg,
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: token.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: owner.to_string(),
                    amount: Uint128::new(20),
                })
                .unwrap(),
                funds: vec![],
            })
        );
        let amount: Uint128 = from_json(res.data.unwrap()).unwrap();
        assert_eq!(amount, Uint128::new(20));

        let res = query(
            deps.as_ref(),
            mock_env(),
            StrategyQueryMsg::Position {
                token: token.to_string(),
            },
        )
        .unwrap();
        let position: PositionResponse = from_json(res).unwrap();
        assert_eq!(
            position,
            PositionResponse {
                shares: Uint128::new(79),
                tokens: Uint128::new(158),
            }
        );
    }

    #[test]
    fn test_unlock_all_redeems_every_vault_share() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let ledger = deps.api.addr_make("ledger");
        let token = deps.api.addr_make("token");
        let recipient = deps.api.addr_make("recipient");

        instantiate(
            deps.as_mut(),
            mock_env(),
            message_info(&owner, &[]),
            InstantiateMsg {
                owner: owner.to_string(),
                ledger: ledger.to_string(),
            },
        )
        .unwrap();
        mock_vault(&mut deps, &token, 40, 0);
        let vault = deps.api.addr_make("vault");
        execute::update_protocol_addresses(
            deps.as_mut(),
            mock_env(),
            message_info(&owner, &[]),
            token.clone(),
            vault,
        )
        .unwrap();

        let res = execute::unlock_all_tokens(
            deps.as_mut(),
            mock_env(),
            message_info(&ledger, &[]),
            token.clone(),
            recipient.clone(),
        )
        .unwrap();

        mock_vault(&mut deps, &token, 0, 81);
        let res = reply(deps.as_mut(), mock_env(), reply_to(&res.messages[0])).unwrap();
        assert_eq!(
            res.events,
            vec![Event::new("AllTokensUnlocked")
                .add_attribute("token", token.as_str())
                .add_attribute("shares", "40")
                .add_attribute("amount", "81")
                .add_attribute("recipient", recipient.as_str())]
        );
    }
}
