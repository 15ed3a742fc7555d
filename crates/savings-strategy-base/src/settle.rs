//! Backend calls are dispatched as submessages and settled in `reply`.
//! Shares issued and tokens returned are measured as the difference of a balance
//! taken before and after the backend call, never re-derived from a rate.

use crate::{response, token, StrategyError};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, CosmosMsg, QuerierWrapper, Response, StdError, StdResult, SubMsg,
    Uint128,
};

pub const LOCK_REPLY_ID: u64 = 1;
pub const UNLOCK_REPLY_ID: u64 = 2;

/// Carried as the payload of the [LOCK_REPLY_ID] submessage.
#[cw_serde]
pub struct PendingLock {
    pub owner: Addr,
    pub token: Addr,
    pub amount: Uint128,
    /// Backend balance of the strategy before the deposit, in backend units.
    pub balance_before: Uint128,
}

/// Carried as the payload of the [UNLOCK_REPLY_ID] submessage.
#[cw_serde]
pub struct PendingUnlock {
    /// `None` when unlocking the whole position.
    pub owner: Option<Addr>,
    pub token: Addr,
    pub shares: Uint128,
    pub recipient: Addr,
    /// Underlying balance of the strategy before the redemption.
    pub balance_before: Uint128,
}

impl PendingLock {
    pub fn submsg(&self, msg: CosmosMsg) -> StdResult<SubMsg> {
        Ok(SubMsg::reply_on_success(msg, LOCK_REPLY_ID).with_payload(to_json_binary(self)?))
    }
}

impl PendingUnlock {
    pub fn submsg(&self, msg: CosmosMsg) -> StdResult<SubMsg> {
        Ok(SubMsg::reply_on_success(msg, UNLOCK_REPLY_ID).with_payload(to_json_binary(self)?))
    }
}

/// Amount a balance grew by across a backend call.
pub fn received(balance_before: Uint128, balance_after: Uint128) -> StdResult<Uint128> {
    balance_after
        .checked_sub(balance_before)
        .map_err(StdError::from)
}

/// Settle a lock with the `shares` measured by the strategy, data is `shares`.
pub fn tokens_locked(pending: PendingLock, shares: Uint128) -> Result<Response, StrategyError> {
    if shares.is_zero() {
        return Err(StrategyError::ZeroShares {});
    }

    Ok(response::tokens_locked(
        vec![],
        &pending.owner,
        &pending.token,
        pending.amount,
        shares,
    )?)
}

/// Settle an unlock: forward the underlying the backend actually returned to `recipient`,
/// data is that amount.
pub fn tokens_unlocked(
    querier: &QuerierWrapper,
    contract: &Addr,
    pending: PendingUnlock,
) -> Result<Response, StrategyError> {
    let balance = token::query_balance(querier, &pending.token, contract)?;
    let amount = received(pending.balance_before, balance)?;

    match pending.owner {
        Some(owner) => {
            if amount.is_zero() {
                return Err(StrategyError::ZeroAmount {});
            }
            let transfer_msg = token::transfer(&pending.token, &pending.recipient, amount)?;
            Ok(response::tokens_unlocked(
                vec![transfer_msg],
                &owner,
                &pending.token,
                pending.shares,
                amount,
                &pending.recipient,
            )?)
        }
        None => {
            let msgs = if amount.is_zero() {
                vec![]
            } else {
                vec![token::transfer(&pending.token, &pending.recipient, amount)?]
            };
            Ok(response::all_tokens_unlocked(
                msgs,
                &pending.token,
                pending.shares,
                amount,
                &pending.recipient,
            )?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{mock_dependencies, MockApi};
    use cosmwasm_std::{
        from_json, ContractResult, Event, ReplyOn, SystemError, SystemResult, WasmMsg, WasmQuery,
    };
    use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

    #[test]
    fn lock_submsg_carries_payload() {
        let api = MockApi::default();
        let pending = PendingLock {
            owner: api.addr_make("owner"),
            token: api.addr_make("token"),
            amount: Uint128::new(100),
            balance_before: Uint128::new(7),
        };
        let msg = token::transfer(&pending.token, &pending.owner, Uint128::new(1)).unwrap();

        let submsg = pending.submsg(msg).unwrap();
        assert_eq!(submsg.id, LOCK_REPLY_ID);
        assert_eq!(submsg.reply_on, ReplyOn::Success);
        let payload: PendingLock = from_json(&submsg.payload).unwrap();
        assert_eq!(payload, pending);
    }

    #[test]
    fn lock_settles_measured_shares() {
        let api = MockApi::default();
        let owner = api.addr_make("owner");
        let token = api.addr_make("token");
        let pending = PendingLock {
            owner: owner.clone(),
            token: token.clone(),
            amount: Uint128::new(1_000),
            balance_before: Uint128::new(500),
        };

        // the backend moved its rate during the deposit, 980 issued instead of 990
        let shares = received(pending.balance_before, Uint128::new(1_480)).unwrap();
        let res = tokens_locked(pending.clone(), shares).unwrap();
        assert_eq!(
            res.events,
            vec![Event::new("TokensLocked")
                .add_attribute("owner", owner.as_str())
                .add_attribute("token", token.as_str())
                .add_attribute("amount", "1000")
                .add_attribute("shares", "980")]
        );
        let data: Uint128 = from_json(res.data.unwrap()).unwrap();
        assert_eq!(data, Uint128::new(980));

        let err = tokens_locked(pending, Uint128::zero()).unwrap_err();
        assert_eq!(err, StrategyError::ZeroShares {});
    }

    #[test]
    fn unlock_forwards_what_was_received() {
        let mut deps = mock_dependencies();
        let contract = deps.api.addr_make("strategy");
        let token = deps.api.addr_make("token");
        let recipient = deps.api.addr_make("recipient");

        deps.querier.update_wasm(|query| match query {
            WasmQuery::Smart { msg, .. } => match from_json(msg).unwrap() {
                Cw20QueryMsg::Balance { .. } => {
                    let res = BalanceResponse {
                        balance: Uint128::new(1_509),
                    };
                    SystemResult::Ok(ContractResult::Ok(to_json_binary(&res).unwrap()))
                }
                _ => SystemResult::Err(SystemError::Unknown {}),
            },
            _ => SystemResult::Err(SystemError::Unknown {}),
        });

        let pending = PendingUnlock {
            owner: Some(deps.api.addr_make("owner")),
            token: token.clone(),
            shares: Uint128::new(990),
            recipient: recipient.clone(),
            balance_before: Uint128::new(500),
        };
        let res = tokens_unlocked(&deps.as_ref().querier, &contract, pending).unwrap();

        assert_eq!(
            res.messages[0].msg,
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: token.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount: Uint128::new(1_009),
                })
                .unwrap(),
                funds: vec![],
            })
        );
        let data: Uint128 = from_json(res.data.unwrap()).unwrap();
        assert_eq!(data, Uint128::new(1_009));

        // nothing came back
        let pending = PendingUnlock {
            owner: Some(deps.api.addr_make("owner")),
            token,
            shares: Uint128::new(1),
            recipient,
            balance_before: Uint128::new(1_509),
        };
        let err = tokens_unlocked(&deps.as_ref().querier, &contract, pending).unwrap_err();
        assert_eq!(err, StrategyError::ZeroAmount {});
    }
}
