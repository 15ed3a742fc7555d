use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, QuerierWrapper, StdResult, Uint128, WasmMsg};

#[cw_serde]
pub enum PoolExecuteMsg {
    /// Pull `amount` underlying from the sender (by allowance) and credit the same claim.
    Deposit { amount: Uint128 },
    /// Reduce the sender claim by `amount` and send `amount` underlying to the sender.
    Withdraw { amount: Uint128 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum PoolQueryMsg {
    /// Claim balance of `address`, interest included.
    #[returns(Uint128)]
    Balance { address: String },

    #[returns(Addr)]
    Underlying {},
}

pub fn query_balance(querier: &QuerierWrapper, pool: &Addr, address: &Addr) -> StdResult<Uint128> {
    querier.query_wasm_smart(
        pool.to_string(),
        &PoolQueryMsg::Balance {
            address: address.to_string(),
        },
    )
}

pub fn query_underlying(querier: &QuerierWrapper, pool: &Addr) -> StdResult<Addr> {
    querier.query_wasm_smart(pool.to_string(), &PoolQueryMsg::Underlying {})
}

pub fn deposit(pool: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: pool.to_string(),
        msg: to_json_binary(&PoolExecuteMsg::Deposit { amount })?,
        funds: vec![],
    }
    .into())
}

pub fn withdraw(pool: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: pool.to_string(),
        msg: to_json_binary(&PoolExecuteMsg::Withdraw { amount })?,
        funds: vec![],
    }
    .into())
}
