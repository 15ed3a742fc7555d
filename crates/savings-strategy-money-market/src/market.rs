use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, QuerierWrapper, StdResult, Uint128, WasmMsg};

#[cw_serde]
pub enum MarketExecuteMsg {
    /// Pull `amount` underlying from the sender (by allowance) and mint wrapped units.
    Mint { amount: Uint128 },
    /// Burn `shares` wrapped units and send the underlying to the sender.
    Redeem { shares: Uint128 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum MarketQueryMsg {
    /// 18-decimal index: underlying per wrapped unit.
    #[returns(Uint128)]
    ExchangeRate {},

    /// Wrapped balance of `address`.
    #[returns(Uint128)]
    Balance { address: String },

    #[returns(Addr)]
    Underlying {},
}

pub fn query_exchange_rate(querier: &QuerierWrapper, market: &Addr) -> StdResult<Uint128> {
    querier.query_wasm_smart(market.to_string(), &MarketQueryMsg::ExchangeRate {})
}

pub fn query_balance(querier: &QuerierWrapper, market: &Addr, address: &Addr) -> StdResult<Uint128> {
    querier.query_wasm_smart(
        market.to_string(),
        &MarketQueryMsg::Balance {
            address: address.to_string(),
        },
    )
}

pub fn query_underlying(querier: &QuerierWrapper, market: &Addr) -> StdResult<Addr> {
    querier.query_wasm_smart(market.to_string(), &MarketQueryMsg::Underlying {})
}

pub fn mint(market: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: market.to_string(),
        msg: to_json_binary(&MarketExecuteMsg::Mint { amount })?,
        funds: vec![],
    }
    .into())
}

pub fn redeem(market: &Addr, shares: Uint128) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: market.to_string(),
        msg: to_json_binary(&MarketExecuteMsg::Redeem { shares })?,
        funds: vec![],
    }
    .into())
}
