use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, QuerierWrapper, StdResult, Uint128, WasmMsg};

#[cw_serde]
pub enum VaultExecuteMsg {
    /// Pull `amount` assets from the sender (by allowance) and issue vault shares.
    Deposit { amount: Uint128 },
    /// Burn `shares` of the sender and send the assets they are worth to the sender.
    Withdraw { shares: Uint128 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum VaultQueryMsg {
    #[returns(Uint128)]
    ConvertToAssets { shares: Uint128 },

    #[returns(Uint128)]
    ConvertToShares { assets: Uint128 },

    /// Vault shares held by `staker`.
    #[returns(Uint128)]
    Shares { staker: String },

    #[returns(Addr)]
    Underlying {},
}

pub fn query_convert_to_assets(
    querier: &QuerierWrapper,
    vault: &Addr,
    shares: Uint128,
) -> StdResult<Uint128> {
    querier.query_wasm_smart(vault.to_string(), &VaultQueryMsg::ConvertToAssets { shares })
}

pub fn query_convert_to_shares(
    querier: &QuerierWrapper,
    vault: &Addr,
    assets: Uint128,
) -> StdResult<Uint128> {
    querier.query_wasm_smart(vault.to_string(), &VaultQueryMsg::ConvertToShares { assets })
}

pub fn query_shares(querier: &QuerierWrapper, vault: &Addr, staker: &Addr) -> StdResult<Uint128> {
    querier.query_wasm_smart(
        vault.to_string(),
        &VaultQueryMsg::Shares {
            staker: staker.to_string(),
        },
    )
}

pub fn query_underlying(querier: &QuerierWrapper, vault: &Addr) -> StdResult<Addr> {
    querier.query_wasm_smart(vault.to_string(), &VaultQueryMsg::Underlying {})
}

pub fn deposit(vault: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: vault.to_string(),
        msg: to_json_binary(&VaultExecuteMsg::Deposit { amount })?,
        funds: vec![],
    }
    .into())
}

pub fn withdraw(vault: &Addr, shares: Uint128) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: vault.to_string(),
        msg: to_json_binary(&VaultExecuteMsg::Withdraw { shares })?,
        funds: vec![],
    }
    .into())
}
