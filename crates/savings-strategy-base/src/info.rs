use crate::ledger;
use crate::msg::StrategyInfoResponse;
use cosmwasm_std::{Deps, StdResult};

/// Identity of a strategy deployment, `kind` names the variant.
pub fn query_strategy_info(deps: Deps, kind: &str) -> StdResult<StrategyInfoResponse> {
    let version = cw2::get_contract_version(deps.storage)?;
    Ok(StrategyInfoResponse {
        ledger: ledger::get_ledger(deps.storage)?,
        kind: kind.to_string(),
        contract: version.contract,
        version: version.version,
    })
}
