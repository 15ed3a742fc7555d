#![cfg(not(target_arch = "wasm32"))]

use cosmwasm_std::{Addr, Empty, Env};
use cw_multi_test::{App, Contract, ContractWrapper};
use savings_library::testing::TestingContract;
use savings_strategy_base::msg::{InstantiateMsg, StrategyExecuteMsg, StrategyQueryMsg};

#[derive(Clone, Debug, PartialEq)]
pub struct YieldVaultStrategyContract {
    pub addr: Addr,
    pub init: InstantiateMsg,
}

impl TestingContract<InstantiateMsg, StrategyExecuteMsg, StrategyQueryMsg>
    for YieldVaultStrategyContract
{
    fn wrapper() -> Box<dyn Contract<Empty>> {
        Box::new(
            ContractWrapper::new(
                crate::contract::execute,
                crate::contract::instantiate,
                crate::contract::query,
            )
            .with_reply(crate::contract::reply)
            .with_migrate(crate::contract::migrate),
        )
    }

    fn default_init(app: &mut App, _env: &Env) -> InstantiateMsg {
        InstantiateMsg {
            owner: app.api().addr_make("owner").to_string(),
            ledger: Self::get_contract_addr(app, "ledger").to_string(),
        }
    }

    fn new(app: &mut App, env: &Env, msg: Option<InstantiateMsg>) -> Self {
        let init = msg.unwrap_or_else(|| Self::default_init(app, env));
        let code_id = Self::store_code(app);
        let addr = Self::instantiate(app, code_id, "strategy:yield-vault", &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl YieldVaultStrategyContract {
    /// Point the strategy at `vault` for the vault's underlying token.
    pub fn set_vault(&self, app: &mut App, vault: &MockVaultContract) {
        let owner = Addr::unchecked(&self.init.owner);
        let msg = StrategyExecuteMsg::UpdateProtocolAddresses {
            token: vault.init.underlying.clone(),
            protocol: vault.addr.to_string(),
        };
        self.execute(app, &owner, &msg).unwrap();
    }
}

/// Yield vault priced by its own underlying balance.
/// Sending underlying to the vault directly raises the share price for every holder.
pub mod mock_vault {
    use crate::vault::VaultQueryMsg;
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdError,
        StdResult, Uint128,
    };
    use cw_storage_plus::{Item, Map};
    use savings_strategy_base::offset::VirtualOffset;
    use savings_strategy_base::token;

    const UNDERLYING: Item<Addr> = Item::new("underlying");
    const TOTAL_SHARES: Item<Uint128> = Item::new("total_shares");
    const SHARES: Map<&Addr, Uint128> = Map::new("shares");

    #[cw_serde]
    pub struct InstantiateMsg {
        pub underlying: String,
    }

    /// Same variants as [crate::vault::VaultExecuteMsg].
    #[cw_serde]
    pub enum ExecuteMsg {
        Deposit { amount: Uint128 },
        Withdraw { shares: Uint128 },
    }

    fn load_offset(deps: Deps, env: &Env) -> StdResult<VirtualOffset> {
        let underlying = UNDERLYING.load(deps.storage)?;
        let total_assets = token::query_balance(&deps.querier, &underlying, &env.contract.address)?;
        let total_shares = TOTAL_SHARES.may_load(deps.storage)?.unwrap_or_default();
        VirtualOffset::new(total_shares, total_assets)
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        let underlying = deps.api.addr_validate(&msg.underlying)?;
        UNDERLYING.save(deps.storage, &underlying)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        let underlying = UNDERLYING.load(deps.storage)?;
        let offset = load_offset(deps.as_ref(), &env)?;

        match msg {
            ExecuteMsg::Deposit { amount } => {
                let shares = offset.assets_to_shares(amount)?;
                if shares.is_zero() {
                    return Err(StdError::generic_err("vault: zero shares"));
                }
                TOTAL_SHARES.save(deps.storage, &offset.total_shares().checked_add(shares)?)?;
                SHARES.update(deps.storage, &info.sender, |balance| -> StdResult<_> {
                    Ok(balance.unwrap_or_default().checked_add(shares)?)
                })?;

                let msg =
                    token::transfer_from(&underlying, &info.sender, &env.contract.address, amount)?;
                Ok(Response::new().add_message(msg))
            }
            ExecuteMsg::Withdraw { shares } => {
                let amount = offset.shares_to_assets(shares)?;
                TOTAL_SHARES.save(deps.storage, &offset.total_shares().checked_sub(shares)?)?;
                SHARES.update(deps.storage, &info.sender, |balance| -> StdResult<_> {
                    Ok(balance.unwrap_or_default().checked_sub(shares)?)
                })?;

                let msg = token::transfer(&underlying, &info.sender, amount)?;
                Ok(Response::new().add_message(msg))
            }
        }
    }

    pub fn query(deps: Deps, env: Env, msg: VaultQueryMsg) -> StdResult<Binary> {
        match msg {
            VaultQueryMsg::ConvertToAssets { shares } => {
                to_json_binary(&load_offset(deps, &env)?.shares_to_assets(shares)?)
            }
            VaultQueryMsg::ConvertToShares { assets } => {
                to_json_binary(&load_offset(deps, &env)?.assets_to_shares(assets)?)
            }
            VaultQueryMsg::Shares { staker } => {
                let staker = deps.api.addr_validate(&staker)?;
                let shares = SHARES.may_load(deps.storage, &staker)?;
                to_json_binary(&shares.unwrap_or_default())
            }
            VaultQueryMsg::Underlying {} => to_json_binary(&UNDERLYING.load(deps.storage)?),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MockVaultContract {
    pub addr: Addr,
    pub init: mock_vault::InstantiateMsg,
}

impl TestingContract<mock_vault::InstantiateMsg, mock_vault::ExecuteMsg, crate::vault::VaultQueryMsg>
    for MockVaultContract
{
    fn wrapper() -> Box<dyn Contract<Empty>> {
        Box::new(ContractWrapper::new(
            mock_vault::execute,
            mock_vault::instantiate,
            mock_vault::query,
        ))
    }

    fn default_init(app: &mut App, _env: &Env) -> mock_vault::InstantiateMsg {
        mock_vault::InstantiateMsg {
            underlying: Self::get_contract_addr(app, "cw20:SUSD").to_string(),
        }
    }

    fn new(app: &mut App, env: &Env, msg: Option<mock_vault::InstantiateMsg>) -> Self {
        let init = msg.unwrap_or_else(|| Self::default_init(app, env));
        let code_id = Self::store_code(app);
        let addr = Self::instantiate(app, code_id, "backend:yield-vault", &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}
