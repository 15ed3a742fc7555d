#![cfg(not(target_arch = "wasm32"))]

use cosmwasm_std::{Addr, Empty, Env, Uint128};
use cw_multi_test::{App, Contract, ContractWrapper};
use savings_library::testing::TestingContract;
use savings_strategy_base::msg::{InstantiateMsg, StrategyExecuteMsg, StrategyQueryMsg};

#[derive(Clone, Debug, PartialEq)]
pub struct LendingPoolStrategyContract {
    pub addr: Addr,
    pub init: InstantiateMsg,
}

impl TestingContract<InstantiateMsg, StrategyExecuteMsg, StrategyQueryMsg>
    for LendingPoolStrategyContract
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
        let addr = Self::instantiate(app, code_id, "strategy:lending-pool", &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl LendingPoolStrategyContract {
    /// Point the strategy at `pool` for the pool's underlying token.
    pub fn set_pool(&self, app: &mut App, pool: &MockPoolContract) {
        let owner = Addr::unchecked(&self.init.owner);
        let msg = StrategyExecuteMsg::UpdateProtocolAddresses {
            token: pool.init.underlying.clone(),
            protocol: pool.addr.to_string(),
        };
        self.execute(app, &owner, &msg).unwrap();
    }
}

/// Lending pool with a rebasing claim: balances are stored scaled down by the
/// liquidity index and read back scaled up, so raising the index grows every claim.
pub mod mock_pool {
    use crate::pool::PoolQueryMsg;
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdError,
        StdResult, Uint128,
    };
    use cw_storage_plus::{Item, Map};
    use savings_strategy_base::rate::{self, RATE_PRECISION};
    use savings_strategy_base::token;

    const UNDERLYING: Item<Addr> = Item::new("underlying");
    const LIQUIDITY_INDEX: Item<Uint128> = Item::new("liquidity_index");
    const SCALED_BALANCES: Map<&Addr, Uint128> = Map::new("scaled_balances");

    #[cw_serde]
    pub struct InstantiateMsg {
        pub underlying: String,
    }

    /// `Deposit` and `Withdraw` match [crate::pool::PoolExecuteMsg].
    #[cw_serde]
    pub enum ExecuteMsg {
        Deposit { amount: Uint128 },
        Withdraw { amount: Uint128 },
        SetLiquidityIndex { index: Uint128 },
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        let underlying = deps.api.addr_validate(&msg.underlying)?;
        UNDERLYING.save(deps.storage, &underlying)?;
        LIQUIDITY_INDEX.save(deps.storage, &RATE_PRECISION)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        let underlying = UNDERLYING.load(deps.storage)?;
        let index = LIQUIDITY_INDEX.load(deps.storage)?;

        match msg {
            ExecuteMsg::Deposit { amount } => {
                let scaled = rate::tokens_to_shares(amount, index)?;
                SCALED_BALANCES.update(deps.storage, &info.sender, |balance| -> StdResult<_> {
                    Ok(balance.unwrap_or_default().checked_add(scaled)?)
                })?;

                let msg =
                    token::transfer_from(&underlying, &info.sender, &env.contract.address, amount)?;
                Ok(Response::new().add_message(msg))
            }
            ExecuteMsg::Withdraw { amount } => {
                // burn rounds up
                let scaled = amount
                    .checked_mul_ceil((RATE_PRECISION, index))
                    .map_err(|err| StdError::generic_err(err.to_string()))?;
                SCALED_BALANCES.update(deps.storage, &info.sender, |balance| -> StdResult<_> {
                    Ok(balance.unwrap_or_default().checked_sub(scaled)?)
                })?;

                let msg = token::transfer(&underlying, &info.sender, amount)?;
                Ok(Response::new().add_message(msg))
            }
            ExecuteMsg::SetLiquidityIndex { index } => {
                LIQUIDITY_INDEX.save(deps.storage, &index)?;
                Ok(Response::new())
            }
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: PoolQueryMsg) -> StdResult<Binary> {
        match msg {
            PoolQueryMsg::Balance { address } => {
                let address = deps.api.addr_validate(&address)?;
                let scaled = SCALED_BALANCES
                    .may_load(deps.storage, &address)?
                    .unwrap_or_default();
                let index = LIQUIDITY_INDEX.load(deps.storage)?;
                to_json_binary(&rate::shares_to_tokens(scaled, index)?)
            }
            PoolQueryMsg::Underlying {} => to_json_binary(&UNDERLYING.load(deps.storage)?),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MockPoolContract {
    pub addr: Addr,
    pub init: mock_pool::InstantiateMsg,
}

impl TestingContract<mock_pool::InstantiateMsg, mock_pool::ExecuteMsg, crate::pool::PoolQueryMsg>
    for MockPoolContract
{
    fn wrapper() -> Box<dyn Contract<Empty>> {
        Box::new(ContractWrapper::new(
            mock_pool::execute,
            mock_pool::instantiate,
            mock_pool::query,
        ))
    }

    fn default_init(app: &mut App, _env: &Env) -> mock_pool::InstantiateMsg {
        mock_pool::InstantiateMsg {
            underlying: Self::get_contract_addr(app, "cw20:SUSD").to_string(),
        }
    }

    fn new(app: &mut App, env: &Env, msg: Option<mock_pool::InstantiateMsg>) -> Self {
        let init = msg.unwrap_or_else(|| Self::default_init(app, env));
        let code_id = Self::store_code(app);
        let addr = Self::instantiate(app, code_id, "backend:lending-pool", &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl MockPoolContract {
    pub fn set_liquidity_index(&self, app: &mut App, index: Uint128) {
        let sender = app.api().addr_make("anyone");
        let msg = mock_pool::ExecuteMsg::SetLiquidityIndex { index };
        self.execute(app, &sender, &msg).unwrap();
    }
}
