#![cfg(not(target_arch = "wasm32"))]

use cosmwasm_std::{Addr, Empty, Env, Uint128};
use cw_multi_test::{App, Contract, ContractWrapper};
use savings_library::testing::TestingContract;
use savings_strategy_base::msg::{InstantiateMsg, StrategyExecuteMsg, StrategyQueryMsg};
use savings_strategy_base::rate::RATE_PRECISION;

#[derive(Clone, Debug, PartialEq)]
pub struct MoneyMarketStrategyContract {
    pub addr: Addr,
    pub init: InstantiateMsg,
}

impl TestingContract<InstantiateMsg, StrategyExecuteMsg, StrategyQueryMsg>
    for MoneyMarketStrategyContract
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
        let addr = Self::instantiate(app, code_id, "strategy:money-market", &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl MoneyMarketStrategyContract {
    /// Point the strategy at `market` for the market's underlying token.
    pub fn set_market(&self, app: &mut App, market: &MockMarketContract) {
        let owner = Addr::unchecked(&self.init.owner);
        let msg = StrategyExecuteMsg::UpdateProtocolAddresses {
            token: market.init.underlying.clone(),
            protocol: market.addr.to_string(),
        };
        self.execute(app, &owner, &msg).unwrap();
    }
}

/// Index-rate money market: wrapped balances per depositor,
/// redeemed at an exchange rate set by the test.
/// With a mint accrual set, every `Mint` first raises the rate by that fraction,
/// like a market that accrues interest on each interaction.
pub mod mock_market {
    use crate::market::MarketQueryMsg;
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Addr, Binary, Deps, DepsMut, Env, Event, MessageInfo, Response,
        StdResult, Uint128,
    };
    use cw_storage_plus::{Item, Map};
    use savings_strategy_base::rate::{self, RATE_PRECISION};
    use savings_strategy_base::token;

    const UNDERLYING: Item<Addr> = Item::new("underlying");
    const EXCHANGE_RATE: Item<Uint128> = Item::new("exchange_rate");
    const BALANCES: Map<&Addr, Uint128> = Map::new("balances");
    const MINT_ACCRUAL: Item<Uint128> = Item::new("mint_accrual");

    #[cw_serde]
    pub struct InstantiateMsg {
        pub underlying: String,
        pub exchange_rate: Uint128,
    }

    /// `Mint` and `Redeem` match [crate::market::MarketExecuteMsg].
    #[cw_serde]
    pub enum ExecuteMsg {
        Mint { amount: Uint128 },
        Redeem { shares: Uint128 },
        SetExchangeRate { exchange_rate: Uint128 },
        /// 18-decimal fraction the rate grows by on every `Mint`.
        SetMintAccrual { accrual: Uint128 },
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        let underlying = deps.api.addr_validate(&msg.underlying)?;
        UNDERLYING.save(deps.storage, &underlying)?;
        EXCHANGE_RATE.save(deps.storage, &msg.exchange_rate)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        let underlying = UNDERLYING.load(deps.storage)?;
        let mut exchange_rate = EXCHANGE_RATE.load(deps.storage)?;

        match msg {
            ExecuteMsg::Mint { amount } => {
                let accrual = MINT_ACCRUAL.may_load(deps.storage)?.unwrap_or_default();
                if !accrual.is_zero() {
                    exchange_rate =
                        rate::shares_to_tokens(exchange_rate, RATE_PRECISION.checked_add(accrual)?)?;
                    EXCHANGE_RATE.save(deps.storage, &exchange_rate)?;
                }

                let shares = rate::tokens_to_shares(amount, exchange_rate)?;
                BALANCES.update(deps.storage, &info.sender, |balance| -> StdResult<_> {
                    Ok(balance.unwrap_or_default().checked_add(shares)?)
                })?;

                let transfer_from_msg =
                    token::transfer_from(&underlying, &info.sender, &env.contract.address, amount)?;
                Ok(Response::new()
                    .add_message(transfer_from_msg)
                    .add_event(Event::new("Mint").add_attribute("shares", shares)))
            }
            ExecuteMsg::Redeem { shares } => {
                BALANCES.update(deps.storage, &info.sender, |balance| -> StdResult<_> {
                    Ok(balance.unwrap_or_default().checked_sub(shares)?)
                })?;

                let amount = rate::shares_to_tokens(shares, exchange_rate)?;
                let transfer_msg = token::transfer(&underlying, &info.sender, amount)?;
                Ok(Response::new()
                    .add_message(transfer_msg)
                    .add_event(Event::new("Redeem").add_attribute("amount", amount)))
            }
            ExecuteMsg::SetExchangeRate { exchange_rate } => {
                EXCHANGE_RATE.save(deps.storage, &exchange_rate)?;
                Ok(Response::new())
            }
            ExecuteMsg::SetMintAccrual { accrual } => {
                MINT_ACCRUAL.save(deps.storage, &accrual)?;
                Ok(Response::new())
            }
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: MarketQueryMsg) -> StdResult<Binary> {
        match msg {
            MarketQueryMsg::ExchangeRate {} => to_json_binary(&EXCHANGE_RATE.load(deps.storage)?),
            MarketQueryMsg::Balance { address } => {
                let address = deps.api.addr_validate(&address)?;
                let balance = BALANCES.may_load(deps.storage, &address)?;
                to_json_binary(&balance.unwrap_or_default())
            }
            MarketQueryMsg::Underlying {} => to_json_binary(&UNDERLYING.load(deps.storage)?),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MockMarketContract {
    pub addr: Addr,
    pub init: mock_market::InstantiateMsg,
}

impl
    TestingContract<
        mock_market::InstantiateMsg,
        mock_market::ExecuteMsg,
        crate::market::MarketQueryMsg,
    > for MockMarketContract
{
    fn wrapper() -> Box<dyn Contract<Empty>> {
        Box::new(ContractWrapper::new(
            mock_market::execute,
            mock_market::instantiate,
            mock_market::query,
        ))
    }

    fn default_init(app: &mut App, _env: &Env) -> mock_market::InstantiateMsg {
        mock_market::InstantiateMsg {
            underlying: Self::get_contract_addr(app, "cw20:SUSD").to_string(),
            exchange_rate: RATE_PRECISION,
        }
    }

    fn new(app: &mut App, env: &Env, msg: Option<mock_market::InstantiateMsg>) -> Self {
        let init = msg.unwrap_or_else(|| Self::default_init(app, env));
        let code_id = Self::store_code(app);
        let addr = Self::instantiate(app, code_id, "backend:money-market", &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl MockMarketContract {
    pub fn set_exchange_rate(&self, app: &mut App, exchange_rate: Uint128) {
        let sender = app.api().addr_make("anyone");
        let msg = mock_market::ExecuteMsg::SetExchangeRate { exchange_rate };
        self.execute(app, &sender, &msg).unwrap();
    }

    pub fn set_mint_accrual(&self, app: &mut App, accrual: Uint128) {
        let sender = app.api().addr_make("anyone");
        let msg = mock_market::ExecuteMsg::SetMintAccrual { accrual };
        self.execute(app, &sender, &msg).unwrap();
    }
}
