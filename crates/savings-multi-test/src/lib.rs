#![cfg(not(target_arch = "wasm32"))]
// Only exposed on unit and integration testing, not compiled to Wasm.

pub use savings_ledger::testing::LedgerContract;
pub use savings_library::testing::{Cw20TokenContract, TestingContract};
pub use savings_registry::testing::RegistryContract;
pub use savings_strategy_lending_pool::testing::{LendingPoolStrategyContract, MockPoolContract};
pub use savings_strategy_money_market::testing::{MockMarketContract, MoneyMarketStrategyContract};
pub use savings_strategy_passthrough::testing::PassthroughStrategyContract;
pub use savings_strategy_yield_vault::testing::{MockVaultContract, YieldVaultStrategyContract};
use cosmwasm_std::{Addr, Env};
use cw20::MinterResponse;
use cw_multi_test::App;

pub struct SavingsMultiTest {
    pub cw20_token: Cw20TokenContract,
    pub registry: RegistryContract,
    pub ledger: LedgerContract,
    pub passthrough: PassthroughStrategyContract,
    pub market: MockMarketContract,
    pub money_market: MoneyMarketStrategyContract,
    pub vault: MockVaultContract,
    pub yield_vault: YieldVaultStrategyContract,
    pub pool: MockPoolContract,
    pub lending_pool: LendingPoolStrategyContract,
}

impl SavingsMultiTest {
    /// Every deployed strategy, in registry order.
    pub fn strategies(&self) -> Vec<Addr> {
        vec![
            self.passthrough.addr.clone(),
            self.money_market.addr.clone(),
            self.yield_vault.addr.clone(),
            self.lending_pool.addr.clone(),
        ]
    }
}

pub struct SavingsMultiTestBuilder {
    app: App,
    env: Env,
}

/// [SavingsMultiTest] provides a convenient way to bootstrap the whole savings system:
/// an underlying CW20, the registry, the ledger and one strategy of each variant
/// wired to its mock backend and registered.
impl SavingsMultiTestBuilder {
    pub fn new(app: App, env: Env) -> Self {
        Self { app, env }
    }

    /// Builds the [SavingsMultiTest] instance, returning the [App] it was deployed into.
    pub fn build(mut self) -> (App, SavingsMultiTest) {
        let app = &mut self.app;
        let env = &self.env;

        let minter = app.api().addr_make("minter");
        let cw20_token = Self::deploy_cw20_token(app, env, "SUSD", minter);
        let registry = RegistryContract::new(app, env, None);
        let ledger = LedgerContract::new(app, env, None);

        let passthrough = PassthroughStrategyContract::new(app, env, None);

        let market = MockMarketContract::new(app, env, None);
        let money_market = MoneyMarketStrategyContract::new(app, env, None);
        money_market.set_market(app, &market);

        let vault = MockVaultContract::new(app, env, None);
        let yield_vault = YieldVaultStrategyContract::new(app, env, None);
        yield_vault.set_vault(app, &vault);

        let pool = MockPoolContract::new(app, env, None);
        let lending_pool = LendingPoolStrategyContract::new(app, env, None);
        lending_pool.set_pool(app, &pool);

        let contracts = SavingsMultiTest {
            cw20_token,
            registry,
            ledger,
            passthrough,
            market,
            money_market,
            vault,
            yield_vault,
            pool,
            lending_pool,
        };
        for strategy in contracts.strategies() {
            Self::register_strategy(app, &contracts.registry, &strategy);
        }

        (self.app, contracts)
    }

    /// Adds `strategy` to the registry as its owner.
    pub fn register_strategy(app: &mut App, registry: &RegistryContract, strategy: &Addr) {
        let owner = Addr::unchecked(&registry.init.owner);
        let msg = savings_registry::msg::ExecuteMsg::AddStrategy {
            strategy: strategy.to_string(),
        };
        registry.execute(app, &owner, &msg).unwrap();
    }

    /// Deploys a new [Cw20TokenContract] with the given symbol and minter address.
    pub fn deploy_cw20_token(
        app: &mut App,
        env: &Env,
        symbol: impl Into<String>,
        minter: impl Into<String>,
    ) -> Cw20TokenContract {
        let symbol = symbol.into();
        let init_msg = cw20_base::msg::InstantiateMsg {
            symbol: symbol.clone(),
            name: format!("Token {}", symbol),
            decimals: 6,
            initial_balances: vec![],
            mint: Some(MinterResponse {
                minter: minter.into(),
                cap: None,
            }),
            marketing: None,
        };

        Cw20TokenContract::new(app, env, Some(init_msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_env;
    use cosmwasm_std::Uint128;
    use savings_ledger::msg::ExecuteMsg;
    use savings_registry::msg::{QueryMsg, StrategiesResponse};

    #[test]
    fn test_new() {
        let app = App::default();
        let env = mock_env();

        let (app, contracts) = SavingsMultiTestBuilder::new(app, env).build();

        let StrategiesResponse(strategies) = contracts
            .registry
            .query(&app, &QueryMsg::Strategies {})
            .unwrap();
        assert_eq!(strategies, contracts.strategies());
    }

    #[test]
    fn deposit_across_every_strategy() {
        let (mut app, contracts) = SavingsMultiTestBuilder::new(App::default(), mock_env()).build();
        let staker = app.api().addr_make("staker");
        let token = contracts.cw20_token.addr.clone();

        contracts.cw20_token.fund(&mut app, &staker, 4_000);
        contracts
            .cw20_token
            .increase_allowance(&mut app, &staker, &contracts.ledger.addr, 4_000);

        for strategy in contracts.strategies() {
            let msg = ExecuteMsg::Deposit {
                amount: Uint128::new(1_000),
                token: token.to_string(),
                strategy: strategy.to_string(),
                recipient: staker.to_string(),
            };
            contracts.ledger.execute(&mut app, &staker, &msg).unwrap();
            assert_eq!(
                contracts.ledger.shares(&app, &staker, &token, &strategy),
                Uint128::new(1_000)
            );
        }

        assert_eq!(contracts.cw20_token.balance(&app, &staker), 0);
        assert_eq!(
            contracts.ledger.total_tokens(&app, &staker, &token),
            Uint128::new(4_000)
        );
    }
}
