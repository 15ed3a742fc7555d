use crate::testing::TestingContract;
use cosmwasm_std::{Addr, Empty, Env, Uint128};
use cw20::MinterResponse;
use cw_multi_test::{App, Contract, ContractWrapper};
use serde::{Deserialize, Serialize};

/// CW20 underlying token (`cw20-base`) used by every strategy and ledger test.
/// The `minter` account can [Cw20TokenContract::fund] anyone.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Cw20TokenContract {
    pub addr: Addr,
    pub init: cw20_base::msg::InstantiateMsg,
}

impl
    TestingContract<
        cw20_base::msg::InstantiateMsg,
        cw20_base::msg::ExecuteMsg,
        cw20_base::msg::QueryMsg,
    > for Cw20TokenContract
{
    fn wrapper() -> Box<dyn Contract<Empty>> {
        Box::new(ContractWrapper::new(
            cw20_base::contract::execute,
            cw20_base::contract::instantiate,
            cw20_base::contract::query,
        ))
    }

    fn default_init(app: &mut App, _env: &Env) -> cw20_base::msg::InstantiateMsg {
        cw20_base::msg::InstantiateMsg {
            name: "Savings Dollar".to_string(),
            symbol: "SUSD".to_string(),
            decimals: 6,
            initial_balances: vec![],
            mint: Some(MinterResponse {
                minter: app.api().addr_make("minter").to_string(),
                cap: None,
            }),
            marketing: None,
        }
    }

    fn new(app: &mut App, env: &Env, msg: Option<cw20_base::msg::InstantiateMsg>) -> Self {
        let init = msg.unwrap_or(Self::default_init(app, env));
        let code_id = Self::store_code(app);
        let label = format!("cw20:{}", init.symbol);
        let addr = Self::instantiate(app, code_id, &label, &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl Cw20TokenContract {
    /// Mint `amount` to `recipient` using the configured minter.
    pub fn fund(&self, app: &mut App, recipient: &Addr, amount: u128) {
        let minter = self
            .init
            .mint
            .as_ref()
            .map(|m| Addr::unchecked(&m.minter))
            .expect("token has no minter");
        let msg = cw20_base::msg::ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount: Uint128::new(amount),
        };
        self.execute(app, &minter, &msg).unwrap();
    }

    /// Pre-approve `spender` to pull `amount` from `owner`.
    pub fn increase_allowance(&self, app: &mut App, owner: &Addr, spender: &Addr, amount: u128) {
        let msg = cw20_base::msg::ExecuteMsg::IncreaseAllowance {
            spender: spender.to_string(),
            amount: Uint128::new(amount),
            expires: None,
        };
        self.execute(app, owner, &msg).unwrap();
    }

    pub fn transfer(&self, app: &mut App, sender: &Addr, recipient: &Addr, amount: u128) {
        let msg = cw20_base::msg::ExecuteMsg::Transfer {
            recipient: recipient.to_string(),
            amount: Uint128::new(amount),
        };
        self.execute(app, sender, &msg).unwrap();
    }

    pub fn balance(&self, app: &App, address: &Addr) -> u128 {
        let query = cw20_base::msg::QueryMsg::Balance {
            address: address.to_string(),
        };
        let res: cw20::BalanceResponse = self.query(app, &query).unwrap();
        res.balance.u128()
    }
}
