#![cfg(not(target_arch = "wasm32"))]

use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg, SharesResponse, TotalTokensResponse};
use cosmwasm_std::{Addr, Empty, Env, Uint128};
use cw_multi_test::{App, Contract, ContractWrapper};
use savings_library::testing::TestingContract;

#[derive(Clone, Debug, PartialEq)]
pub struct LedgerContract {
    pub addr: Addr,
    pub init: InstantiateMsg,
}

impl TestingContract<InstantiateMsg, ExecuteMsg, QueryMsg> for LedgerContract {
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
            registry: Self::get_contract_addr(app, "registry").to_string(),
        }
    }

    fn new(app: &mut App, env: &Env, msg: Option<InstantiateMsg>) -> Self {
        let init = msg.unwrap_or_else(|| Self::default_init(app, env));
        let code_id = Self::store_code(app);
        let addr = Self::instantiate(app, code_id, "ledger", &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl LedgerContract {
    pub fn shares(&self, app: &App, owner: &Addr, token: &Addr, strategy: &Addr) -> Uint128 {
        let msg = QueryMsg::Shares {
            owner: owner.to_string(),
            token: token.to_string(),
            strategy: strategy.to_string(),
        };
        let SharesResponse(shares) = self.query(app, &msg).unwrap();
        shares
    }

    pub fn total_tokens(&self, app: &App, owner: &Addr, token: &Addr) -> Uint128 {
        let msg = QueryMsg::TotalTokens {
            owner: owner.to_string(),
            token: token.to_string(),
        };
        let TotalTokensResponse(tokens) = self.query(app, &msg).unwrap();
        tokens
    }
}
