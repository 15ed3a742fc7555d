use cosmwasm_std::testing::mock_env;
use cosmwasm_std::{Addr, Event};
use cw_multi_test::App;
use savings_library::ownership::OwnershipError;
use savings_library::testing::TestingContract;
use savings_registry::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use savings_registry::testing::RegistryContract;
use savings_registry::ContractError;

fn instantiate(max_strategies: u32) -> (App, RegistryContract) {
    let mut app = App::default();
    let env = mock_env();

    let init = InstantiateMsg {
        owner: app.api().addr_make("owner").to_string(),
        max_strategies,
    };
    let registry = RegistryContract::new(&mut app, &env, Some(init));

    (app, registry)
}

fn add(app: &mut App, registry: &RegistryContract, strategy: &Addr) {
    let owner = app.api().addr_make("owner");
    let msg = ExecuteMsg::AddStrategy {
        strategy: strategy.to_string(),
    };
    registry.execute(app, &owner, &msg).unwrap();
}

fn strategies(app: &App, registry: &RegistryContract) -> Vec<Addr> {
    registry.query(app, &QueryMsg::Strategies {}).unwrap()
}

#[test]
fn add_strategy_successfully() {
    let (mut app, registry) = instantiate(3);
    let owner = app.api().addr_make("owner");
    let strategy = app.api().addr_make("strategy");

    let msg = ExecuteMsg::AddStrategy {
        strategy: strategy.to_string(),
    };
    let response = registry.execute(&mut app, &owner, &msg).unwrap();

    assert_eq!(
        response.events,
        vec![
            Event::new("execute").add_attribute("_contract_address", registry.addr.as_str()),
            Event::new("wasm-StrategyAdded")
                .add_attribute("_contract_address", registry.addr.as_str())
                .add_attribute("strategy", strategy.as_str())
                .add_attribute("index", "0"),
        ]
    );

    let is_registered: bool = registry
        .query(
            &app,
            &QueryMsg::IsRegistered {
                strategy: strategy.to_string(),
            },
        )
        .unwrap();
    assert!(is_registered);
    assert_eq!(strategies(&app, &registry), vec![strategy]);
}

#[test]
fn add_strategy_unauthorized() {
    let (mut app, registry) = instantiate(3);
    let stranger = app.api().addr_make("stranger");
    let strategy = app.api().addr_make("strategy");

    let msg = ExecuteMsg::AddStrategy {
        strategy: strategy.to_string(),
    };
    let err = registry.execute(&mut app, &stranger, &msg).unwrap_err();

    assert_eq!(
        err.root_cause().to_string(),
        ContractError::Ownership(OwnershipError::Unauthorized).to_string()
    );
    assert!(strategies(&app, &registry).is_empty());
}

#[test]
fn add_strategy_rejects_duplicates_and_cap() {
    let (mut app, registry) = instantiate(2);
    let owner = app.api().addr_make("owner");
    let first = app.api().addr_make("strategy/1");
    let second = app.api().addr_make("strategy/2");
    let third = app.api().addr_make("strategy/3");

    add(&mut app, &registry, &first);

    let msg = ExecuteMsg::AddStrategy {
        strategy: first.to_string(),
    };
    let err = registry.execute(&mut app, &owner, &msg).unwrap_err();
    assert_eq!(err.root_cause().to_string(), "registry: already registered");

    add(&mut app, &registry, &second);

    let msg = ExecuteMsg::AddStrategy {
        strategy: third.to_string(),
    };
    let err = registry.execute(&mut app, &owner, &msg).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        ContractError::MaxStrategiesReached {}.to_string()
    );

    assert_eq!(strategies(&app, &registry), vec![first, second]);
}

#[test]
fn update_strategy_with_stale_hint() {
    let (mut app, registry) = instantiate(5);
    let owner = app.api().addr_make("owner");
    let first = app.api().addr_make("strategy/1");
    let second = app.api().addr_make("strategy/2");
    let replacement = app.api().addr_make("strategy/replacement");

    add(&mut app, &registry, &first);
    add(&mut app, &registry, &second);

    let msg = ExecuteMsg::UpdateStrategy {
        index: 0,
        new_strategy: replacement.to_string(),
        previous_strategy: second.to_string(),
    };
    let err = registry.execute(&mut app, &owner, &msg).unwrap_err();
    assert_eq!(err.root_cause().to_string(), "registry: strategy mismatch");

    let msg = ExecuteMsg::UpdateStrategy {
        index: 5,
        new_strategy: replacement.to_string(),
        previous_strategy: first.to_string(),
    };
    let err = registry.execute(&mut app, &owner, &msg).unwrap_err();
    assert_eq!(err.root_cause().to_string(), "registry: index out of range");

    let msg = ExecuteMsg::UpdateStrategy {
        index: 1,
        new_strategy: replacement.to_string(),
        previous_strategy: second.to_string(),
    };
    let response = registry.execute(&mut app, &owner, &msg).unwrap();
    assert_eq!(
        response.events,
        vec![
            Event::new("execute").add_attribute("_contract_address", registry.addr.as_str()),
            Event::new("wasm-StrategyRemoved")
                .add_attribute("_contract_address", registry.addr.as_str())
                .add_attribute("strategy", second.as_str())
                .add_attribute("index", "1"),
            Event::new("wasm-StrategyAdded")
                .add_attribute("_contract_address", registry.addr.as_str())
                .add_attribute("strategy", replacement.as_str())
                .add_attribute("index", "1"),
        ]
    );

    let is_registered: bool = registry
        .query(
            &app,
            &QueryMsg::IsRegistered {
                strategy: second.to_string(),
            },
        )
        .unwrap();
    assert!(!is_registered);
    assert_eq!(strategies(&app, &registry), vec![first, replacement]);
}

#[test]
fn remove_strategy_preserves_order() {
    let (mut app, registry) = instantiate(5);
    let owner = app.api().addr_make("owner");
    let all: Vec<Addr> = (0..4)
        .map(|i| app.api().addr_make(&format!("strategy/{}", i)))
        .collect();
    for strategy in &all {
        add(&mut app, &registry, strategy);
    }

    let msg = ExecuteMsg::RemoveStrategy { index: 1 };
    registry.execute(&mut app, &owner, &msg).unwrap();

    assert_eq!(
        strategies(&app, &registry),
        vec![all[0].clone(), all[2].clone(), all[3].clone()]
    );

    // removed strategy can be registered again
    add(&mut app, &registry, &all[1]);
    assert_eq!(
        strategies(&app, &registry),
        vec![
            all[0].clone(),
            all[2].clone(),
            all[3].clone(),
            all[1].clone()
        ]
    );
}

#[test]
fn lowered_cap_blocks_additions_only() {
    let (mut app, registry) = instantiate(3);
    let owner = app.api().addr_make("owner");
    let all: Vec<Addr> = (0..3)
        .map(|i| app.api().addr_make(&format!("strategy/{}", i)))
        .collect();
    for strategy in &all {
        add(&mut app, &registry, strategy);
    }

    let msg = ExecuteMsg::UpdateMaxStrategies { max_strategies: 1 };
    registry.execute(&mut app, &owner, &msg).unwrap();

    let max: u32 = registry.query(&app, &QueryMsg::MaxStrategies {}).unwrap();
    assert_eq!(max, 1);
    assert_eq!(strategies(&app, &registry), all);

    let extra = app.api().addr_make("strategy/extra");
    let msg = ExecuteMsg::AddStrategy {
        strategy: extra.to_string(),
    };
    let err = registry.execute(&mut app, &owner, &msg).unwrap_err();
    assert_eq!(err.root_cause().to_string(), "registry: max strategies reached");

    let msg = ExecuteMsg::UpdateMaxStrategies { max_strategies: 0 };
    let err = registry.execute(&mut app, &owner, &msg).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "registry: max strategies cannot be zero"
    );
}

#[test]
fn transfer_ownership_successfully() {
    let (mut app, registry) = instantiate(3);
    let owner = app.api().addr_make("owner");
    let new_owner = app.api().addr_make("new_owner");

    let msg = ExecuteMsg::TransferOwnership {
        new_owner: new_owner.to_string(),
    };
    let response = registry.execute(&mut app, &owner, &msg).unwrap();
    assert_eq!(
        response.events,
        vec![
            Event::new("execute").add_attribute("_contract_address", registry.addr.as_str()),
            Event::new("wasm-OwnershipTransferred")
                .add_attribute("_contract_address", registry.addr.as_str())
                .add_attribute("previous_owner", owner.as_str())
                .add_attribute("new_owner", new_owner.as_str()),
        ]
    );

    let strategy = app.api().addr_make("strategy");
    let msg = ExecuteMsg::AddStrategy {
        strategy: strategy.to_string(),
    };
    let err = registry.execute(&mut app, &owner, &msg).unwrap_err();
    assert_eq!(err.root_cause().to_string(), "ownership: unauthorized");

    registry.execute(&mut app, &new_owner, &msg).unwrap();
}
