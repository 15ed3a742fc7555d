use crate::error::ContractError;
use cosmwasm_std::{Addr, StdResult, Storage};
use cw_storage_plus::{Item, Map};

/// Ordered catalogue of approved strategies.
/// [REGISTERED] is kept in sync with it for O(1) membership checks;
/// only the functions in this module write either of them.
const STRATEGIES: Item<Vec<Addr>> = Item::new("strategies");

/// Membership set mirroring [STRATEGIES].
const REGISTERED: Map<&Addr, ()> = Map::new("registered");

/// Upper bound on the length of [STRATEGIES].
pub const MAX_STRATEGIES: Item<u32> = Item::new("max_strategies");

pub fn get_strategies(storage: &dyn Storage) -> StdResult<Vec<Addr>> {
    STRATEGIES
        .may_load(storage)
        .map(|strategies| strategies.unwrap_or_default())
}

pub fn is_registered(storage: &dyn Storage, strategy: &Addr) -> bool {
    REGISTERED.has(storage, strategy)
}

/// Append `strategy` to the end of the catalogue, returns its index.
pub fn append(storage: &mut dyn Storage, strategy: &Addr) -> Result<usize, ContractError> {
    if is_registered(storage, strategy) {
        return Err(ContractError::AlreadyRegistered {});
    }

    let mut strategies = get_strategies(storage)?;
    let max = MAX_STRATEGIES.load(storage)?;
    if strategies.len() >= max as usize {
        return Err(ContractError::MaxStrategiesReached {});
    }

    strategies.push(strategy.clone());
    STRATEGIES.save(storage, &strategies)?;
    REGISTERED.save(storage, strategy, &())?;
    Ok(strategies.len() - 1)
}

/// Replace the entry at `index` with `strategy`, returns the replaced entry.
/// `previous` must match the current entry at `index`.
pub fn replace(
    storage: &mut dyn Storage,
    index: usize,
    strategy: &Addr,
    previous: &Addr,
) -> Result<Addr, ContractError> {
    let mut strategies = get_strategies(storage)?;
    let current = strategies
        .get(index)
        .cloned()
        .ok_or(ContractError::IndexOutOfRange {})?;
    if current != *previous {
        return Err(ContractError::StrategyMismatch {});
    }
    if is_registered(storage, strategy) {
        return Err(ContractError::AlreadyRegistered {});
    }

    strategies[index] = strategy.clone();
    STRATEGIES.save(storage, &strategies)?;
    REGISTERED.remove(storage, &current);
    REGISTERED.save(storage, strategy, &())?;
    Ok(current)
}

/// Remove the entry at `index`, returns the removed entry.
/// Entries after `index` shift down by one, relative order is preserved.
pub fn remove(storage: &mut dyn Storage, index: usize) -> Result<Addr, ContractError> {
    let mut strategies = get_strategies(storage)?;
    if index >= strategies.len() {
        return Err(ContractError::IndexOutOfRange {});
    }

    let removed = strategies.remove(index);
    STRATEGIES.save(storage, &strategies)?;
    REGISTERED.remove(storage, &removed);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;

    #[test]
    fn append_and_membership() {
        let mut deps = mock_dependencies();
        MAX_STRATEGIES.save(&mut deps.storage, &2).unwrap();

        let first = deps.api.addr_make("strategy/1");
        let second = deps.api.addr_make("strategy/2");
        let third = deps.api.addr_make("strategy/3");

        assert_eq!(append(&mut deps.storage, &first).unwrap(), 0);
        assert!(is_registered(&deps.storage, &first));
        assert!(!is_registered(&deps.storage, &second));

        assert_eq!(
            append(&mut deps.storage, &first).unwrap_err(),
            ContractError::AlreadyRegistered {}
        );

        assert_eq!(append(&mut deps.storage, &second).unwrap(), 1);
        assert_eq!(
            append(&mut deps.storage, &third).unwrap_err(),
            ContractError::MaxStrategiesReached {}
        );

        assert_eq!(get_strategies(&deps.storage).unwrap(), vec![first, second]);
    }

    #[test]
    fn replace_keeps_set_in_sync() {
        let mut deps = mock_dependencies();
        MAX_STRATEGIES.save(&mut deps.storage, &5).unwrap();

        let first = deps.api.addr_make("strategy/1");
        let second = deps.api.addr_make("strategy/2");
        let third = deps.api.addr_make("strategy/3");
        append(&mut deps.storage, &first).unwrap();
        append(&mut deps.storage, &second).unwrap();

        assert_eq!(
            replace(&mut deps.storage, 2, &third, &first).unwrap_err(),
            ContractError::IndexOutOfRange {}
        );
        assert_eq!(
            replace(&mut deps.storage, 0, &third, &second).unwrap_err(),
            ContractError::StrategyMismatch {}
        );
        assert_eq!(
            replace(&mut deps.storage, 0, &second, &first).unwrap_err(),
            ContractError::AlreadyRegistered {}
        );

        let replaced = replace(&mut deps.storage, 0, &third, &first).unwrap();
        assert_eq!(replaced, first);
        assert!(!is_registered(&deps.storage, &first));
        assert!(is_registered(&deps.storage, &third));
        assert_eq!(get_strategies(&deps.storage).unwrap(), vec![third, second]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut deps = mock_dependencies();
        MAX_STRATEGIES.save(&mut deps.storage, &5).unwrap();

        let strategies: Vec<Addr> = (0..4)
            .map(|i| deps.api.addr_make(&format!("strategy/{}", i)))
            .collect();
        for strategy in &strategies {
            append(&mut deps.storage, strategy).unwrap();
        }

        let removed = remove(&mut deps.storage, 1).unwrap();
        assert_eq!(removed, strategies[1]);
        assert!(!is_registered(&deps.storage, &strategies[1]));
        assert_eq!(
            get_strategies(&deps.storage).unwrap(),
            vec![
                strategies[0].clone(),
                strategies[2].clone(),
                strategies[3].clone()
            ]
        );

        assert_eq!(
            remove(&mut deps.storage, 3).unwrap_err(),
            ContractError::IndexOutOfRange {}
        );
    }
}
