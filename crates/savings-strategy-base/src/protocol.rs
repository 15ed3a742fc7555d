use crate::StrategyError;
use cosmwasm_std::{Addr, StdResult, Storage};
use cw_storage_plus::Map;

/// Underlying token to the backend protocol contract that holds it.
const PROTOCOLS: Map<&Addr, Addr> = Map::new("protocols");

pub fn may_get_protocol(storage: &dyn Storage, token: &Addr) -> StdResult<Option<Addr>> {
    PROTOCOLS.may_load(storage, token)
}

/// Get the backend protocol for `token`, fails if the mapping was never set.
pub fn get_protocol(storage: &dyn Storage, token: &Addr) -> Result<Addr, StrategyError> {
    PROTOCOLS
        .may_load(storage, token)?
        .ok_or(StrategyError::ProtocolNotSet {})
}

/// Map `token` to `protocol`.
/// Returns `false` when the same mapping already exists (nothing written).
/// A mapping, once set, cannot be pointed at a different protocol.
pub fn set_protocol(
    storage: &mut dyn Storage,
    token: &Addr,
    protocol: &Addr,
) -> Result<bool, StrategyError> {
    match PROTOCOLS.may_load(storage, token)? {
        Some(current) if current == *protocol => Ok(false),
        Some(_) => Err(StrategyError::ProtocolAlreadySet {}),
        None => {
            PROTOCOLS.save(storage, token, protocol)?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;

    #[test]
    fn test_set_protocol() {
        let mut deps = mock_dependencies();
        let token = deps.api.addr_make("token");
        let market = deps.api.addr_make("market");
        let other = deps.api.addr_make("market/other");

        assert_eq!(
            get_protocol(&deps.storage, &token).unwrap_err(),
            StrategyError::ProtocolNotSet {}
        );
        assert_eq!(may_get_protocol(&deps.storage, &token).unwrap(), None);

        assert!(set_protocol(&mut deps.storage, &token, &market).unwrap());
        assert!(!set_protocol(&mut deps.storage, &token, &market).unwrap());
        assert_eq!(
            set_protocol(&mut deps.storage, &token, &other).unwrap_err(),
            StrategyError::ProtocolAlreadySet {}
        );

        assert_eq!(get_protocol(&deps.storage, &token).unwrap(), market);
    }
}
