//! Responses shared by every strategy variant, so the ledger and indexers
//! observe the same events whatever backend is used.

use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, Event, Response, StdResult, Uint128};

/// Response to `LockTokens`, data is `shares`.
pub fn tokens_locked(
    msgs: Vec<CosmosMsg>,
    owner: &Addr,
    token: &Addr,
    amount: Uint128,
    shares: Uint128,
) -> StdResult<Response> {
    Ok(Response::new()
        .add_messages(msgs)
        .add_event(
            Event::new("TokensLocked")
                .add_attribute("owner", owner)
                .add_attribute("token", token)
                .add_attribute("amount", amount)
                .add_attribute("shares", shares),
        )
        .set_data(to_json_binary(&shares)?))
}

/// Response to `UnlockTokens`, data is `amount`.
pub fn tokens_unlocked(
    msgs: Vec<CosmosMsg>,
    owner: &Addr,
    token: &Addr,
    shares: Uint128,
    amount: Uint128,
    recipient: &Addr,
) -> StdResult<Response> {
    Ok(Response::new()
        .add_messages(msgs)
        .add_event(
            Event::new("TokensUnlocked")
                .add_attribute("owner", owner)
                .add_attribute("token", token)
                .add_attribute("shares", shares)
                .add_attribute("amount", amount)
                .add_attribute("recipient", recipient),
        )
        .set_data(to_json_binary(&amount)?))
}

/// Response to `UnlockAllTokens`, data is `amount`.
pub fn all_tokens_unlocked(
    msgs: Vec<CosmosMsg>,
    token: &Addr,
    shares: Uint128,
    amount: Uint128,
    recipient: &Addr,
) -> StdResult<Response> {
    Ok(Response::new()
        .add_messages(msgs)
        .add_event(
            Event::new("AllTokensUnlocked")
                .add_attribute("token", token)
                .add_attribute("shares", shares)
                .add_attribute("amount", amount)
                .add_attribute("recipient", recipient),
        )
        .set_data(to_json_binary(&amount)?))
}

/// Response to `UpdateProtocolAddresses`, no event when nothing changed.
pub fn protocol_updated(token: &Addr, protocol: &Addr, updated: bool) -> Response {
    if !updated {
        return Response::new();
    }
    Response::new().add_event(
        Event::new("ProtocolAddressUpdated")
            .add_attribute("token", token)
            .add_attribute("protocol", protocol),
    )
}
