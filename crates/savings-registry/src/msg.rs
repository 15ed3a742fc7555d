use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: String,
    /// Upper bound on the number of registered strategies, must be non-zero.
    pub max_strategies: u32,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// ExecuteMsg AddStrategy appends a strategy to the end of the catalogue.
    /// Only the `owner` can call this message.
    AddStrategy { strategy: String },

    /// ExecuteMsg UpdateStrategy replaces the strategy at `index` in place.
    /// `previous_strategy` must be the strategy currently at `index`,
    /// protecting the owner against a catalogue that changed under them.
    /// Only the `owner` can call this message.
    UpdateStrategy {
        index: u32,
        new_strategy: String,
        previous_strategy: String,
    },

    /// ExecuteMsg RemoveStrategy removes the strategy at `index`,
    /// entries after it shift down by one.
    /// Only the `owner` can call this message.
    RemoveStrategy { index: u32 },

    /// ExecuteMsg UpdateMaxStrategies changes the catalogue cap.
    /// Lowering it below the current size evicts nothing,
    /// it only blocks further additions until the size drops below the cap.
    /// Only the `owner` can call this message.
    UpdateMaxStrategies { max_strategies: u32 },

    /// ExecuteMsg TransferOwnership
    /// See [`savings_library::ownership::transfer_ownership`] for more information on this field
    TransferOwnership { new_owner: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// QueryMsg Strategies: returns the catalogue in order.
    #[returns(StrategiesResponse)]
    Strategies {},

    /// QueryMsg IsRegistered: returns true if the strategy is in the catalogue.
    #[returns(IsRegisteredResponse)]
    IsRegistered { strategy: String },

    /// QueryMsg MaxStrategies: returns the catalogue cap.
    #[returns(MaxStrategiesResponse)]
    MaxStrategies {},
}

#[cw_serde]
pub struct StrategiesResponse(pub Vec<Addr>);

#[cw_serde]
pub struct IsRegisteredResponse(pub bool);

#[cw_serde]
pub struct MaxStrategiesResponse(pub u32);
