use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

/// Every strategy variant is instantiated the same way.
#[cw_serde]
pub struct InstantiateMsg {
    pub owner: String,
    /// The `savings-ledger` allowed to lock and unlock tokens.
    pub ledger: String,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub enum StrategyExecuteMsg {
    /// ExecuteMsg LockTokens moves `amount` of `token`, already transferred to the strategy,
    /// into its backend. `owner` is the ledger account credited, for events only.
    /// Only the `ledger` can call this message.
    ///
    /// #### Returns
    /// Response data is the number of shares issued, as [Uint128].
    LockTokens {
        owner: String,
        token: String,
        amount: Uint128,
    },

    /// ExecuteMsg UnlockTokens redeems `shares` of `token` from the backend
    /// and transfers the tokens received to `recipient`.
    /// Only the `ledger` can call this message.
    ///
    /// #### Returns
    /// Response data is the amount of tokens transferred, as [Uint128].
    UnlockTokens {
        owner: String,
        token: String,
        shares: Uint128,
        recipient: String,
    },

    /// ExecuteMsg UnlockAllTokens redeems the whole position in `token`
    /// and transfers everything to `recipient`.
    /// Only the `ledger` can call this message.
    UnlockAllTokens { token: String, recipient: String },

    /// ExecuteMsg UpdateProtocolAddresses sets the backend protocol used for `token`.
    /// Only the `owner` can call this message.
    UpdateProtocolAddresses { token: String, protocol: String },

    /// ExecuteMsg TransferOwnership
    /// See [`savings_library::ownership::transfer_ownership`] for more information on this field
    TransferOwnership { new_owner: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum StrategyQueryMsg {
    /// QueryMsg GetTokensForShares: tokens `shares` would redeem for, at the current rate.
    #[returns(Uint128)]
    GetTokensForShares { token: String, shares: Uint128 },

    /// QueryMsg GetSharesForTokens: shares locking `amount` would issue, at the current rate.
    #[returns(Uint128)]
    GetSharesForTokens { token: String, amount: Uint128 },

    /// QueryMsg Position: the whole position the strategy holds in `token`.
    #[returns(PositionResponse)]
    Position { token: String },

    /// QueryMsg ProtocolAddress: backend protocol used for `token`, if any.
    #[returns(Option<Addr>)]
    ProtocolAddress { token: String },

    #[returns(StrategyInfoResponse)]
    StrategyInfo {},
}

#[cw_serde]
pub struct PositionResponse {
    pub shares: Uint128,
    pub tokens: Uint128,
}

#[cw_serde]
pub struct StrategyInfoResponse {
    pub ledger: Addr,
    /// Variant of the strategy, e.g. `money-market`.
    pub kind: String,
    pub contract: String,
    pub version: String,
}
