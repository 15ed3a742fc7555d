use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: String,
    /// The `savings-registry` listing the strategies accepting deposits.
    pub registry: String,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// ExecuteMsg Deposit pulls `amount` of `token` from the sender (by CW20 allowance to this
    /// contract) into `strategy`, crediting the shares issued to `recipient`.
    /// `strategy` must be registered.
    ///
    /// #### Returns
    /// Response data is the number of shares credited, as [Uint128].
    Deposit {
        amount: Uint128,
        token: String,
        strategy: String,
        recipient: String,
    },

    /// ExecuteMsg Withdraw redeems part of the sender's position in `strategy` to `recipient`.
    /// With `in_shares`, `amount` is a share count and is not converted,
    /// otherwise `amount` is underlying and converted to shares at the current rate.
    /// Strategies removed from the registry can still be withdrawn from.
    ///
    /// #### Returns
    /// Response data is the amount of underlying sent to `recipient`, as [Uint128].
    Withdraw {
        amount: Uint128,
        token: String,
        strategy: String,
        recipient: String,
        in_shares: bool,
    },

    /// ExecuteMsg WithdrawAll redeems the sender's whole position in `strategy` to the sender.
    /// The last holder of a strategy position also receives its rounding residue.
    WithdrawAll { token: String, strategy: String },

    /// ExecuteMsg SwitchStrategy moves part of the sender's position
    /// from `from_strategy` into `to_strategy` in one transaction.
    /// With `in_shares`, `amount` is a share count of `from_strategy` and is not converted,
    /// otherwise `amount` is underlying and converted to shares at the current rate.
    /// Whatever `from_strategy` returns is locked into `to_strategy`.
    /// `to_strategy` must be registered. Either both legs apply or neither does.
    ///
    /// #### Returns
    /// Response data is the number of `to_strategy` shares credited, as [Uint128].
    SwitchStrategy {
        amount: Uint128,
        token: String,
        from_strategy: String,
        to_strategy: String,
        in_shares: bool,
    },

    /// ExecuteMsg Approve sets the allowance of `spender` over the sender's `token` positions.
    Approve {
        spender: String,
        token: String,
        amount: Uint128,
    },

    /// ExecuteMsg IncreaseAllowance adds `amount`, saturating at [Uint128::MAX].
    IncreaseAllowance {
        spender: String,
        token: String,
        amount: Uint128,
    },

    /// ExecuteMsg DecreaseAllowance subtracts `amount`, failing if the allowance is lower.
    /// `amount` of [Uint128::MAX] revokes the allowance whatever its current value.
    DecreaseAllowance {
        spender: String,
        token: String,
        amount: Uint128,
    },

    /// ExecuteMsg Transfer moves `amount` of underlying worth of shares in `strategy`
    /// from the sender to `recipient`. No tokens move.
    Transfer {
        recipient: String,
        token: String,
        strategy: String,
        amount: Uint128,
    },

    /// ExecuteMsg TransferFrom is [ExecuteMsg::Transfer] out of `owner`'s position,
    /// spending `amount` of the sender's allowance from `owner`.
    TransferFrom {
        owner: String,
        recipient: String,
        token: String,
        strategy: String,
        amount: Uint128,
    },

    /// ExecuteMsg SetRegistry replaces the registry consulted for new deposits and switches.
    /// Only the `owner` can call this message.
    SetRegistry { registry: String },

    /// ExecuteMsg TransferOwnership
    /// See [`savings_library::ownership::transfer_ownership`] for more information on this field
    TransferOwnership { new_owner: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(SharesResponse)]
    Shares {
        owner: String,
        token: String,
        strategy: String,
    },

    /// QueryMsg TotalShares: shares of every owner in `strategy` for `token`.
    #[returns(TotalSharesResponse)]
    TotalShares { token: String, strategy: String },

    #[returns(AllowanceResponse)]
    Allowance {
        owner: String,
        token: String,
        spender: String,
    },

    /// QueryMsg TotalTokens: underlying value of `owner`'s positions in `token`,
    /// summed over the registered strategies at their current rates.
    #[returns(TotalTokensResponse)]
    TotalTokens { owner: String, token: String },

    #[returns(RegistryResponse)]
    Registry {},
}

#[cw_serde]
pub struct SharesResponse(pub Uint128);

#[cw_serde]
pub struct TotalSharesResponse(pub Uint128);

#[cw_serde]
pub struct AllowanceResponse(pub Uint128);

#[cw_serde]
pub struct TotalTokensResponse(pub Uint128);

#[cw_serde]
pub struct RegistryResponse(pub Addr);
