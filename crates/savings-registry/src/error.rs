use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Ownership(#[from] savings_library::ownership::OwnershipError),

    #[error("registry: already registered")]
    AlreadyRegistered {},

    #[error("registry: max strategies reached")]
    MaxStrategiesReached {},

    #[error("registry: max strategies cannot be zero")]
    ZeroMaxStrategies {},

    #[error("registry: index out of range")]
    IndexOutOfRange {},

    #[error("registry: strategy mismatch")]
    StrategyMismatch {},
}
