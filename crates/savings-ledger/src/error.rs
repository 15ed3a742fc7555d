use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Ownership(#[from] savings_library::ownership::OwnershipError),

    #[error("{0}")]
    ParseReply(#[from] cw_utils::ParseReplyError),

    #[error("ledger: zero amount")]
    ZeroAmount {},

    #[error("ledger: zero shares")]
    ZeroShares {},

    #[error("ledger: strategy not registered")]
    StrategyNotRegistered {},

    #[error("ledger: same strategy")]
    SameStrategy {},

    #[error("ledger: insufficient shares")]
    InsufficientShares {},

    #[error("ledger: insufficient allowance")]
    InsufficientAllowance {},

    #[error("ledger: missing strategy response data")]
    MissingReplyData {},

    #[error("ledger: unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
