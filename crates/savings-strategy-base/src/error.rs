use cosmwasm_std::StdError;
use savings_library::ownership::OwnershipError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StrategyError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Ownership(#[from] OwnershipError),

    #[error("strategy: unauthorized")]
    Unauthorized {},

    #[error("strategy: protocol address not set")]
    ProtocolNotSet {},

    #[error("strategy: protocol address already set")]
    ProtocolAlreadySet {},

    #[error("strategy: protocol token mismatch")]
    ProtocolTokenMismatch {},

    #[error("strategy: no backend protocol")]
    NoBackendProtocol {},

    #[error("strategy: zero amount")]
    ZeroAmount {},

    #[error("strategy: zero shares")]
    ZeroShares {},

    #[error("strategy: insufficient position")]
    InsufficientPosition {},

    #[error("strategy: unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}

/// Queries return [StdResult](cosmwasm_std::StdResult), strategy errors surface as generic errors
/// carrying the same reason string.
impl From<StrategyError> for StdError {
    fn from(err: StrategyError) -> Self {
        match err {
            StrategyError::Std(err) => err,
            err => StdError::generic_err(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_std_error() {
        let err: StdError = StrategyError::ProtocolNotSet {}.into();
        assert_eq!(
            err,
            StdError::generic_err("strategy: protocol address not set")
        );

        let err: StdError = StrategyError::Std(StdError::not_found("ledger")).into();
        assert_eq!(err, StdError::not_found("ledger"));
    }
}
