//! Capability interface shared by every yield strategy.
//!
//! Each strategy contract accepts [msg::StrategyExecuteMsg] and [msg::StrategyQueryMsg],
//! so the ledger can talk to any variant without knowing which backend sits behind it.

pub mod error;

pub mod info;

/// Ledger (aka auth) module, only the ledger can move custody.
pub mod ledger;

pub mod msg;

/// Virtual shares offset for strategies that issue their own shares.
pub mod offset;

/// Per-token backend protocol mapping.
pub mod protocol;

/// 18-decimal exchange rate math.
pub mod rate;

pub mod response;

pub mod settle;

/// CW20 message builders and balance queries.
pub mod token;

pub use crate::error::StrategyError;
