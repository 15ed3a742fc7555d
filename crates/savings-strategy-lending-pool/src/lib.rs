//! Strategy over a lending pool with a rebasing claim token.
//!
//! The pool credits deposits 1:1 and grows every claim balance with its liquidity index,
//! so the claim balance cannot be used as a share count. This strategy issues its own
//! shares per token against the claim balance it holds.

pub mod contract;

/// Interface of the lending pool contract.
pub mod pool;

pub mod testing;
