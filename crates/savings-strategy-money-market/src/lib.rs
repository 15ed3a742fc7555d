//! Strategy over an index-rate money market.
//!
//! The market holds one underlying token and tracks a wrapped balance per depositor;
//! a wrapped unit redeems for `exchange_rate / 1e18` underlying. The wrapped balance
//! of this strategy is its share count.

pub mod contract;

/// Interface of the money market contract.
pub mod market;

pub mod testing;
